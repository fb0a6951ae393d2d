use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{load_context, load_field_map};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ImportListData;
use crate::import::{self, ImportRequest};
use crate::store::SqliteClientStore;

#[derive(Debug, Default)]
pub struct ImportRunOptions<'a> {
    /// URL, file path, or `-` for stdin. `None` also reads stdin.
    pub source: Option<String>,
    pub dry_run: bool,
    pub field_map_path: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<String>,
}

#[derive(Debug, Default)]
pub struct ImportListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn run(source: Option<String>, dry_run: bool) -> ClientResult<SuccessEnvelope> {
    run_with_options(ImportRunOptions {
        source,
        dry_run,
        ..ImportRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ImportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = load_context(options.home_override)?;
    let (field_map, _) = load_field_map(&context, options.field_map_path)?;
    let data = import::execute(
        &context,
        &field_map,
        ImportRequest {
            source: options.source.as_deref(),
            dry_run: options.dry_run,
            stdin_override: options.stdin_override,
        },
    )?;
    success("import", data)
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(ImportListOptions::default())
}

#[doc(hidden)]
pub fn list_with_options(options: ImportListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let context = load_context(options.home_override)?;
    let store = SqliteClientStore::open(&context)?;
    let rows = store.list_runs()?;
    success("import list", ImportListData { rows })
}

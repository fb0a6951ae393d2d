use std::path::Path;

use crate::ClientResult;
use crate::commands::common::{load_context, load_field_map};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::ExportData;
use crate::export::{ExportFormat, build_sheet, write_sheet};
use crate::store::{ClientStore, SqliteClientStore};

#[derive(Debug)]
pub struct ExportOptions<'a> {
    pub path: &'a Path,
    pub field_map_path: Option<&'a Path>,
    pub home_override: Option<&'a Path>,
}

pub fn run(path: &Path) -> ClientResult<SuccessEnvelope> {
    run_with_options(ExportOptions {
        path,
        field_map_path: None,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ExportOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let format = ExportFormat::from_path(options.path)?;
    let context = load_context(options.home_override)?;
    let (field_map, _) = load_field_map(&context, options.field_map_path)?;

    let store = SqliteClientStore::open(&context)?;
    let clients = store.list_all()?;
    let sheet = build_sheet(&clients, &field_map);
    write_sheet(&sheet, options.path, format)?;

    success(
        "export",
        ExportData {
            path: options.path.display().to_string(),
            format: format.as_str().to_string(),
            rows_written: sheet.rows.len() as i64,
            columns: sheet.headers,
        },
    )
}

pub mod field_map;
pub mod normalize;
pub mod parse;
pub mod project;
pub mod reconcile;
pub mod resolve;
pub mod row;
pub mod source;
pub mod transcode;

use tracing::{info, warn};

use crate::ClientResult;
use crate::contracts::types::ImportData;
use crate::import::field_map::FieldMap;
use crate::import::project::project_rows;
use crate::import::reconcile::reconcile;
use crate::import::row::RawRow;
use crate::import::source::{ResolvedSource, SourceBody, resolve_source};
use crate::setup::StoreContext;
use crate::store::sqlite::RunRecord;
use crate::store::{ClientStore, MemoryClientStore, SqliteClientStore};

pub(crate) struct ImportRequest<'a> {
    pub(crate) source: Option<&'a str>,
    pub(crate) dry_run: bool,
    pub(crate) stdin_override: Option<String>,
}

pub(crate) fn execute(
    context: &StoreContext,
    field_map: &FieldMap,
    request: ImportRequest<'_>,
) -> ClientResult<ImportData> {
    let resolved = resolve_source(request.source, request.stdin_override)?;
    let rows = read_rows(&resolved)?;
    let rows_read = rows.len() as i64;

    let projected = project_rows(&rows, field_map, context.config.date_locale);
    if rows_read > 0 && !projected.unmatched_fields.is_empty() {
        warn!(
            fields = projected.unmatched_fields.join(", "),
            "no source column matched these fields"
        );
    }
    info!(
        source_kind = resolved.kind.as_str(),
        rows_read,
        skipped_blank = projected.skipped_blank,
        dry_run = request.dry_run,
        "projected import rows"
    );

    let mut store = SqliteClientStore::open(context)?;
    let snapshot = store.list_all()?;

    let (summary, run_id) = if request.dry_run {
        let mut preview = MemoryClientStore::from_snapshot(&snapshot);
        (reconcile(&projected.records, &snapshot, &mut preview)?, None)
    } else {
        let summary = reconcile(&projected.records, &snapshot, &mut store)?;
        let run_id = store.record_run(RunRecord {
            source_kind: resolved.kind.as_str(),
            source_ref: resolved.source_ref.as_deref(),
            rows_read,
            skipped_blank: projected.skipped_blank,
            summary,
        })?;
        (summary, Some(run_id))
    };

    let message = if request.dry_run {
        format!(
            "Dry run: {} would be added and {} updated. No clients were written.",
            summary.new_count, summary.updated_count
        )
    } else {
        format!(
            "Import finished: {} added, {} updated.",
            summary.new_count, summary.updated_count
        )
    };

    Ok(ImportData {
        dry_run: request.dry_run,
        run_id,
        message,
        source_kind: resolved.kind.as_str().to_string(),
        source_ref: resolved.source_ref,
        rows_read,
        skipped_blank: projected.skipped_blank,
        summary,
        unmatched_fields: projected.unmatched_fields,
        store_path: context.db_path.display().to_string(),
    })
}

fn read_rows(resolved: &ResolvedSource) -> ClientResult<Vec<RawRow>> {
    match &resolved.body {
        SourceBody::Csv(content) => parse::parse_csv(content),
        SourceBody::Workbook(path) => parse::parse_workbook(path),
    }
}

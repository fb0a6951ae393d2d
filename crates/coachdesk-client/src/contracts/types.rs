use serde::Serialize;

use crate::import::field_map::FieldSpec;
use crate::import::transcode::DateLocale;
use crate::store::StoredClient;

/// Counters for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub new_count: i64,
    pub updated_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportData {
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    pub message: String,
    pub source_kind: String,
    pub source_ref: Option<String>,
    pub rows_read: i64,
    pub skipped_blank: i64,
    pub summary: ImportSummary,
    /// Fields that no row of the source resolved to a value.
    pub unmatched_fields: Vec<String>,
    pub store_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportRunItem {
    pub run_id: String,
    pub created_at: String,
    pub source_kind: String,
    pub source_ref: Option<String>,
    pub rows_read: i64,
    pub new_count: i64,
    pub updated_count: i64,
    pub skipped_blank: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportListData {
    pub rows: Vec<ImportRunItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientListData {
    pub total: i64,
    pub clients: Vec<StoredClient>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportData {
    pub path: String,
    pub format: String,
    pub rows_written: i64,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldsData {
    pub field_map_source: String,
    pub date_locale: DateLocale,
    pub fields: Vec<FieldSpec>,
}

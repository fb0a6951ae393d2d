use tracing::warn;

use crate::import::field_map::{FieldKind, FieldMap};
use crate::import::resolve::resolve_field;
use crate::import::row::RawRow;
use crate::import::transcode::{DateLocale, canonicalize_link, decode_serial_date};
use crate::record::ClientRecord;

#[derive(Debug, Clone, Default)]
pub struct ProjectedRows {
    pub records: Vec<ClientRecord>,
    pub skipped_blank: i64,
    /// Fields no row resolved to a value, in field map order.
    pub unmatched_fields: Vec<String>,
}

/// Every field of `field_map` is present in the result, empty when the row
/// has nothing for it.
pub fn project_row(row: &RawRow, field_map: &FieldMap, locale: DateLocale) -> ClientRecord {
    let mut record = ClientRecord::default();

    for field in field_map.fields() {
        let value = resolve_field(row, &field.aliases);
        let resolved = match field.kind {
            FieldKind::Text => value.to_text(),
            FieldKind::Date => decode_serial_date(&value, locale),
            FieldKind::File(slot) => {
                let url = canonicalize_link(&value);
                record.set_file(slot, url.clone());
                url
            }
        };
        record.fields.insert(field.name.clone(), resolved);
    }

    record
}

pub fn project_rows(rows: &[RawRow], field_map: &FieldMap, locale: DateLocale) -> ProjectedRows {
    let mut projected = ProjectedRows::default();
    let mut seen_fields = vec![false; field_map.fields().len()];

    for (index, row) in rows.iter().enumerate() {
        let record = project_row(row, field_map, locale);
        if record.is_blank() {
            warn!(row = index + 1, "skipping row with no recognised values");
            projected.skipped_blank += 1;
            continue;
        }

        for (seen, field) in seen_fields.iter_mut().zip(field_map.fields()) {
            if !record.field(&field.name).is_empty() {
                *seen = true;
            }
        }
        projected.records.push(record);
    }

    projected.unmatched_fields = field_map
        .fields()
        .iter()
        .zip(seen_fields)
        .filter(|(_, seen)| !seen)
        .map(|(field, _)| field.name.clone())
        .collect();

    projected
}

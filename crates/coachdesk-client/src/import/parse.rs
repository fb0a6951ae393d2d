use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use crate::import::row::{CellValue, RawRow};
use crate::{ClientError, ClientResult};

/// Parses CSV text whose first record is the header row. Every cell is kept
/// as text so phone numbers and codes keep their leading zeros.
pub fn parse_csv(content: &str) -> ClientResult<Vec<RawRow>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(ClientError::malformed_source("the source is empty"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| ClientError::malformed_source("CSV header row is missing or unreadable"))?
        .iter()
        .map(|value| value.to_string())
        .collect::<Vec<String>>();
    ensure_headers(&headers)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|error| {
            ClientError::malformed_source(&format!("CSV row {} is unreadable: {error}", index + 1))
        })?;

        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.push(header, CellValue::text(value));
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Parses the first sheet of a workbook. Numeric and date cells stay
/// numbers so serial dates can be decoded later.
pub fn parse_workbook(path: &Path) -> ClientResult<Vec<RawRow>> {
    let location = path.display().to_string();
    let mut workbook = open_workbook_auto(path).map_err(|error| {
        ClientError::malformed_source(&format!("could not open workbook `{location}`: {error}"))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ClientError::malformed_source(&format!("workbook `{location}` has no sheets")))?
        .map_err(|error| {
            ClientError::malformed_source(&format!(
                "could not read the first sheet of `{location}`: {error}"
            ))
        })?;

    let mut lines = range.rows();
    let Some(header_cells) = lines.next() else {
        return Err(ClientError::malformed_source(&format!(
            "workbook `{location}` has no header row"
        )));
    };
    let headers = header_cells
        .iter()
        .map(|cell| cell_value(cell).to_text().trim().to_string())
        .collect::<Vec<String>>();
    ensure_headers(&headers)?;

    let rows = lines
        .map(|cells| {
            let mut row = RawRow::new();
            for (header, cell) in headers.iter().zip(cells) {
                row.push(header, cell_value(cell));
            }
            row
        })
        .collect();
    Ok(rows)
}

fn ensure_headers(headers: &[String]) -> ClientResult<()> {
    if headers.iter().all(|header| header.is_empty()) {
        return Err(ClientError::malformed_source(
            "the first row holds no column headers",
        ));
    }
    Ok(())
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            CellValue::text(value.trim())
        }
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::Bool(value) => CellValue::text(if *value { "TRUE" } else { "FALSE" }),
        Data::DateTime(value) => CellValue::Number(value.as_f64()),
    }
}

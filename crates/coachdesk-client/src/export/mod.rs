use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::info;

use crate::import::field_map::FieldMap;
use crate::store::StoredClient;
use crate::{ClientError, ClientResult};

const SHEET_NAME: &str = "Clients";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(|extension| extension.to_ascii_lowercase());
        match extension.as_deref() {
            Some("xlsx") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            _ => Err(ClientError::invalid_argument_for_command(
                &format!(
                    "Cannot export to `{}`: use a path ending in .xlsx or .csv.",
                    path.display()
                ),
                Some("export"),
            )),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

/// One header row of first aliases, then one row per client in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn build_sheet(clients: &[StoredClient], field_map: &FieldMap) -> ExportSheet {
    let headers = field_map
        .fields()
        .iter()
        .map(|field| field.export_header().to_string())
        .collect();
    let rows = clients
        .iter()
        .map(|client| {
            field_map
                .fields()
                .iter()
                .map(|field| client.record.field(&field.name).to_string())
                .collect()
        })
        .collect();

    ExportSheet { headers, rows }
}

pub fn write_sheet(sheet: &ExportSheet, path: &Path, format: ExportFormat) -> ClientResult<()> {
    match format {
        ExportFormat::Xlsx => write_xlsx(sheet, path)
            .map_err(|error| ClientError::export_failed(path, &error.to_string())),
        ExportFormat::Csv => write_csv(sheet, path)
            .map_err(|error| ClientError::export_failed(path, &error.to_string())),
    }?;

    info!(
        path = %path.display(),
        format = format.as_str(),
        rows = sheet.rows.len(),
        "wrote client export"
    );
    Ok(())
}

fn write_xlsx(sheet: &ExportSheet, path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for (column, header) in sheet.headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column as u16, header, &header_format)?;
    }
    for (index, row) in sheet.rows.iter().enumerate() {
        for (column, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(index as u32 + 1, column as u16, value)?;
            }
        }
    }
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)
}

fn write_csv(sheet: &ExportSheet, path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&sheet.headers)?;
    for row in &sheet.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ExportFormat, build_sheet};
    use crate::import::field_map::{FieldKind, FieldMap, FieldSpec};
    use crate::record::ClientRecord;
    use crate::store::StoredClient;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/clients.XLSX")).ok(),
            Some(ExportFormat::Xlsx)
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("clients.csv")).ok(),
            Some(ExportFormat::Csv)
        );

        let unsupported = ExportFormat::from_path(Path::new("clients.pdf"));
        assert!(unsupported.is_err());
        if let Err(error) = unsupported {
            assert_eq!(error.code, "invalid_argument");
        }
    }

    #[test]
    fn sheet_uses_first_aliases_and_fills_missing_fields() {
        let field_map = FieldMap::new(vec![
            FieldSpec::new("FullName", &["الاسم الكامل", "FullName"], FieldKind::Text),
            FieldSpec::new("Email", &["البريد الإلكتروني", "Email"], FieldKind::Text),
        ]);
        assert!(field_map.is_ok());
        if let Ok(field_map) = field_map {
            let clients = vec![StoredClient {
                id: "cli_1".to_string(),
                created_at: "2024-01-01T00:00:00.000Z".to_string(),
                updated_at: "2024-01-01T00:00:00.000Z".to_string(),
                record: ClientRecord::default().with_field("FullName", "منى"),
            }];

            let sheet = build_sheet(&clients, &field_map);
            assert_eq!(sheet.headers, vec!["الاسم الكامل", "البريد الإلكتروني"]);
            assert_eq!(sheet.rows, vec![vec!["منى".to_string(), String::new()]]);
        }
    }
}

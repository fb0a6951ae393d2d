use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::contracts::types::ImportSummary;

pub(crate) const IMPORT_HELP_COMMAND: &str = "coachdesk import --help";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_argument(message: &str) -> Self {
        Self::invalid_argument_for_command(message, None)
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `coachdesk {cmd} --help` for usage."),
            None => "Run `coachdesk --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn source_unavailable(source: &str, detail: &str) -> Self {
        Self::new(
            "source_unavailable",
            &format!("Could not fetch import source `{source}`: {detail}"),
            vec![
                "Check that the URL is reachable without signing in.".to_string(),
                "For Google Sheets, share the sheet as \"Anyone with the link\" or publish it as CSV."
                    .to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to review accepted sources."),
            ],
        )
        .with_data(json!({
            "source": source,
        }))
    }

    pub fn malformed_source(detail: &str) -> Self {
        Self::new(
            "malformed_source",
            &format!("Import source could not be read as a table: {detail}"),
            vec![
                "Make sure the first row holds the column headers.".to_string(),
                "Export the sheet as UTF-8 CSV or .xlsx and retry.".to_string(),
            ],
        )
    }

    pub fn persistence_failure(
        row: usize,
        summary: &ImportSummary,
        cause: &ClientError,
    ) -> Self {
        Self::new(
            "persistence_failure",
            &format!(
                "Import stopped at row {row}: {}. {} added and {} updated before the failure were kept.",
                cause.message, summary.new_count, summary.updated_count
            ),
            vec![
                "Resolve the store problem described above.".to_string(),
                "Rerun the same import; rows with a client code or phone number are matched and updated, not duplicated."
                    .to_string(),
                "Rows with neither a client code nor a phone number are added again on every run."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "row": row,
            "summary": summary,
            "cause_code": cause.code,
        }))
    }

    pub fn invalid_field_map(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "invalid_field_map",
            &format!("Field map `{location}` is invalid: {detail}"),
            vec![
                "Every field needs a unique name and at least one alias.".to_string(),
                "Run `coachdesk fields --json` to see the built-in map as a starting point."
                    .to_string(),
            ],
        )
        .with_data(json!({
            "path": location,
        }))
    }

    pub fn invalid_config(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "invalid_config",
            &format!("Config file `{location}` is invalid: {detail}"),
            vec![format!("Fix or remove `{location}` and retry.")],
        )
    }

    pub fn export_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "export_failed",
            &format!("Could not write export to `{location}`: {detail}"),
            vec![format!(
                "Check that the directory for `{location}` exists and is writable."
            )],
        )
    }

    pub fn client_not_found(client_id: &str) -> Self {
        Self::new(
            "client_not_found",
            &format!("Client id `{client_id}` was not found."),
            vec!["Run `coachdesk client list` to find a valid client id.".to_string()],
        )
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize client store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `COACHDESK_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Client store is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Client store appears corrupt at `{location}`."),
            vec![format!(
                "Replace `{location}` with a valid SQLite store or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Client store migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("Client store operation failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }

    pub fn is_internal(&self) -> bool {
        self.code.starts_with("internal_")
            || matches!(
                self.code.as_str(),
                "store_init_permission_denied"
                    | "store_locked"
                    | "store_corrupt"
                    | "migration_failed"
                    | "store_init_failed"
            )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

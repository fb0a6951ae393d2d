use std::io;

use coachdesk_client::{ClientError, SuccessEnvelope};
use serde::Serialize;
use serde_json::{Map, Value, json};

const JSON_VERSION: &str = "v1";

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    let value = match success.command.as_str() {
        "import list" => success
            .data
            .get("rows")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())),
        "import" | "client list" | "export" | "fields" => json!({
            "ok": true,
            "version": JSON_VERSION,
            "data": success.data.clone()
        }),
        _ => {
            return Err(io::Error::other(format!(
                "JSON output is not supported for command `{}`",
                success.command
            )));
        }
    };

    serialize_json_pretty(&value)
}

/// Failure payload. `data` carries structured context such as the failing
/// row and the partial counts of an interrupted import.
pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    let mut body = Map::new();
    body.insert("code".to_string(), json!(error.code));
    body.insert("message".to_string(), json!(error.message));
    body.insert("recovery_steps".to_string(), json!(error.recovery_steps));
    if let Some(data) = &error.data {
        body.insert("data".to_string(), data.clone());
    }
    serialize_json_pretty(&json!({ "error": body }))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

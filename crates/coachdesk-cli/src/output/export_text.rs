use std::io;

use serde_json::Value;

use super::format::{self, get_i64, get_str};

pub fn render_export(data: &Value) -> io::Result<String> {
    let path = data
        .get("path")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("export output requires path"))?;

    let mut lines = vec!["Export completed successfully.".to_string(), String::new()];
    lines.extend(format::key_value_rows(
        &[
            ("File:", path.to_string()),
            ("Format:", get_str(data, "format").to_string()),
            ("Clients:", get_i64(data, "rows_written").to_string()),
        ],
        2,
    ));
    Ok(lines.join("\n"))
}

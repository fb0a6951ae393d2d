use std::io;

use serde_json::Value;

use super::format::get_str;

pub fn render_fields(data: &Value) -> io::Result<String> {
    let fields = data
        .get("fields")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("fields output requires fields"))?;

    let mut lines = vec![
        format!("Field map: {}", get_str(data, "field_map_source")),
        format!("Date format: {}", get_str(data, "date_locale")),
        String::new(),
    ];
    for field in fields {
        let aliases: Vec<&str> = field
            .get("aliases")
            .and_then(Value::as_array)
            .map(|aliases| aliases.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();
        lines.push(format!(
            "  {} ({})",
            get_str(field, "name"),
            kind_label(field.get("kind"))
        ));
        lines.push(format!("    {}", aliases.join(" | ")));
    }

    Ok(lines.join("\n"))
}

fn kind_label(kind: Option<&Value>) -> String {
    match kind {
        Some(Value::String(kind)) => kind.clone(),
        Some(Value::Object(kind)) => match kind.get("file").and_then(Value::as_str) {
            Some(slot) => format!("file: {slot}"),
            None => "text".to_string(),
        },
        _ => "text".to_string(),
    }
}

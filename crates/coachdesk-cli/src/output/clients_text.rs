use std::io;

use serde_json::Value;

use super::format::{self, Align, Column, get_str, plural};

pub fn render_client_list(data: &Value) -> io::Result<String> {
    let clients = data
        .get("clients")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("client list output requires clients"))?;

    if clients.is_empty() {
        return Ok([
            "No clients stored yet.",
            "",
            "Import a sheet to get started:",
            "  coachdesk import --dry-run <source>",
        ]
        .join("\n"));
    }

    let columns = [
        Column {
            name: "Code",
            align: Align::Left,
        },
        Column {
            name: "Name",
            align: Align::Left,
        },
        Column {
            name: "Phone",
            align: Align::Left,
        },
        Column {
            name: "Package",
            align: Align::Left,
        },
        Column {
            name: "Client ID",
            align: Align::Left,
        },
    ];
    let rows: Vec<Vec<String>> = clients
        .iter()
        .map(|client| {
            let record = client.get("record").unwrap_or(&Value::Null);
            vec![
                get_str(record, "ClientCode").to_string(),
                get_str(record, "FullName").to_string(),
                get_str(record, "PhoneNumber").to_string(),
                get_str(record, "Package").to_string(),
                get_str(client, "id").to_string(),
            ]
        })
        .collect();

    let mut lines = vec![
        format!(
            "{} stored.",
            plural(clients.len() as i64, "client", "clients")
        ),
        String::new(),
    ];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &rows,
        format::terminal_width(),
        "Client",
    ));
    Ok(lines.join("\n"))
}

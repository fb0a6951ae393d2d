use std::io;

use chrono::{DateTime, Local};
use serde_json::Value;

use super::format::{self, Align, Column, get_i64, get_str, plural};

pub fn render_import_run(data: &Value) -> io::Result<String> {
    let dry_run = data
        .get("dry_run")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let summary = data
        .get("summary")
        .filter(|summary| summary.is_object())
        .ok_or_else(|| io::Error::other("import output requires summary"))?;

    let mut lines = vec![if dry_run {
        "Dry run completed successfully.".to_string()
    } else {
        "Import completed successfully.".to_string()
    }];

    lines.push(String::new());
    lines.push("Summary:".to_string());

    let mut entries = Vec::new();
    if let Some(run_id) = data.get("run_id").and_then(Value::as_str) {
        entries.push(("Run ID:", run_id.to_string()));
    }
    entries.push(("Source:", source_label(data)));
    entries.push(("Rows read:", get_i64(data, "rows_read").to_string()));
    entries.push(("Blank rows:", get_i64(data, "skipped_blank").to_string()));
    let (added_label, updated_label) = if dry_run {
        ("Would add:", "Would update:")
    } else {
        ("Added:", "Updated:")
    };
    entries.push((added_label, get_i64(summary, "new_count").to_string()));
    entries.push((updated_label, get_i64(summary, "updated_count").to_string()));
    lines.extend(format::key_value_rows(&entries, 2));

    let unmatched = unmatched_fields(data);
    if !unmatched.is_empty() && get_i64(data, "rows_read") > 0 {
        lines.push(String::new());
        lines.push("No column matched these fields, so they were left empty:".to_string());
        lines.push(format!("  {}", unmatched.join(", ")));
    }

    lines.push(String::new());
    if dry_run {
        lines.push("No clients were written because this was a dry run.".to_string());
        lines.push(String::new());
        lines.push("What to do next:".to_string());
        lines.push("  1. Run the same command without --dry-run to write the clients.".to_string());
        lines.push("  2. Run `coachdesk fields` if a column was not recognised.".to_string());
    } else {
        lines.push("What to do next:".to_string());
        lines.push("  1. Run `coachdesk client list` to review the clients.".to_string());
        lines.push("  2. Run `coachdesk export clients.xlsx` to share them.".to_string());
    }

    Ok(lines.join("\n"))
}

pub fn render_import_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("import list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No imports found yet.",
            "",
            "Run your first import:",
            "  1. coachdesk import --help",
            "  2. coachdesk import --dry-run <source>",
            "  3. coachdesk import <source>",
        ]
        .join("\n"));
    }

    let columns = [
        Column {
            name: "Run ID",
            align: Align::Left,
        },
        Column {
            name: "Created (local)",
            align: Align::Left,
        },
        Column {
            name: "Source",
            align: Align::Left,
        },
        Column {
            name: "Rows",
            align: Align::Right,
        },
        Column {
            name: "Added",
            align: Align::Right,
        },
        Column {
            name: "Updated",
            align: Align::Right,
        },
    ];
    let table_rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            vec![
                get_str(row, "run_id").to_string(),
                local_timestamp(get_str(row, "created_at")),
                source_label(row),
                get_i64(row, "rows_read").to_string(),
                get_i64(row, "new_count").to_string(),
                get_i64(row, "updated_count").to_string(),
            ]
        })
        .collect();

    let mut lines = vec![
        format!("{} found.", plural(rows.len() as i64, "import", "imports")),
        String::new(),
    ];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Import",
    ));
    Ok(lines.join("\n"))
}

fn source_label(data: &Value) -> String {
    match data.get("source_ref").and_then(Value::as_str) {
        Some(reference) => reference.to_string(),
        None => get_str(data, "source_kind").to_string(),
    }
}

fn unmatched_fields(data: &Value) -> Vec<&str> {
    data.get("unmatched_fields")
        .and_then(Value::as_array)
        .map(|fields| fields.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn local_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| {
            parsed
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| raw.to_string())
}

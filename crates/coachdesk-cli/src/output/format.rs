use std::cmp;

use serde_json::Value;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
}

const INDENT: usize = 2;
const COLUMN_GAP: usize = 2;
const MAX_CELL_WIDTH: usize = 32;

pub fn terminal_width() -> usize {
    let from_env = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);
    cmp::max(from_env, 40)
}

/// Display width in characters. Arabic text is counted per code point.
fn width_of(value: &str) -> usize {
    value.chars().count()
}

fn pad(value: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(width_of(value)));
    match align {
        Align::Left => format!("{value}{fill}"),
        Align::Right => format!("{fill}{value}"),
    }
}

fn clip(value: &str, width: usize) -> String {
    if width_of(value) <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

pub fn key_value_rows(entries: &[(&str, String)], indent: usize) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| width_of(label))
        .max()
        .unwrap_or(0);
    let padding = " ".repeat(indent);

    entries
        .iter()
        .map(|(label, value)| {
            format!(
                "{padding}{}  {value}",
                pad(label, label_width, Align::Left)
            )
        })
        .collect()
}

/// Renders an aligned table, or one labelled block per row when the
/// table would not fit in `max_width`.
pub fn render_table_or_blocks(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    let clipped: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| clip(cell, MAX_CELL_WIDTH)).collect())
        .collect();
    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            clipped
                .iter()
                .filter_map(|row| row.get(index))
                .map(|cell| width_of(cell))
                .fold(width_of(column.name), cmp::max)
        })
        .collect();
    let total = INDENT + widths.iter().sum::<usize>() + COLUMN_GAP * (widths.len() - 1);
    if total > max_width {
        return render_blocks(columns, rows, block_label);
    }

    let header: Vec<String> = columns.iter().map(|column| column.name.to_string()).collect();
    let mut lines = vec![format_row(columns, &header, &widths)];
    lines.extend(clipped.iter().map(|row| format_row(columns, row, &widths)));
    lines
}

fn format_row(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let rendered: Vec<String> = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, width))| {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            pad(cell, *width, column.align)
        })
        .collect();
    let line = format!("{}{}", " ".repeat(INDENT), rendered.join(&" ".repeat(COLUMN_GAP)));
    line.trim_end().to_string()
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{}{block_label} {}", " ".repeat(INDENT), index + 1));
        let entries: Vec<(&str, String)> = columns
            .iter()
            .enumerate()
            .map(|(column_index, column)| {
                (
                    column.name,
                    row.get(column_index).cloned().unwrap_or_default(),
                )
            })
            .collect();
        lines.extend(key_value_rows(&entries, INDENT * 2));
    }
    lines
}

pub fn get_str<'a>(data: &'a Value, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn get_i64(data: &Value, key: &str) -> i64 {
    data.get(key).and_then(Value::as_i64).unwrap_or(0)
}

pub fn plural(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("1 {singular}")
    } else {
        format!("{count} {plural}")
    }
}

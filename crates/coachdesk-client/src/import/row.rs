use serde::Serialize;

/// One spreadsheet cell as it came out of the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    pub fn text(value: &str) -> Self {
        if value.is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }

    /// Blank cells never satisfy a field lookup. Numbers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(value) => value.clone(),
            Self::Number(value) => format_number(*value),
        }
    }
}

/// Integral values print without a fractional part, so `1234.0` reads `1234`.
pub(crate) fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    value.to_string()
}

/// One spreadsheet line keyed by the header text found in the source, in
/// column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: &str, value: CellValue) {
        self.cells.push((header.to_string(), value));
    }

    pub fn with(mut self, header: &str, value: CellValue) -> Self {
        self.push(header, value);
        self
    }

    /// First cell stored under exactly `header`.
    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(key, _)| key == header)
            .map(|(_, value)| value)
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_blank())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{CellValue, RawRow};

    #[test]
    fn numbers_render_without_trailing_zero() {
        assert_eq!(CellValue::Number(1234.0).to_text(), "1234");
        assert_eq!(CellValue::Number(72.5).to_text(), "72.5");
        assert_eq!(CellValue::Number(-3.0).to_text(), "-3");
    }

    #[test]
    fn whitespace_text_is_blank_but_zero_is_not() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("   ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert_eq!(CellValue::text(""), CellValue::Empty);
    }

    #[test]
    fn duplicate_headers_resolve_to_first_cell() {
        let row = RawRow::new()
            .with("Phone", CellValue::text("111"))
            .with("Phone", CellValue::text("222"));
        assert_eq!(row.get("Phone"), Some(&CellValue::text("111")));
        assert_eq!(row.len(), 2);
    }
}

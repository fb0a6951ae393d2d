use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::import::row::CellValue;

/// Day 25569 of the 1899-12-30 spreadsheet epoch is 1970-01-01.
const UNIX_EPOCH_SERIAL: f64 = 25569.0;

const DRIVE_VIEW_URL: &str = "https://drive.google.com/uc?export=view&id=";

static DRIVE_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"id=([A-Za-z0-9_-]{25,})",
        r"/d/([A-Za-z0-9_-]{25,})",
        r"open\?id=([A-Za-z0-9_-]{25,})",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateLocale {
    /// Day/month/year in Arabic-Indic digits, e.g. `١/١/٢٠٢١`.
    #[default]
    #[serde(rename = "ar-EG")]
    ArEg,
    /// `01/01/2021`
    #[serde(rename = "en-GB")]
    EnGb,
    /// `1/1/2021`
    #[serde(rename = "en-US")]
    EnUs,
    /// `2021-01-01`
    #[serde(rename = "iso")]
    Iso,
}

impl DateLocale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArEg => "ar-EG",
            Self::EnGb => "en-GB",
            Self::EnUs => "en-US",
            Self::Iso => "iso",
        }
    }

    pub fn format(self, date: NaiveDate) -> String {
        let (day, month, year) = (date.day(), date.month(), date.year());
        match self {
            Self::ArEg => arabic_indic_digits(&format!("{day}/{month}/{year}")),
            Self::EnGb => format!("{day:02}/{month:02}/{year}"),
            Self::EnUs => format!("{month}/{day}/{year}"),
            Self::Iso => date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Renders a spreadsheet serial date. Text is assumed to be formatted
/// already and passes through untouched; zero and empty cells give `""`.
pub fn decode_serial_date(value: &CellValue, locale: DateLocale) -> String {
    let serial = match value {
        CellValue::Empty => return String::new(),
        CellValue::Text(text) => return text.clone(),
        CellValue::Number(serial) => *serial,
    };

    if serial == 0.0 || !serial.is_finite() {
        return String::new();
    }

    let utc_days = (serial - UNIX_EPOCH_SERIAL).floor();
    if utc_days.abs() > i32::MAX as f64 {
        return String::new();
    }

    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1);
    let date = epoch.and_then(|start| start.checked_add_signed(Duration::days(utc_days as i64)));
    match date {
        Some(date) => locale.format(date),
        None => String::new(),
    }
}

/// Rewrites a Google Drive share link into a direct-view URL. Links with no
/// recognizable file id are returned unchanged, as are numeric cells.
pub fn canonicalize_link(value: &CellValue) -> String {
    let link = match value {
        CellValue::Empty => return String::new(),
        CellValue::Number(_) => return value.to_text(),
        CellValue::Text(link) => link,
    };

    for pattern in DRIVE_ID_PATTERNS.iter() {
        if let Some(id) = pattern.captures(link).and_then(|captures| captures.get(1)) {
            return format!("{DRIVE_VIEW_URL}{}", id.as_str());
        }
    }

    link.clone()
}

fn arabic_indic_digits(value: &str) -> String {
    value
        .chars()
        .map(|character| match character.to_digit(10) {
            Some(digit) => char::from_u32(0x0660 + digit).unwrap_or(character),
            None => character,
        })
        .collect()
}

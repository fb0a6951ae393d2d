use std::fs;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

use crate::error::IMPORT_HELP_COMMAND;
use crate::{ClientError, ClientResult};

const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

static SHEETS_EDITOR_URL: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"^(https?://docs\.google\.com/spreadsheets/d/[A-Za-z0-9_-]+)/(?:edit|view)").ok()
});
static SHEETS_GID: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"[#?&]gid=([0-9]+)").ok());

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SourceKind {
    Url,
    File,
    Stdin,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SourceBody {
    Csv(String),
    Workbook(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ResolvedSource {
    pub kind: SourceKind,
    pub source_ref: Option<String>,
    pub body: SourceBody,
}

/// Resolves the `import` argument. `None` or `-` reads stdin, an
/// `http(s)` URL is fetched, anything else is a file path.
/// `stdin_override` stands in for the process stdin.
pub fn resolve_source(
    source: Option<&str>,
    stdin_override: Option<String>,
) -> ClientResult<ResolvedSource> {
    match source {
        Some(value) if is_url(value) => {
            let url = csv_export_url(value);
            let content = fetch_url(&url)?;
            Ok(ResolvedSource {
                kind: SourceKind::Url,
                source_ref: Some(url),
                body: SourceBody::Csv(content),
            })
        }
        Some("-") | None => {
            let content = read_stdin(stdin_override)?.ok_or_else(|| {
                ClientError::invalid_argument_for_command(
                    "No import source provided. Pass a URL, a file path, or pipe CSV via stdin.",
                    Some("import"),
                )
            })?;
            Ok(ResolvedSource {
                kind: SourceKind::Stdin,
                source_ref: None,
                body: SourceBody::Csv(content),
            })
        }
        Some(path) => {
            if read_stdin(stdin_override)?.is_some() {
                return Err(ClientError::invalid_argument_for_command(
                    "Both stdin and a source argument were provided. Pass exactly one source.",
                    Some("import"),
                ));
            }
            resolve_file(Path::new(path))
        }
    }
}

/// Rewrites a Google Sheets editor link to its CSV export endpoint. Other
/// URLs, including published `pub?output=csv` links, are returned as-is.
pub fn csv_export_url(url: &str) -> String {
    let Some(editor) = SHEETS_EDITOR_URL.as_ref() else {
        return url.to_string();
    };
    let Some(base) = editor.captures(url).and_then(|captures| captures.get(1)) else {
        return url.to_string();
    };

    let gid = SHEETS_GID
        .as_ref()
        .and_then(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1));
    match gid {
        Some(gid) => format!("{}/export?format=csv&gid={}", base.as_str(), gid.as_str()),
        None => format!("{}/export?format=csv", base.as_str()),
    }
}

pub(crate) fn is_workbook_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| extension.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn is_url(value: &str) -> bool {
    let lowered = value.trim_start().to_ascii_lowercase();
    lowered.starts_with("http://") || lowered.starts_with("https://")
}

fn resolve_file(path: &Path) -> ClientResult<ResolvedSource> {
    let location = path.display().to_string();
    let unreadable = |error: std::io::Error| {
        ClientError::invalid_argument_with_recovery(
            &format!("Could not read import file `{location}`: {error}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                format!("Run `{IMPORT_HELP_COMMAND}` to review accepted sources."),
            ],
        )
    };

    if is_workbook_path(path) {
        fs::metadata(path).map_err(unreadable)?;
        return Ok(ResolvedSource {
            kind: SourceKind::File,
            source_ref: Some(location.clone()),
            body: SourceBody::Workbook(path.to_path_buf()),
        });
    }

    let bytes = fs::read(path).map_err(unreadable)?;
    let content = String::from_utf8(bytes).map_err(|_| {
        ClientError::malformed_source(&format!("`{location}` is not UTF-8 text"))
    })?;
    Ok(ResolvedSource {
        kind: SourceKind::File,
        source_ref: Some(location.clone()),
        body: SourceBody::Csv(content),
    })
}

fn fetch_url(url: &str) -> ClientResult<String> {
    info!(url, "fetching import source");
    let response = reqwest::blocking::get(url)
        .map_err(|error| ClientError::source_unavailable(url, &error.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::source_unavailable(url, &format!("HTTP {status}")));
    }

    response
        .text()
        .map_err(|error| ClientError::source_unavailable(url, &error.to_string()))
}

fn read_stdin(stdin_override: Option<String>) -> ClientResult<Option<String>> {
    if let Some(value) = stdin_override {
        return Ok(Some(value).filter(|value| !value.trim().is_empty()));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|error| ClientError::malformed_source(&format!("could not read stdin: {error}")))?;

    if buffer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(buffer))
}

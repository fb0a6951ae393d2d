use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Extended help shown after `coachdesk import --help`.
pub const IMPORT_AFTER_HELP: &str = "\
How import works:
  Each sheet row becomes one client. A row whose client code matches a
  stored client, or whose phone number has the same digits, updates that
  client. Every other row adds a new client.

  <source> is one of:
    a Google Sheets link   the editor URL is rewritten to its CSV export
    an http(s) CSV URL     fetched once, without sign-in
    a local file           .csv, or a .xlsx/.xlsm/.xls/.ods workbook
    -                      CSV read from stdin

  Headers are matched loosely: exact text first, then ignoring case,
  spacing, punctuation and Arabic letter variants, then by containment.
  Run `coachdesk fields` to see the headers each field accepts.

What to do next:
  1. Run `coachdesk import --dry-run <source>` and check the counts.
  2. Run `coachdesk import <source>` to write the clients.
  3. Run `coachdesk client list` or `coachdesk export clients.xlsx`.

Updates overwrite only the fields the field map names. Values the map
leaves out, including unmapped document links, stay as they were.
Rerunning the same sheet updates rows that carry a client code or phone
number. Rows with neither are added again on every run.
";

#[derive(Debug, Parser)]
#[command(
    name = "coachdesk",
    version,
    about = "coaching client records from spreadsheets",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import clients from a sheet URL, a file, or stdin
    #[command(after_help = IMPORT_AFTER_HELP)]
    Import {
        /// Sheet URL, CSV or workbook path, or `-` for stdin
        source: Option<String>,
        /// Reconcile and report counts without writing anything
        #[arg(long)]
        dry_run: bool,
        /// JSON field map to use instead of the configured one
        #[arg(long, value_name = "PATH")]
        field_map: Option<PathBuf>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// List past import runs, newest first
    Imports {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Inspect stored clients
    #[command(arg_required_else_help = true)]
    Client {
        #[command(subcommand)]
        command: ClientCommand,
    },
    /// Write every stored client to a .xlsx or .csv file
    Export {
        /// Destination file; the extension picks the format
        path: PathBuf,
        /// JSON field map to use instead of the configured one
        #[arg(long, value_name = "PATH")]
        field_map: Option<PathBuf>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
    /// Show the active field map and the headers each field accepts
    Fields {
        /// JSON field map to show instead of the configured one
        #[arg(long, value_name = "PATH")]
        field_map: Option<PathBuf>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClientCommand {
    /// List stored clients, oldest first
    List {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
pub fn parse_from<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;
use tempfile::TempDir;

const CLIENTS_CSV: &str = "\
كود العميل,الاسم الكامل,رقم الهاتف,الباقة
C-1,منى علي,+20 100 200 3000,Gold
C-2,Sara Ali,01001112222,Silver
";

struct CliOutput {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl CliOutput {
    fn ok(&self) -> bool {
        self.code == Some(0)
    }
}

fn run_cli_in_home_with_input(
    home: &Path,
    args: &[&str],
    input: Option<&str>,
    log_filter: Option<&str>,
) -> CliOutput {
    let mut command = Command::new(env!("CARGO_BIN_EXE_coachdesk"));
    command.args(args);
    command.env("COACHDESK_HOME", home);
    command.env_remove("COACHDESK_LOG");
    if let Some(filter) = log_filter {
        command.env("COACHDESK_LOG", filter);
    }
    command.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    });
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());

    let child_spawn = command.spawn();
    assert!(child_spawn.is_ok());
    if let Ok(mut child) = child_spawn {
        if let Some(body) = input
            && let Some(mut pipe) = child.stdin.take()
        {
            let write_result = pipe.write_all(body.as_bytes());
            assert!(write_result.is_ok());
        }

        let output = child.wait_with_output();
        assert!(output.is_ok());
        if let Ok(result) = output {
            return CliOutput {
                code: result.status.code(),
                stdout: String::from_utf8_lossy(&result.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            };
        }
    }

    CliOutput {
        code: None,
        stdout: String::new(),
        stderr: String::new(),
    }
}

fn run_cli(home: &Path, args: &[&str]) -> CliOutput {
    run_cli_in_home_with_input(home, args, None, None)
}

fn test_home() -> TempDir {
    let home = TempDir::new();
    assert!(home.is_ok());
    match home {
        Ok(home) => home,
        Err(error) => panic!("temp dir: {error}"),
    }
}

fn write_source_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let write = fs::write(&path, body);
    assert!(write.is_ok());
    path
}

fn parse_json(body: &str) -> Value {
    let parsed = serde_json::from_str::<Value>(body);
    assert!(parsed.is_ok());
    parsed.unwrap_or(Value::Null)
}

fn assert_text_error_contract(body: &str, code: &str) {
    assert!(body.contains("Something went wrong, but it's easy to fix."));
    assert!(body.contains(&format!("  Error:    {code}")));
    assert!(body.contains("  Details:"));
    assert!(body.contains("What to do next:"));
}

fn assert_json_error_contract(body: &str, code: &str) -> Value {
    let payload = parse_json(body);
    assert_eq!(payload["error"]["code"], Value::String(code.to_string()));
    assert!(payload["error"]["message"].is_string());
    assert!(payload["error"]["recovery_steps"].is_array());
    payload
}

#[test]
fn root_command_uses_short_plaintext_help() {
    let home = test_home();
    let output = run_cli(home.path(), &[]);
    assert!(output.ok());
    assert!(output.stdout.starts_with("coachdesk - coaching client records"));
    assert!(output.stdout.contains("  coachdesk import --help"));
}

#[test]
fn help_and_version_return_success_output() {
    let home = test_home();
    let help = run_cli(home.path(), &["--help"]);
    assert!(help.ok());
    assert!(help.stdout.contains("USAGE: coachdesk <command>"));
    assert!(help.stdout.contains("coachdesk export <path.xlsx|path.csv>"));

    let version = run_cli(home.path(), &["--version"]);
    assert!(version.ok());
    assert!(version.stdout.starts_with("coachdesk "));

    let import_help = run_cli(home.path(), &["import", "--help"]);
    assert!(import_help.ok());
    assert!(import_help.stdout.contains("How import works:"));
}

#[test]
fn import_from_stdin_then_rerun_updates() {
    let home = test_home();
    let first =
        run_cli_in_home_with_input(home.path(), &["import", "--json"], Some(CLIENTS_CSV), None);
    assert!(first.ok());
    let payload = parse_json(&first.stdout);
    assert_eq!(payload["ok"], Value::Bool(true));
    assert_eq!(payload["version"], Value::String("v1".to_string()));
    assert_eq!(payload["data"]["source_kind"], Value::String("stdin".to_string()));
    assert_eq!(payload["data"]["summary"]["new_count"], Value::from(2));
    assert_eq!(payload["data"]["summary"]["updated_count"], Value::from(0));

    let second =
        run_cli_in_home_with_input(home.path(), &["import", "-"], Some(CLIENTS_CSV), None);
    assert!(second.ok());
    assert!(second.stdout.starts_with("Import completed successfully."));
    assert!(second.stdout.contains("Updated:"));

    let listed = run_cli(home.path(), &["client", "list", "--json"]);
    assert!(listed.ok());
    let clients = parse_json(&listed.stdout);
    assert_eq!(clients["data"]["total"], Value::from(2));
    assert_eq!(
        clients["data"]["clients"][0]["record"]["FullName"],
        Value::String("منى علي".to_string())
    );

    let runs = run_cli(home.path(), &["imports", "--json"]);
    assert!(runs.ok());
    let rows = parse_json(&runs.stdout);
    assert!(rows.is_array());
    assert_eq!(rows.as_array().map(Vec::len), Some(2));
    assert_eq!(rows[0]["updated_count"], Value::from(2));
}

#[test]
fn dry_run_file_import_writes_nothing() {
    let home = test_home();
    let source = write_source_file(home.path(), "clients.csv", CLIENTS_CSV);
    let source_arg = source.display().to_string();

    let dry_run = run_cli(home.path(), &["import", "--dry-run", &source_arg]);
    assert!(dry_run.ok());
    assert!(dry_run.stdout.starts_with("Dry run completed successfully."));
    assert!(dry_run.stdout.contains("Would add:"));

    let listed = run_cli(home.path(), &["client", "list"]);
    assert!(listed.ok());
    assert!(listed.stdout.starts_with("No clients stored yet."));

    let runs = run_cli(home.path(), &["imports"]);
    assert!(runs.ok());
    assert!(runs.stdout.starts_with("No imports found yet."));
}

#[test]
fn missing_source_is_a_usage_error() {
    let home = test_home();
    let output = run_cli(home.path(), &["import", "--json"]);
    assert_eq!(output.code, Some(1));
    let payload = assert_json_error_contract(&output.stdout, "invalid_argument");
    assert_eq!(
        payload["error"]["recovery_steps"][0],
        Value::String("Run `coachdesk import --help` for usage.".to_string())
    );
}

#[test]
fn unreadable_source_file_uses_plaintext_error_contract() {
    let home = test_home();
    let missing = home.path().join("nope.csv").display().to_string();
    let output = run_cli(home.path(), &["import", &missing]);
    assert_eq!(output.code, Some(1));
    assert_text_error_contract(&output.stdout, "invalid_argument");
}

#[test]
fn unknown_flag_returns_command_hint() {
    let home = test_home();
    let output = run_cli(home.path(), &["client", "list", "--bogus", "--json"]);
    assert_eq!(output.code, Some(1));
    let payload = assert_json_error_contract(&output.stdout, "invalid_argument");
    assert_eq!(
        payload["error"]["recovery_steps"][0],
        Value::String("Run `coachdesk client list --help` for usage.".to_string())
    );
    assert!(
        !payload["error"]["message"]
            .as_str()
            .unwrap_or("")
            .contains("Usage:")
    );
}

#[test]
fn export_writes_csv_with_first_aliases() {
    let home = test_home();
    let imported =
        run_cli_in_home_with_input(home.path(), &["import"], Some(CLIENTS_CSV), None);
    assert!(imported.ok());

    let destination = home.path().join("clients.csv");
    let destination_arg = destination.display().to_string();
    let exported = run_cli(home.path(), &["export", &destination_arg, "--json"]);
    assert!(exported.ok());
    let payload = parse_json(&exported.stdout);
    assert_eq!(payload["data"]["rows_written"], Value::from(2));
    assert_eq!(payload["data"]["format"], Value::String("csv".to_string()));

    let written = fs::read_to_string(&destination);
    assert!(written.is_ok());
    if let Ok(text) = written {
        assert!(text.starts_with("كود العميل,الاسم الكامل,رقم الهاتف"));
        assert!(text.contains("C-2,Sara Ali,01001112222"));
    }
}

#[test]
fn export_rejects_unknown_extension() {
    let home = test_home();
    let output = run_cli(home.path(), &["export", "clients.pdf"]);
    assert_eq!(output.code, Some(1));
    assert_text_error_contract(&output.stdout, "invalid_argument");
}

#[test]
fn fields_lists_the_built_in_map() {
    let home = test_home();
    let output = run_cli(home.path(), &["fields", "--json"]);
    assert!(output.ok());
    let payload = parse_json(&output.stdout);
    assert_eq!(
        payload["data"]["field_map_source"],
        Value::String("built_in".to_string())
    );
    assert_eq!(
        payload["data"]["fields"][0]["name"],
        Value::String("ClientCode".to_string())
    );

    let text = run_cli(home.path(), &["fields"]);
    assert!(text.ok());
    assert!(text.stdout.contains("  ClientCode (text)"));
}

#[test]
fn logs_go_to_stderr_and_keep_json_stdout_clean() {
    let home = test_home();
    let output = run_cli_in_home_with_input(
        home.path(),
        &["import", "--json"],
        Some(CLIENTS_CSV),
        Some("info"),
    );
    assert!(output.ok());
    let payload = parse_json(&output.stdout);
    assert_eq!(payload["data"]["rows_read"], Value::from(2));
    assert!(output.stderr.contains("projected import rows"));
}

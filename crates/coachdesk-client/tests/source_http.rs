use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use coachdesk_client::commands::import::{self, ImportRunOptions};
use tempfile::tempdir;

/// Serves exactly one HTTP response and returns the request line it saw.
fn serve_once(status_line: &'static str, body: &'static str) -> Option<(String, JoinHandle<String>)> {
    let listener = TcpListener::bind("127.0.0.1:0").ok()?;
    let address = listener.local_addr().ok()?;
    let handle = thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return String::new();
        };
        let mut buffer = [0_u8; 4096];
        let read = stream.read(&mut buffer).unwrap_or(0);
        let request = String::from_utf8_lossy(&buffer[..read]).to_string();

        let response = format!(
            "{status_line}\r\nContent-Type: text/csv; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.flush();
        request.lines().next().unwrap_or_default().to_string()
    });
    Some((format!("http://{address}"), handle))
}

fn temp_home() -> std::io::Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempdir()?;
    let home = dir.path().join("coach-home");
    Ok((dir, home))
}

#[test]
fn url_source_is_fetched_and_imported() {
    let temp = temp_home();
    assert!(temp.is_ok());
    let server = serve_once("HTTP/1.1 200 OK", "ClientCode,FullName\nC-1,Mona\nC-2,Omar\n");
    assert!(server.is_some());
    if let (Ok((_dir, home)), Some((base, handle))) = (temp, server) {
        let url = format!("{base}/clients.csv");
        let result = import::run_with_options(ImportRunOptions {
            source: Some(url.clone()),
            home_override: Some(&home),
            stdin_override: Some(String::new()),
            ..ImportRunOptions::default()
        });
        assert!(result.is_ok());
        if let Ok(envelope) = result {
            assert_eq!(envelope.data["source_kind"], "url");
            assert_eq!(envelope.data["source_ref"], url.as_str());
            assert_eq!(envelope.data["summary"]["new_count"], 2);
        }

        let request_line = handle.join().unwrap_or_default();
        assert_eq!(request_line, "GET /clients.csv HTTP/1.1");
    }
}

#[test]
fn not_found_url_is_source_unavailable() {
    let temp = temp_home();
    assert!(temp.is_ok());
    let server = serve_once("HTTP/1.1 404 Not Found", "missing");
    assert!(server.is_some());
    if let (Ok((_dir, home)), Some((base, handle))) = (temp, server) {
        let result = import::run_with_options(ImportRunOptions {
            source: Some(format!("{base}/gone.csv")),
            home_override: Some(&home),
            stdin_override: Some(String::new()),
            ..ImportRunOptions::default()
        });
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "source_unavailable");
            assert!(error.message.contains("404"));
        }
        let _ = handle.join();
    }
}

#[test]
fn unreachable_host_is_source_unavailable() {
    let temp = temp_home();
    assert!(temp.is_ok());
    let closed_port = TcpListener::bind("127.0.0.1:0")
        .ok()
        .and_then(|listener| listener.local_addr().ok());
    assert!(closed_port.is_some());
    if let (Ok((_dir, home)), Some(address)) = (temp, closed_port) {
        let result = import::run_with_options(ImportRunOptions {
            source: Some(format!("http://{address}/clients.csv")),
            home_override: Some(&home),
            stdin_override: Some(String::new()),
            ..ImportRunOptions::default()
        });
        assert!(result.is_err());
        if let Err(error) = result {
            assert_eq!(error.code, "source_unavailable");
        }
    }
}

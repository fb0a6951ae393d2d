use std::io::{self, Write};

/// Writes help text as-is. A closed pipe (`coachdesk ... | head`) is not an error.
pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_stdout(text.as_bytes(), false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_stdout(text.as_bytes(), true)
}

fn write_stdout(bytes: &[u8], newline: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    tolerate_broken_pipe(stdout.write_all(bytes))?;
    if newline {
        tolerate_broken_pipe(stdout.write_all(b"\n"))?;
    }
    tolerate_broken_pipe(stdout.flush())
}

fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

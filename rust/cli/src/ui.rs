//! Terminal I/O helpers shared by the commands.

use std::io::{BufRead, Write};

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Writes `label`, then reads one trimmed line. `None` at end of input.
pub fn prompt(
    out: &mut dyn Write,
    stdin: &mut dyn BufRead,
    label: &str,
) -> std::io::Result<Option<String>> {
    write!(out, "{}> ", label)?;
    out.flush()?;
    let mut line = String::new();
    match stdin.read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line.trim().to_string())),
    }
}

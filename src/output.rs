//! Console output helpers.
//!
//! Plain-text, styled rendering of connection listings and sweep results.

use crate::types::{ConnectionRecord, Discovery, RecordSet};
use console::style;
use std::io::{self, Write};

/// Print the connection table with liveness markers.
pub fn print_records(records: &RecordSet) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if records.is_empty() {
        writeln!(out, "  {}", style("No saved connections.").dim())?;
        return Ok(());
    }

    writeln!(
        out,
        "  {:<6}  {:<20}  {:<24}  {:<15}  {}",
        style("STATE").bold(),
        style("NAME").bold(),
        style("HOSTNAME").bold(),
        style("IP ADDRESS").bold(),
        style("PORT").bold()
    )?;
    writeln!(
        out,
        "  {}",
        style("──────────────────────────────────────────────────────────────────────────").dim()
    )?;

    for record in records.values() {
        writeln!(
            out,
            "  {:<6}  {:<20}  {:<24}  {:<15}  {}",
            state_marker(record),
            record.name,
            placeholder(&record.hostname),
            placeholder(&record.ip_address),
            record.port
        )?;
    }

    Ok(())
}

/// Print one sweep discovery as it arrives.
pub fn print_discovery(found: &Discovery, known: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let name = if found.name.is_empty() {
        style("(no reverse-DNS name)").dim().to_string()
    } else {
        found.name.clone()
    };
    let note = if known {
        format!("  {}", style("[already saved]").yellow())
    } else {
        String::new()
    };

    writeln!(
        out,
        "  {}  {:<15}  {}{}",
        style("●").green(),
        found.ip,
        name,
        note
    )
}

fn state_marker(record: &ConnectionRecord) -> String {
    if record.is_alive {
        style("● up").green().to_string()
    } else {
        style("● down").red().to_string()
    }
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

/// Print an informational message.
pub fn print_info(message: &str) {
    println!("{} {}", style("info:").cyan().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("warning:").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

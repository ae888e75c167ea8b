// src/core/env_parser.rs

//! Parses `NAME=value` environment dumps.

use crate::models::EnvSnapshot;
use log::debug;
use std::io::{self, BufRead};

const UTF8_BOM: &str = "\u{feff}";

/// Parses an environment dump (`env`, `set`, or a PowerShell `Name=Value` enumeration)
/// into a snapshot, reading one line at a time.
///
/// - Both `\n` and `\r\n` terminate a line.
/// - Lines are decoded lossily, so console code-page bytes never abort the scan.
/// - Each line is split on its first `=`. Lines without one, and lines whose name part
///   is empty (cmd's `=C:=C:\` entries), are skipped.
/// - A name seen twice keeps its last value.
///
/// # Errors
/// Returns the reader's I/O error, if any.
pub fn parse_env_dump<R: BufRead>(mut reader: R) -> io::Result<EnvSnapshot> {
    let mut snapshot = EnvSnapshot::new();
    let mut buf = Vec::with_capacity(256);
    let mut first_line = true;
    let mut skipped = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let raw = String::from_utf8_lossy(&buf);
        let mut line = raw.trim_end_matches(['\n', '\r']);
        if first_line {
            line = line.strip_prefix(UTF8_BOM).unwrap_or(line);
            first_line = false;
        }

        match split_entry(line) {
            Some((key, value)) => {
                snapshot.insert(key.to_string(), value.to_string());
            }
            None => skipped += 1,
        }
    }

    debug!(
        "Parsed environment dump: {} variables, {} lines skipped",
        snapshot.len(),
        skipped
    );
    Ok(snapshot)
}

/// Convenience wrapper over [`parse_env_dump`] for text already in memory.
pub fn parse_env_str(text: &str) -> EnvSnapshot {
    let mut snapshot = EnvSnapshot::new();
    for line in text.lines() {
        if let Some((key, value)) = split_entry(line.strip_prefix(UTF8_BOM).unwrap_or(line)) {
            snapshot.insert(key.to_string(), value.to_string());
        }
    }
    snapshot
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}

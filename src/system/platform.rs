// src/system/platform.rs

//! Best-effort host and parent-shell detection, used to pick a sourcing dialect.
//!
//! Every probe swallows introspection failures and answers `false`.

use crate::models::Dialect;
use lazy_static::lazy_static;
use regex::Regex;
use std::process::{Command, Stdio};

lazy_static! {
    static ref COMPAT_LAYER_SIGNATURE: Regex = Regex::new(r"(?i)microsoft|cygwin|msys|mingw").unwrap();
    // The executable name as a whole path component, optionally quoted.
    static ref POWERSHELL_EXECUTABLE: Regex =
        Regex::new(r#"(?i)(^|[\\/\s"'])(powershell|pwsh)(\.exe)?($|[\s"'])"#).unwrap();
}

/// Host-family specific answers about where this process is running.
pub trait PlatformProbe: std::fmt::Debug {
    /// True only on Windows proper, not on a Unix-compatibility layer reporting as Windows.
    fn is_native_windows(&self) -> bool;

    /// True when the parent process is PowerShell.
    fn is_running_under_powershell(&self) -> bool;

    /// The dialect a script should be sourced with when the caller did not name one.
    fn preferred_dialect(&self) -> Dialect {
        if !self.is_native_windows() {
            Dialect::Posix
        } else if self.is_running_under_powershell() {
            Dialect::PowerShell
        } else {
            Dialect::Batch
        }
    }
}

/// Windows hosts: `uname -a` for compatibility layers, `wmic` for the parent command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsProbe;

impl PlatformProbe for WindowsProbe {
    fn is_native_windows(&self) -> bool {
        match capture("uname", &["-a"]) {
            Some(output) => !reports_compat_layer(&output),
            // No `uname` on the path: plain Windows.
            None => true,
        }
    }

    fn is_running_under_powershell(&self) -> bool {
        let own_pid = std::process::id().to_string();
        let Some(ppid) = wmic_value(&own_pid, "ParentProcessId") else {
            return false;
        };
        wmic_value(&ppid, "CommandLine").is_some_and(|line| names_powershell(&line))
    }
}

/// Unix hosts: never Windows; the parent command line comes from `/proc` where available.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnixProbe;

impl PlatformProbe for UnixProbe {
    fn is_native_windows(&self) -> bool {
        false
    }

    fn is_running_under_powershell(&self) -> bool {
        parent_command_line().is_some_and(|line| names_powershell(&line))
    }
}

/// The safe default: assume POSIX, assume not PowerShell.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackProbe;

impl PlatformProbe for FallbackProbe {
    fn is_native_windows(&self) -> bool {
        false
    }

    fn is_running_under_powershell(&self) -> bool {
        false
    }
}

/// Picks the probe for the host family this binary was built for.
pub fn detect_probe() -> Box<dyn PlatformProbe> {
    if cfg!(windows) {
        Box::new(WindowsProbe)
    } else if cfg!(unix) {
        Box::new(UnixProbe)
    } else {
        Box::new(FallbackProbe)
    }
}

/// Whether `uname` output carries a Unix-compatibility-layer signature.
pub fn reports_compat_layer(uname_output: &str) -> bool {
    COMPAT_LAYER_SIGNATURE.is_match(uname_output)
}

/// Whether a process command line names the PowerShell executable.
pub fn names_powershell(command_line: &str) -> bool {
    POWERSHELL_EXECUTABLE.is_match(command_line)
}

/// Extracts the value from `wmic ... get <Field>` output: a header line, then the value.
pub fn parse_wmic_value(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .nth(1)
        .map(str::to_string)
}

fn wmic_value(pid: &str, field: &str) -> Option<String> {
    let filter = format!("ProcessId={pid}");
    let output = capture("wmic", &["process", "where", filter.as_str(), "get", field])?;
    parse_wmic_value(&output)
}

#[cfg(unix)]
fn parent_command_line() -> Option<String> {
    let ppid = std::os::unix::process::parent_id();
    let raw = std::fs::read(format!("/proc/{ppid}/cmdline")).ok()?;
    Some(
        raw.split(|b| *b == 0)
            .filter(|part| !part.is_empty())
            .map(|part| String::from_utf8_lossy(part).into_owned())
            .collect::<Vec<_>>()
            .join(" "),
    )
}

#[cfg(not(unix))]
fn parent_command_line() -> Option<String> {
    None
}

/// Runs a probe command and returns its stdout, or `None` on any failure.
fn capture(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|e| log::debug!("Probe '{}' unavailable: {}", program, e))
        .ok()?;
    if !output.status.success() {
        log::debug!("Probe '{}' exited with {:?}", program, output.status.code());
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

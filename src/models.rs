// src/models.rs

//! Data types shared across the crate: dialects, requests, snapshots and `config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// A point-in-time mapping of environment variable names to values, as captured from a dump.
///
/// Names are non-empty and never contain `=`. Values may be empty and may contain `=`.
pub type EnvSnapshot = HashMap<String, String>;

// --- DIALECTS ---

/// The script-execution environments a script can be sourced under.
///
/// The set is closed: each variant's invocation syntax and dump format is tied
/// to its execution contract in `system::dialect`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// A POSIX-compatible shell (`sh -c ". script && env"`).
    Posix,
    /// The Windows command interpreter (`cmd.exe /S /C ""script" && set"`).
    Batch,
    /// Windows PowerShell, run with execution-policy bypass.
    PowerShell,
}

impl Dialect {
    /// All supported dialects, in a stable order.
    pub const ALL: [Self; 3] = [Self::Posix, Self::Batch, Self::PowerShell];

    /// The lowercase name used in configuration files and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Posix => "posix",
            Self::Batch => "batch",
            Self::PowerShell => "powershell",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// --- REQUESTS ---

/// A request to source one script under one dialect.
///
/// Immutable once built; `Sourcer::source` takes it by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    script: PathBuf,
    dialect: Dialect,
}

impl SourceRequest {
    /// Creates a new request. The script path is not checked here: a missing
    /// script surfaces as a subprocess failure when the request is sourced.
    pub fn new(script: impl Into<PathBuf>, dialect: Dialect) -> Self {
        Self {
            script: script.into(),
            dialect,
        }
    }

    /// The script to source.
    pub fn script(&self) -> &Path {
        &self.script
    }

    /// The dialect to run it under.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }
}

/// A single queued command: a program, its positional arguments and an optional working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name or path, resolved through `PATH`.
    pub program: String,
    /// Positional arguments.
    pub args: Vec<String>,
    /// Directory to run in; the current one when `None`.
    pub working_dir: Option<PathBuf>,
}

impl CommandSpec {
    /// Splits a command string on whitespace. There is no quoting support:
    /// `echo "a b"` yields the arguments `"a` and `b"`.
    ///
    /// Returns `None` for a blank command string.
    pub fn parse(command_line: &str, working_dir: Option<&Path>) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            working_dir: working_dir.map(Path::to_path_buf),
        })
    }

    /// The command re-joined with single spaces, for messages.
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

// --- INTERPRETERS ---

/// Language runtime families the locator knows default candidate names for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interpreter {
    /// `python3` or `python`.
    Python,
    /// `node`.
    Node,
    /// `pip3` or `pip`.
    Pip,
}

impl Interpreter {
    /// Maps a user-facing name to a family, if it is one of the known ones.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "python" => Some(Self::Python),
            "node" => Some(Self::Node),
            "pip" => Some(Self::Pip),
            _ => None,
        }
    }

    /// Preferred name first, legacy name after.
    pub fn default_candidates(self) -> Vec<String> {
        let names: &[&str] = match self {
            Self::Python => &["python3", "python"],
            Self::Node => &["node"],
            Self::Pip => &["pip3", "pip"],
        };
        names.iter().map(|s| s.to_string()).collect()
    }
}

// --- `config.toml` MODELS ---

/// The executables used to host each dialect.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ShellsConfig {
    /// Shell for [`Dialect::Posix`]. Defaults to `sh`.
    pub posix: PathBuf,
    /// Interpreter for [`Dialect::Batch`]. Defaults to `cmd.exe`.
    pub batch: PathBuf,
    /// Interpreter for [`Dialect::PowerShell`]. Defaults to `powershell.exe`.
    pub powershell: PathBuf,
}

impl Default for ShellsConfig {
    fn default() -> Self {
        Self {
            posix: PathBuf::from("sh"),
            batch: PathBuf::from("cmd.exe"),
            powershell: PathBuf::from("powershell.exe"),
        }
    }
}

impl ShellsConfig {
    /// The executable configured for `dialect`.
    pub fn for_dialect(&self, dialect: Dialect) -> &Path {
        match dialect {
            Dialect::Posix => &self.posix,
            Dialect::Batch => &self.batch,
            Dialect::PowerShell => &self.powershell,
        }
    }
}

/// Candidate name lists per interpreter family. An empty list means "use the defaults".
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InterpretersConfig {
    /// Names tried for Python.
    pub python: Vec<String>,
    /// Names tried for Node.js.
    pub node: Vec<String>,
    /// Names tried for pip.
    pub pip: Vec<String>,
}

impl InterpretersConfig {
    /// The candidates to try for `family`, falling back to the built-in list.
    pub fn candidates(&self, family: Interpreter) -> Vec<String> {
        let configured = match family {
            Interpreter::Python => &self.python,
            Interpreter::Node => &self.node,
            Interpreter::Pip => &self.pip,
        };
        if configured.is_empty() {
            family.default_candidates()
        } else {
            configured.clone()
        }
    }
}

/// Represents the deserialized structure of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// `[shells]`
    pub shells: ShellsConfig,
    /// `[interpreters]`
    pub interpreters: InterpretersConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_splits_on_any_whitespace() {
        let spec = CommandSpec::parse("  cargo   build\t--release ", None).unwrap();
        assert_eq!(spec.program, "cargo");
        assert_eq!(spec.args, vec!["build", "--release"]);
        assert_eq!(spec.display_line(), "cargo build --release");
    }

    #[test]
    fn test_command_spec_has_no_quoting() {
        let spec = CommandSpec::parse("echo \"a b\"", None).unwrap();
        assert_eq!(spec.args, vec!["\"a", "b\""]);
    }

    #[test]
    fn test_command_spec_blank_is_none() {
        assert!(CommandSpec::parse("   ", None).is_none());
        assert!(CommandSpec::parse("", None).is_none());
    }

    #[test]
    fn test_interpreter_candidates_fall_back_to_defaults() {
        let mut config = InterpretersConfig::default();
        assert_eq!(
            config.candidates(Interpreter::Python),
            vec!["python3", "python"]
        );

        config.pip = vec!["pip3.12".to_string()];
        assert_eq!(config.candidates(Interpreter::Pip), vec!["pip3.12"]);
        assert_eq!(config.candidates(Interpreter::Node), vec!["node"]);
    }

    #[test]
    fn test_dialect_names_round_trip_through_toml() {
        #[derive(Deserialize, Serialize)]
        struct Holder {
            dialect: Dialect,
        }
        let parsed: Holder = toml::from_str("dialect = \"powershell\"").unwrap();
        assert_eq!(parsed.dialect, Dialect::PowerShell);
        assert_eq!(Dialect::Batch.to_string(), "batch");
    }
}

// src/system/dialect.rs

//! Command lines for running a script under each [`Dialect`] and dumping the
//! environment it leaves behind.

use crate::models::{Dialect, ShellsConfig};
use crate::system::environment::ProcessEnv;
use crate::system::executor::{self, ExecutionError, StderrMode};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// A fully-formed subprocess invocation for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The shell or interpreter to spawn.
    pub program: PathBuf,
    /// Arguments, ending with the source-then-dump command line.
    pub args: Vec<String>,
    /// Pass `args` through unquoted on Windows.
    pub raw_args: bool,
    /// Whether stderr is captured for error reports or passed through.
    pub stderr: StderrMode,
}

impl Invocation {
    /// Builds the invocation that sources `script` under `dialect` with the
    /// executables from `shells`, followed by an environment dump on stdout.
    pub fn for_script(dialect: Dialect, script: &Path, shells: &ShellsConfig) -> Self {
        let program = shells.for_dialect(dialect).to_path_buf();
        let script = script.to_string_lossy();
        match dialect {
            Dialect::Posix => Self {
                program,
                args: vec!["-c".to_string(), format!(". {} && env", quote_posix(&script))],
                raw_args: false,
                stderr: StderrMode::Capture,
            },
            Dialect::Batch => Self {
                program,
                // With /S, cmd strips exactly the outer pair of quotes and runs the rest
                // verbatim, whatever special characters the script path contains.
                args: vec![
                    "/S".to_string(),
                    "/C".to_string(),
                    format!("\"{} && set\"", quote_batch(&script)),
                ],
                raw_args: true,
                stderr: StderrMode::Inherit,
            },
            Dialect::PowerShell => Self {
                program,
                args: vec![
                    "-NoProfile".to_string(),
                    "-NonInteractive".to_string(),
                    "-ExecutionPolicy".to_string(),
                    "Bypass".to_string(),
                    "-Command".to_string(),
                    format!(
                        "& {{ . {}; Get-ChildItem Env: | ForEach-Object {{ $_.Name + '=' + $_.Value }} }}",
                        quote_powershell(&script)
                    ),
                ],
                raw_args: false,
                stderr: StderrMode::Inherit,
            },
        }
    }

    /// A short human-readable form, used in logs and error messages.
    pub fn display_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Runs the invocation with a child environment seeded from `env` and
    /// returns the captured dump.
    pub fn capture(&self, env: &dyn ProcessEnv) -> Result<Vec<u8>, ExecutionError> {
        log::debug!("Invoking: {}", self.display_line());
        executor::execute_and_capture_output(
            &self.program,
            &self.args,
            self.raw_args,
            env.vars_os(),
            self.stderr,
            &self.display_line(),
        )
    }
}

fn quote_posix(script: &str) -> String {
    // `.` searches PATH for bare names, never the current directory.
    let script = if script.contains('/') {
        Cow::Borrowed(script)
    } else {
        Cow::Owned(format!("./{script}"))
    };
    // `try_quote` only fails on NUL, which no path can contain.
    match shlex::try_quote(&script) {
        Ok(quoted) => quoted.into_owned(),
        Err(_) => script.to_string(),
    }
}

fn quote_batch(script: &str) -> Cow<'_, str> {
    if script.contains([' ', '&', '(', ')', '^', '@', ',', ';', '=', '<', '>', '|']) && !script.starts_with('"') {
        Cow::Owned(format!("\"{script}\""))
    } else {
        Cow::Borrowed(script)
    }
}

fn quote_powershell(script: &str) -> String {
    format!("'{}'", script.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shells() -> ShellsConfig {
        ShellsConfig::default()
    }

    #[test]
    fn test_posix_invocation() {
        let inv = Invocation::for_script(Dialect::Posix, Path::new("env.sh"), &shells());
        assert_eq!(inv.program, PathBuf::from("sh"));
        assert_eq!(inv.args, vec!["-c", ". ./env.sh && env"]);
        assert_eq!(inv.stderr, StderrMode::Capture);
    }

    #[test]
    fn test_posix_quotes_paths_with_spaces() {
        let inv = Invocation::for_script(Dialect::Posix, Path::new("/tmp/my dir/env.sh"), &shells());
        assert_eq!(inv.args[1], ". '/tmp/my dir/env.sh' && env");
    }

    #[test]
    fn test_batch_invocation() {
        let inv = Invocation::for_script(Dialect::Batch, Path::new("C:\\tools\\vars.bat"), &shells());
        assert_eq!(inv.program, PathBuf::from("cmd.exe"));
        assert_eq!(inv.args, vec!["/S", "/C", "\"C:\\tools\\vars.bat && set\""]);
        assert_eq!(inv.stderr, StderrMode::Inherit);
    }

    #[test]
    fn test_batch_quotes_paths_with_spaces() {
        let inv = Invocation::for_script(
            Dialect::Batch,
            Path::new("C:\\Program Files\\vs\\vcvars.bat"),
            &shells(),
        );
        assert_eq!(inv.args[2], "\"\"C:\\Program Files\\vs\\vcvars.bat\" && set\"");
    }

    #[test]
    fn test_batch_survives_cmd_special_characters() {
        let inv = Invocation::for_script(
            Dialect::Batch,
            Path::new("C:\\Program Files (x86)\\Microsoft Visual Studio\\vcvarsall.bat"),
            &shells(),
        );
        assert_eq!(&inv.args[..2], ["/S", "/C"]);
        // cmd /S drops the first and last quote; the script path must stay quoted after that.
        let line = &inv.args[2];
        let inner = line
            .strip_prefix('"')
            .and_then(|l| l.strip_suffix('"'))
            .unwrap();
        assert_eq!(
            inner,
            "\"C:\\Program Files (x86)\\Microsoft Visual Studio\\vcvarsall.bat\" && set"
        );

        let at_sign = Invocation::for_script(Dialect::Batch, Path::new("C:\\env@home.bat"), &shells());
        assert_eq!(at_sign.args[2], "\"\"C:\\env@home.bat\" && set\"");
    }

    #[test]
    fn test_powershell_invocation() {
        let inv = Invocation::for_script(Dialect::PowerShell, Path::new("C:\\it's\\env.ps1"), &shells());
        assert_eq!(inv.program, PathBuf::from("powershell.exe"));
        assert!(inv.args.windows(2).any(|w| w[0] == "-ExecutionPolicy" && w[1] == "Bypass"));
        let command = inv.args.last().unwrap();
        assert!(command.starts_with("& { . 'C:\\it''s\\env.ps1'; Get-ChildItem Env:"));
        assert!(command.contains("$_.Name + '=' + $_.Value"));
        assert_eq!(inv.stderr, StderrMode::Inherit);
    }

    #[test]
    fn test_configured_shell_is_used() {
        let config = ShellsConfig {
            posix: PathBuf::from("/bin/dash"),
            ..ShellsConfig::default()
        };
        let inv = Invocation::for_script(Dialect::Posix, Path::new("a.sh"), &config);
        assert_eq!(inv.program, PathBuf::from("/bin/dash"));
        assert_eq!(inv.display_line(), "/bin/dash -c . ./a.sh && env");
    }
}

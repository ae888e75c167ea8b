// EN: src/system/executor.rs

//! Spawning child processes: command sequences and captured runs.

use crate::models::CommandSpec;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command as StdCommand, Stdio};
use thiserror::Error;

/// Failures of a spawned child process.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// There was nothing to run.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The program could not be started (not found, not executable, bad directory).
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, #[source] std::io::Error),
    /// The program ran and exited unsuccessfully.
    #[error("Command '{command}' exited with {}.{}", describe_code(.code), describe_stderr(.stderr))]
    NonZeroExitStatus {
        /// The command as displayed to the user.
        command: String,
        /// The exit code, or `None` if the child was killed by a signal.
        code: Option<i32>,
        /// Captured standard error; empty when stderr was not captured.
        stderr: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by a signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(" stderr: {trimmed}")
    }
}

/// How a captured child's standard error is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StderrMode {
    /// Collected and attached to the error if the child fails.
    Capture,
    /// Passed straight through to this process's stderr.
    Inherit,
}

/// Executes an ordered list of command strings in `working_dir`, one after another.
///
/// Each string is split on whitespace (no quoting, no shell metacharacters). Output is
/// inherited. The first command that fails to spawn or exits unsuccessfully stops the
/// sequence, and its error is returned; the remaining commands are never started.
/// Blank entries are skipped, and an empty list succeeds without spawning anything.
///
/// The list runs as given: repeated entries run repeatedly. See [`dedupe_commands`].
pub fn run_commands<S: AsRef<str>>(commands: &[S], working_dir: &Path) -> Result<(), ExecutionError> {
    if commands.is_empty() {
        return Ok(());
    }

    let clean_cwd = dunce::simplified(working_dir);
    for (position, command_line) in commands.iter().enumerate() {
        let Some(spec) = CommandSpec::parse(command_line.as_ref(), Some(clean_cwd)) else {
            log::debug!("Skipping blank command at position {}.", position);
            continue;
        };
        log::debug!(
            "Running command {}/{}: {}",
            position + 1,
            commands.len(),
            spec.display_line()
        );
        execute_command(&spec)?;
    }
    Ok(())
}

/// Runs one command with inherited stdio and waits for it to finish.
pub fn execute_command(spec: &CommandSpec) -> Result<(), ExecutionError> {
    if spec.program.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }

    let mut command = StdCommand::new(&spec.program);
    command
        .args(&spec.args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    if let Some(dir) = &spec.working_dir {
        command.current_dir(dunce::simplified(dir));
    }

    let status = command
        .status()
        .map_err(|e| ExecutionError::CommandFailed(spec.display_line(), e))?;

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: spec.display_line(),
            code: status.code(),
            stderr: String::new(),
        });
    }
    Ok(())
}

/// Spawns `program` with `args`, waits for it, and returns its raw standard output.
///
/// The child's environment is replaced by `env_vars` and stdin is closed, so the
/// result depends only on the arguments and the supplied environment.
///
/// `label` names the command in error messages. With `raw_args`, arguments reach the
/// child verbatim on Windows instead of being quoted (cmd.exe does its own parsing).
pub fn execute_and_capture_output<I, K, V>(
    program: &Path,
    args: &[String],
    raw_args: bool,
    env_vars: I,
    stderr_mode: StderrMode,
    label: &str,
) -> Result<Vec<u8>, ExecutionError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let stderr = match stderr_mode {
        StderrMode::Capture => Stdio::piped(),
        StderrMode::Inherit => Stdio::inherit(),
    };

    let mut command = StdCommand::new(program);
    push_args(&mut command, args, raw_args);
    let output = command
        .env_clear()
        .envs(env_vars)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(stderr)
        .output()
        .map_err(|e| ExecutionError::CommandFailed(label.to_string(), e))?;

    if !output.status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            command: label.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    log::debug!("'{}' produced {} bytes of output", label, output.stdout.len());
    Ok(output.stdout)
}

#[cfg(windows)]
fn push_args(command: &mut StdCommand, args: &[String], raw: bool) {
    use std::os::windows::process::CommandExt;
    if raw {
        for arg in args {
            command.raw_arg(arg);
        }
    } else {
        command.args(args);
    }
}

#[cfg(not(windows))]
fn push_args(command: &mut StdCommand, args: &[String], _raw: bool) {
    command.args(args);
}

/// Removes repeated command strings, keeping the first occurrence of each in order.
/// Comparison ignores surrounding whitespace.
pub fn dedupe_commands<S: AsRef<str>>(commands: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    commands
        .iter()
        .map(|c| c.as_ref().trim())
        .filter(|c| seen.insert(c.to_string()))
        .map(str::to_string)
        .collect()
}

// src/cli/mod.rs

//! Command-line front end.

use clap::Parser;
use thiserror::Error;

pub mod dispatcher;
pub mod handlers;

/// envsource: source shell scripts into the current environment and locate runtimes.
///
/// Actions:
///   source <SCRIPT> [--dialect D] [--print | --json] [-- COMMAND...]
///   run [--dir DIR] [--dedupe] [--source SCRIPT] COMMAND...
///   which <python|node|pip|NAME>...
///   detect
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The action followed by its arguments. Everything after the action is passed
    /// through untouched, so each action parses (and documents) its own flags.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Outcomes that end the program with a specific exit code rather than an error message.
#[derive(Error, Debug)]
pub enum CliExit {
    /// A child command run by an action exited unsuccessfully with this code.
    #[error("Command exited with code {0}.")]
    ChildExitCode(i32),
}

// EN: src/bin/envsource.rs

//! The `envsource` binary.

use clap::Parser;
use colored::*;
use envsource::cli::{Cli, CliExit, dispatcher};

/// The main entry point of the `envsource` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);

    if let Err(e) = dispatcher::dispatch(cli.args) {
        // A trailing command's exit code becomes ours, without an extra message.
        if let Some(CliExit::ChildExitCode(code)) = e.downcast_ref::<CliExit>() {
            std::process::exit(*code);
        }

        // Handlers parse their own arguments; let clap render help and usage errors itself.
        if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
            clap_err.exit();
        }

        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

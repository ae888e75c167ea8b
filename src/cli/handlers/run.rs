//! `envsource run <command>...`

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;

use super::commons::{self, DialectChoice};
use crate::{
    core::paths,
    models::AppConfig,
    system::{environment::SystemEnv, executor, platform},
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Runs command strings in order, stopping at the first failure."
)]
struct RunArgs {
    /// The working directory for every command. Defaults to the current directory.
    #[arg(long, short = 'C')]
    dir: Option<String>,

    /// Run each distinct command once, in first-seen order.
    #[arg(long)]
    dedupe: bool,

    /// A script to source before running the commands.
    #[arg(long, short)]
    source: Option<String>,

    /// The dialect for `--source`.
    #[arg(long, short, value_enum, default_value_t = DialectChoice::Auto, requires = "source")]
    dialect: DialectChoice,

    /// The commands. Each one is split on whitespace; quoting is not supported.
    #[arg(required = true)]
    commands: Vec<String>,
}

/// Main entry point for the 'run' command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;

    let working_dir = match &run_args.dir {
        Some(dir) => paths::expand_user_path(dir)?,
        None => std::env::current_dir().context("Could not determine the current directory")?,
    };

    if let Some(script) = &run_args.source {
        let probe = platform::detect_probe();
        let applied = commons::source_script(
            script,
            run_args.dialect,
            probe.as_ref(),
            config,
            &mut SystemEnv,
        )?;
        log::debug!("Sourced {} variables before running commands", applied.len());
    }

    let commands = if run_args.dedupe {
        executor::dedupe_commands(&run_args.commands)
    } else {
        run_args.commands
    };

    executor::run_commands(&commands, &working_dir)?;
    println!("{} {} command(s).", "Finished".green(), commands.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_args(params: &[&str]) -> Vec<String> {
        params.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_run_args() {
        let parsed =
            RunArgs::try_parse_from(to_args(&["--dedupe", "-C", "/tmp", "cargo build", "cargo test"]))
                .unwrap();
        assert!(parsed.dedupe);
        assert_eq!(parsed.dir.as_deref(), Some("/tmp"));
        assert_eq!(parsed.commands, vec!["cargo build", "cargo test"]);
        assert!(parsed.source.is_none());
    }

    #[test]
    fn test_commands_are_required() {
        assert!(RunArgs::try_parse_from(to_args(&["--dedupe"])).is_err());
    }

    #[test]
    fn test_dialect_requires_source() {
        assert!(RunArgs::try_parse_from(to_args(&["--dialect", "batch", "make"])).is_err());
    }
}

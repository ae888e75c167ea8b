// EN: src/cli/handlers/source.rs

//! `envsource source <script> [-- command...]`

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;

use super::commons::{self, DialectChoice};
use crate::{
    cli::CliExit,
    models::{AppConfig, CommandSpec},
    system::{
        environment::SystemEnv,
        executor::{self, ExecutionError},
        platform,
    },
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Sources a script and imports the environment it leaves behind."
)]
struct SourceArgs {
    /// The script to source. `~` and `$VAR` are expanded.
    script: String,

    /// The dialect to run the script under.
    #[arg(long, short, value_enum, default_value_t = DialectChoice::Auto)]
    dialect: DialectChoice,

    /// Print the imported variables as NAME=VALUE lines.
    #[arg(long, short)]
    print: bool,

    /// Print the imported variables as a JSON object.
    #[arg(long, conflicts_with = "print")]
    json: bool,

    /// A command to run with the sourced environment, after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// The main handler for the `source` command.
///
/// Sourcing changes this process's environment, which only matters to what runs
/// afterwards: the imported variables are printed, or handed to a trailing command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let source_args = SourceArgs::try_parse_from(&args)?;
    let probe = platform::detect_probe();

    let mut env = SystemEnv;
    let applied = commons::source_script(
        &source_args.script,
        source_args.dialect,
        probe.as_ref(),
        config,
        &mut env,
    )?;

    if source_args.print || source_args.json {
        commons::print_snapshot(&applied, source_args.json)?;
    } else {
        eprintln!(
            "{} {} variables from '{}'",
            "Imported".green(),
            applied.len(),
            source_args.script.yellow()
        );
    }

    let command = trailing_command(source_args.command);
    if command.is_empty() {
        return Ok(());
    }
    run_with_sourced_env(command)
}

/// Drops a leading `--` separator if the outer parser left it in place.
fn trailing_command(mut command: Vec<String>) -> Vec<String> {
    if command.first().is_some_and(|first| first == "--") {
        command.remove(0);
    }
    command
}

fn run_with_sourced_env(mut command: Vec<String>) -> Result<()> {
    let program = command.remove(0);
    let spec = CommandSpec {
        program,
        args: command,
        working_dir: None,
    };

    match executor::execute_command(&spec) {
        Ok(()) => Ok(()),
        Err(ExecutionError::NonZeroExitStatus { code: Some(code), .. }) => {
            Err(CliExit::ChildExitCode(code).into())
        }
        Err(e) => Err(anyhow!(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_trailing_command() {
        let args: Vec<String> = ["--dialect", "posix", "env.sh", "--", "make", "-j4"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let parsed = SourceArgs::try_parse_from(&args).unwrap();
        assert_eq!(parsed.script, "env.sh");
        assert_eq!(parsed.dialect, DialectChoice::Posix);
        assert_eq!(trailing_command(parsed.command), vec!["make", "-j4"]);
    }

    #[test]
    fn test_print_and_json_conflict() {
        let args = vec!["--print".to_string(), "--json".to_string(), "env.sh".to_string()];
        assert!(SourceArgs::try_parse_from(&args).is_err());
    }

    #[test]
    fn test_trailing_command_without_separator() {
        let command = vec!["env".to_string()];
        assert_eq!(trailing_command(command), vec!["env"]);
        assert!(trailing_command(vec!["--".to_string()]).is_empty());
    }
}

// src/cli/handlers/which.rs

//! `envsource which <name>...`: resolve interpreters on `PATH`.

use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;

use crate::{
    models::{AppConfig, Interpreter},
    system::{environment::SystemEnv, locator::Locator},
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Locates interpreters on the search path."
)]
struct WhichArgs {
    /// `python`, `node`, `pip`, or any executable name.
    #[arg(required = true)]
    names: Vec<String>,
}

/// Candidate names for a requested interpreter: the configured family list, or the name itself.
fn candidates_for(name: &str, config: &AppConfig) -> Vec<String> {
    match Interpreter::from_name(name) {
        Some(family) => config.interpreters.candidates(family),
        None => vec![name.to_string()],
    }
}

/// Prints the resolved path of each name. Fails if any name cannot be found.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let which_args = WhichArgs::try_parse_from(&args)?;
    let locator = Locator::from_env(&SystemEnv);

    let mut missing = 0usize;
    for name in &which_args.names {
        match locator.find_first(&candidates_for(name, config)) {
            Ok(path) => println!("{:<8} {}", name.cyan(), path.display()),
            Err(e) => {
                missing += 1;
                eprintln!("{:<8} {}", name.cyan(), e.to_string().red());
            }
        }
    }

    if missing > 0 {
        bail!("{} of {} interpreter(s) not found.", missing, which_args.names.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_families_use_config() {
        let mut config = AppConfig::default();
        assert_eq!(candidates_for("Python", &config), vec!["python3", "python"]);

        config.interpreters.node = vec!["nodejs".to_string(), "node".to_string()];
        assert_eq!(candidates_for("node", &config), vec!["nodejs", "node"]);
    }

    #[test]
    fn test_unknown_names_are_single_candidates() {
        assert_eq!(candidates_for("ruby", &AppConfig::default()), vec!["ruby"]);
    }
}

// src/cli/handlers/commons.rs

//! Shared pieces used by more than one handler.

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use std::collections::BTreeMap;

use crate::{
    core::{paths, sourcing::Sourcer},
    models::{AppConfig, Dialect, EnvSnapshot, SourceRequest},
    system::{environment::ProcessEnv, platform::PlatformProbe},
};

/// The dialect requested on the command line. `auto` asks the platform probe.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialectChoice {
    /// Let the platform probe decide.
    #[default]
    Auto,
    /// `sh`
    Posix,
    /// `cmd.exe`
    Batch,
    /// Windows PowerShell.
    Powershell,
}

impl DialectChoice {
    /// Resolves the choice to a concrete dialect.
    pub fn resolve(self, probe: &dyn PlatformProbe) -> Dialect {
        match self {
            Self::Auto => {
                let dialect = probe.preferred_dialect();
                log::debug!("Auto-selected dialect: {}", dialect);
                dialect
            }
            Self::Posix => Dialect::Posix,
            Self::Batch => Dialect::Batch,
            Self::Powershell => Dialect::PowerShell,
        }
    }
}

/// Expands the script path, builds the request and sources it into `env`.
pub fn source_script(
    script: &str,
    choice: DialectChoice,
    probe: &dyn PlatformProbe,
    config: &AppConfig,
    env: &mut dyn ProcessEnv,
) -> Result<EnvSnapshot> {
    let script_path = paths::expand_user_path(script)?;
    let dialect = choice.resolve(probe);
    let request = SourceRequest::new(script_path, dialect);
    Sourcer::with_shells(config.shells.clone())
        .source(request, env)
        .with_context(|| format!("Could not source '{}'", script))
}

/// Prints a snapshot sorted by name, either as `NAME=VALUE` lines or as a JSON object.
pub fn print_snapshot(snapshot: &EnvSnapshot, as_json: bool) -> Result<()> {
    let sorted: BTreeMap<&String, &String> = snapshot.iter().collect();
    if as_json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
    } else {
        for (key, value) in sorted {
            println!("{}={}", key.cyan(), value);
        }
    }
    Ok(())
}

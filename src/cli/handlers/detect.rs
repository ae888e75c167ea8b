//! `envsource detect`: report what the platform probe sees.

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    core::paths,
    models::{AppConfig, Dialect},
    system::platform,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows host detection results and the default dialect."
)]
struct DetectArgs {}

/// The main handler for the `detect` command.
pub fn handle(args: Vec<String>, config: &AppConfig) -> Result<()> {
    let _detect_args = DetectArgs::try_parse_from(&args)?;
    let probe = platform::detect_probe();

    println!("\n--- {} ---", "envsource host detection".yellow());
    println!("  {:<20} {}", "native windows".blue(), probe.is_native_windows());
    println!(
        "  {:<20} {}",
        "under powershell".blue(),
        probe.is_running_under_powershell()
    );
    println!(
        "  {:<20} {}",
        "default dialect".blue(),
        probe.preferred_dialect().to_string().green().bold()
    );

    println!("\n--- {} ---", "shells".yellow());
    for dialect in Dialect::ALL {
        println!(
            "  {:<20} {}",
            dialect.name().blue(),
            config.shells.for_dialect(dialect).display()
        );
    }

    if let Ok(path) = paths::get_config_file_path() {
        println!("\n  {:<20} {}", "config file".blue(), path.display());
    }
    Ok(())
}

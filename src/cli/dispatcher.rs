//! Maps an action name to its handler.

use anyhow::{Result, anyhow};

use crate::{cli::handlers, core::config_loader, models::AppConfig};

/// Defines a system command, its aliases, and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    about: &'static str,
    handler: fn(Vec<String>, &AppConfig) -> Result<()>,
}

/// The single source of truth for all system commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "source",
        aliases: &["."],
        about: "Source a script and import the environment it leaves behind.",
        handler: handlers::source::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        about: "Run command strings in order, stopping at the first failure.",
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "which",
        aliases: &["locate"],
        about: "Locate interpreters on the search path.",
        handler: handlers::which::handle,
    },
    CommandDefinition {
        name: "detect",
        aliases: &[],
        about: "Show host detection results and the default dialect.",
        handler: handlers::detect::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes `<action> [args...]` to the matching handler.
pub fn dispatch(mut all_args: Vec<String>) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    if all_args.is_empty() {
        print_actions();
        return Ok(());
    }
    let action = all_args.remove(0);
    let args = all_args;

    let command = find_command(&action).ok_or_else(|| {
        anyhow!(
            "Unknown action '{}'. Available actions: {}.",
            action,
            COMMAND_REGISTRY
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>()
                .join(", ")
        )
    })?;

    let config = config_loader::load_config()?;
    (command.handler)(args, &config)
}

fn print_actions() {
    println!("Usage: envsource <ACTION> [ARGS...]\n\nActions:");
    for command in COMMAND_REGISTRY {
        println!("  {:<8} {}", command.name, command.about);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("source").map(|c| c.name), Some("source"));
        assert_eq!(find_command(".").map(|c| c.name), Some("source"));
        assert_eq!(find_command("locate").map(|c| c.name), Some("which"));
        assert!(find_command("install").is_none());
    }

    #[test]
    fn test_unknown_action_lists_actions() {
        let err = dispatch(vec!["bogus".to_string()]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bogus"));
        assert!(message.contains("source, run, which, detect"));
    }
}

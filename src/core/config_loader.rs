// src/core/config_loader.rs

//! # Config Loader
//!
//! Reads `config.toml`, which names the shell executable used for each dialect and the
//! candidate names tried for each interpreter family. Missing keys take their defaults;
//! a missing file is created with the defaults written out.

use crate::{core::paths, models::AppConfig};
use std::{fs, path::Path};
use thiserror::Error;

/// Errors raised while reading or writing `config.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration directory could not be resolved.
    #[error(transparent)]
    Path(#[from] paths::PathError),
    /// The file is not valid TOML for [`AppConfig`].
    #[error("Failed to parse '{path}': {source}")]
    TomlParse {
        /// The file that failed to parse.
        path: String,
        /// The underlying parser error.
        #[source]
        source: toml::de::Error,
    },
    /// The defaults could not be rendered as TOML.
    #[error("Failed to serialize config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Loads the configuration from the default location, writing a default file first
/// if none exists yet.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let config_path = paths::get_config_file_path()?;
    load_or_init(&config_path)
}

/// Loads the configuration at `path`, creating it with defaults when absent.
pub fn load_or_init(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        let default_config = AppConfig::default();
        let toml_string = toml::to_string_pretty(&default_config)?;
        fs::write(path, toml_string)?;
        log::debug!("Wrote default config to '{}'", path.display());
        return Ok(default_config);
    }
    load_from_file(path)
}

/// Loads the configuration at `path`. The file must exist.
pub fn load_from_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content).map_err(|source| ConfigError::TomlParse {
        path: path.display().to_string(),
        source,
    })?;
    log::debug!("Loaded config from '{}': {:?}", path.display(), config);
    Ok(config)
}

/// Parses configuration text.
pub fn parse_config(content: &str) -> Result<AppConfig, toml::de::Error> {
    toml::from_str(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Interpreter;
    use std::path::PathBuf;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config(
            r#"
            [shells]
            posix = "/bin/bash"

            [interpreters]
            python = ["python3.12", "python3"]
            "#,
        )
        .unwrap();

        assert_eq!(config.shells.posix, PathBuf::from("/bin/bash"));
        assert_eq!(config.shells.batch, PathBuf::from("cmd.exe"));
        assert_eq!(
            config.interpreters.candidates(Interpreter::Python),
            vec!["python3.12", "python3"]
        );
        assert_eq!(config.interpreters.candidates(Interpreter::Node), vec!["node"]);
    }

    #[test]
    fn test_load_or_init_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let first = load_or_init(&path).unwrap();
        assert!(path.is_file());
        let second = load_or_init(&path).unwrap();

        assert_eq!(first, AppConfig::default());
        assert_eq!(second, first);
    }

    #[test]
    fn test_invalid_toml_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[shells\nposix = 1").unwrap();

        let err = load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}

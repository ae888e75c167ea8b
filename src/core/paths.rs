// src/core/paths.rs

//! Configuration directory lookup and user path expansion.

use crate::constants::{APP_DIR_NAME, CONFIG_DIR_ENV, CONFIG_FILENAME};
use lazy_static::lazy_static;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Errors raised while resolving or expanding paths.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform reports no config directory and no override is set.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The config directory does not exist and could not be created.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// The directory that could not be created.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// `~` or a `$VAR` reference in a user path could not be expanded.
    #[error("Could not expand path '{path}': {message}")]
    Expansion {
        /// The path as given.
        path: String,
        /// What went wrong during expansion.
        message: String,
    },
}

/// Returns the configuration directory (`$ENVSOURCE_CONFIG_DIR`, or `~/.config/envsource`).
/// Creates it if it doesn't exist.
///
/// Memoized: the first call computes and caches the path.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    // A poisoned lock only means another thread panicked mid-lookup; the cached value is still sound.
    let mut cached_path_guard = CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir()
            .ok_or(PathError::ConfigDirNotFound)?
            .join(APP_DIR_NAME),
    };

    if !config_path.exists() {
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path to `config.toml` inside the configuration directory.
pub fn get_config_file_path() -> Result<PathBuf, PathError> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILENAME))
}

/// Expands `~` and `$VAR`/`${VAR}` references in a user-supplied path.
pub fn expand_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let expanded = shellexpand::full(raw).map_err(|e| PathError::Expansion {
        path: raw.to_string(),
        message: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_plain_path_is_unchanged() {
        assert_eq!(
            expand_user_path("scripts/env.sh").unwrap(),
            PathBuf::from("scripts/env.sh")
        );
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_user_path("~/env.sh").unwrap(), home.join("env.sh"));
        }
    }

    #[test]
    fn test_expand_unknown_variable_fails() {
        let err = expand_user_path("$ENVSOURCE_TEST_SURELY_UNSET_VAR/env.sh").unwrap_err();
        assert!(matches!(err, PathError::Expansion { .. }));
    }
}

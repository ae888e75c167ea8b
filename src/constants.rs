// src/constants.rs

//! Names shared by the config loader and path helpers.

/// The name of the configuration directory inside the system config dir.
pub const APP_DIR_NAME: &str = "envsource";

/// The name of the configuration file (inside the configuration directory).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that overrides the configuration directory.
pub const CONFIG_DIR_ENV: &str = "ENVSOURCE_CONFIG_DIR";

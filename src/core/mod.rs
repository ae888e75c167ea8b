// src/core/mod.rs

//! Config loading, dump parsing and the sourcing engine.

pub mod config_loader;
pub mod env_parser;
pub mod paths;
pub mod sourcing;

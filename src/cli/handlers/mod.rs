// EN: src/cli/handlers/mod.rs

//! One module per CLI action.

pub mod commons;
pub mod detect;
pub mod run;
pub mod source;
pub mod which;

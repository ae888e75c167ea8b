// src/core/sourcing.rs

//! # Environment Sourcing Engine
//!
//! Emulates the shell `source` operation: a script runs in a dialect-specific child
//! process, the child dumps its environment, and the dump is written back onto a
//! [`ProcessEnv`]. Variables are only ever added or overwritten, never removed.

use crate::{
    core::env_parser,
    models::{Dialect, EnvSnapshot, ShellsConfig, SourceRequest},
    system::{
        dialect::Invocation,
        environment::{self, ProcessEnv},
        executor::ExecutionError,
    },
};
use std::io::Cursor;
use std::path::PathBuf;
use thiserror::Error;

/// Why a script could not be sourced. The target environment is unchanged in every case.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The dialect's shell could not be started, or it exited unsuccessfully.
    #[error("Failed to execute {dialect} script '{}': {source}", .script.display())]
    ScriptExecution {
        /// The script that was being sourced.
        script: PathBuf,
        /// The dialect it was run under.
        dialect: Dialect,
        /// What went wrong with the child process.
        #[source]
        source: ExecutionError,
    },
    /// The captured dump could not be read.
    #[error("Failed to read the environment dump of '{}': {source}", .script.display())]
    DumpRead {
        /// The script that was being sourced.
        script: PathBuf,
        /// The underlying read error.
        #[source]
        source: std::io::Error,
    },
}

/// Produces the raw environment dump for a request.
///
/// The real implementation is [`ShellInvoker`]; tests substitute canned output.
pub trait Invoker {
    /// Runs the request's script and returns everything it printed to stdout.
    fn invoke(&self, request: &SourceRequest, env: &dyn ProcessEnv) -> Result<Vec<u8>, SourceError>;
}

/// Spawns the dialect's shell for each request.
#[derive(Debug, Clone, Default)]
pub struct ShellInvoker {
    shells: ShellsConfig,
}

impl ShellInvoker {
    /// An invoker that runs the executables named in `shells`.
    pub fn new(shells: ShellsConfig) -> Self {
        Self { shells }
    }
}

impl Invoker for ShellInvoker {
    fn invoke(&self, request: &SourceRequest, env: &dyn ProcessEnv) -> Result<Vec<u8>, SourceError> {
        Invocation::for_script(request.dialect(), request.script(), &self.shells)
            .capture(env)
            .map_err(|source| SourceError::ScriptExecution {
                script: request.script().to_path_buf(),
                dialect: request.dialect(),
                source,
            })
    }
}

/// Sources scripts into a [`ProcessEnv`].
#[derive(Debug, Clone, Default)]
pub struct Sourcer<I = ShellInvoker> {
    invoker: I,
}

impl Sourcer<ShellInvoker> {
    /// A sourcer that runs real shells from `shells`.
    pub fn with_shells(shells: ShellsConfig) -> Self {
        Self::new(ShellInvoker::new(shells))
    }
}

impl<I: Invoker> Sourcer<I> {
    /// A sourcer that obtains dumps from `invoker`.
    pub fn new(invoker: I) -> Self {
        Self { invoker }
    }

    /// Runs the request's script, parses the dump and applies every variable in it
    /// onto `env`, overwriting existing values. Returns the applied snapshot.
    ///
    /// The dump is captured in full before anything is written, so a failed
    /// invocation leaves `env` untouched. Entries the host cannot store (NUL bytes)
    /// are skipped, as are lossily decoded values for keys that already hold a
    /// non-Unicode value.
    ///
    /// # Errors
    /// `SourceError::ScriptExecution` if the child fails to start or exits unsuccessfully;
    /// `SourceError::DumpRead` if the captured output cannot be read.
    pub fn source(&self, request: SourceRequest, env: &mut dyn ProcessEnv) -> Result<EnvSnapshot, SourceError> {
        log::debug!(
            "Sourcing '{}' as {}",
            request.script().display(),
            request.dialect()
        );

        let dump = self.invoker.invoke(&request, env)?;
        let mut snapshot =
            env_parser::parse_env_dump(Cursor::new(dump)).map_err(|source| SourceError::DumpRead {
                script: request.script().to_path_buf(),
                source,
            })?;

        snapshot.retain(|key, value| {
            let storable = environment::is_storable(key, value);
            if !storable {
                log::warn!("Skipping variable '{}': it cannot be stored in the environment", key.escape_debug());
                return false;
            }
            // A lossily decoded copy of a non-Unicode value must not replace the raw bytes.
            if value.contains(char::REPLACEMENT_CHARACTER) && env.var(key).is_none() && env.var_os(key).is_some() {
                log::debug!("Keeping the existing non-Unicode value of '{}'", key);
                return false;
            }
            true
        });

        for (key, value) in &snapshot {
            env.set_var(key, value);
        }

        log::debug!(
            "Applied {} variables from '{}'",
            snapshot.len(),
            request.script().display()
        );
        Ok(snapshot)
    }
}

// src/system/locator.rs

//! Finds executables on a search path, trying candidate names in order.

use crate::models::{Interpreter, InterpretersConfig};
use crate::system::environment::ProcessEnv;
use std::ffi::OsString;
use std::path::PathBuf;
use thiserror::Error;

/// Why a lookup found nothing.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LocateError {
    /// None of the candidates resolved.
    #[error("No executable named {} was found on the search path.", .candidates.join(" or "))]
    NotFound {
        /// Every name that was tried, in order.
        candidates: Vec<String>,
    },
    /// The candidate list was empty.
    #[error("No candidate names were given to search for.")]
    NoCandidates,
}

/// Resolves executable names against a search path, trying candidates in order.
#[derive(Debug, Clone)]
pub struct Locator {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl Locator {
    /// A locator over an explicit search path (in the host's `PATH` format).
    pub fn new(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// A locator over the `PATH` of `env`. A missing `PATH` finds nothing.
    pub fn from_env(env: &dyn ProcessEnv) -> Self {
        Self {
            search_path: env.var_os("PATH"),
            cwd: std::env::current_dir().unwrap_or_default(),
        }
    }

    /// Returns the absolute path of the first candidate found on the search path.
    ///
    /// # Errors
    /// `LocateError::NotFound` when no candidate resolves.
    pub fn find_first<S: AsRef<str>>(&self, candidates: &[S]) -> Result<PathBuf, LocateError> {
        if candidates.is_empty() {
            return Err(LocateError::NoCandidates);
        }

        for name in candidates {
            let name = name.as_ref();
            let Some(search_path) = &self.search_path else {
                break;
            };
            match which::which_in(name, Some(search_path), &self.cwd) {
                Ok(path) => {
                    log::debug!("Resolved '{}' to '{}'", name, path.display());
                    return Ok(path);
                }
                Err(e) => log::debug!("'{}' not found on search path: {}", name, e),
            }
        }

        Err(LocateError::NotFound {
            candidates: candidates.iter().map(|c| c.as_ref().to_string()).collect(),
        })
    }

    /// Locates an interpreter family using the configured (or default) candidate list.
    pub fn find_interpreter(
        &self,
        family: Interpreter,
        config: &InterpretersConfig,
    ) -> Result<PathBuf, LocateError> {
        self.find_first(&config.candidates(family))
    }

    /// `python3`, then `python`.
    pub fn find_python(&self) -> Result<PathBuf, LocateError> {
        self.find_first(&Interpreter::Python.default_candidates())
    }

    /// `node`.
    pub fn find_node(&self) -> Result<PathBuf, LocateError> {
        self.find_first(&Interpreter::Node.default_candidates())
    }

    /// `pip3`, then `pip`.
    pub fn find_pip(&self) -> Result<PathBuf, LocateError> {
        self.find_first(&Interpreter::Pip.default_candidates())
    }
}

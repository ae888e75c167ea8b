//! Locate language runtimes and emulate the shell `source` operation across POSIX
//! shells, `cmd.exe` batch files and PowerShell scripts.
//!
//! ```no_run
//! use envsource::core::sourcing::Sourcer;
//! use envsource::models::{Dialect, ShellsConfig, SourceRequest};
//! use envsource::system::environment::SystemEnv;
//!
//! let sourcer = Sourcer::with_shells(ShellsConfig::default());
//! let applied = sourcer.source(SourceRequest::new("./env.sh", Dialect::Posix), &mut SystemEnv)?;
//! println!("imported {} variables", applied.len());
//! # Ok::<(), envsource::core::sourcing::SourceError>(())
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

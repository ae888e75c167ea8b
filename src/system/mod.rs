//! # System Interaction Layer
//!
//! Abstractions over the operating system: processes, the environment table and
//! the executable search path.
//!
//! ## Modules
//!
//! - **`dialect`**: builds the per-dialect command line that runs a script and dumps
//!   the resulting environment, and captures that dump.
//! - **`environment`**: the `ProcessEnv` trait with the real (`SystemEnv`) and in-memory
//!   (`MemoryEnv`) environment tables.
//! - **`executor`**: spawns processes, either capturing stdout or running an ordered
//!   command sequence with inherited output.
//! - **`locator`**: resolves interpreter names against the search path, in fallback order.
//! - **`platform`**: best-effort detection of native Windows and a PowerShell parent.

pub mod dialect;
pub mod environment;
pub mod executor;
pub mod locator;
pub mod platform;

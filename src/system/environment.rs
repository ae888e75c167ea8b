// src/system/environment.rs

//! The process environment as a swappable table.

use crate::models::EnvSnapshot;
use std::collections::HashMap;
use std::ffi::OsString;

/// Raw environment entries, in whatever encoding the host stores them.
pub type OsEnvPairs = Vec<(OsString, OsString)>;

/// Read/write access to a process-wide environment table.
///
/// The sourcing engine writes through this trait so callers can choose between the
/// real process environment (`SystemEnv`) and an in-memory table (`MemoryEnv`).
pub trait ProcessEnv {
    /// Returns the value of `key`, if set and valid Unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Sets `key` to `value`, replacing any previous value.
    fn set_var(&mut self, key: &str, value: &str);

    /// A copy of every variable currently set whose name and value are valid Unicode.
    fn vars(&self) -> EnvSnapshot;

    /// Returns the raw value of `key`, including values that are not valid Unicode.
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.var(key).map(OsString::from)
    }

    /// A copy of every variable currently set, without dropping non-Unicode entries.
    /// Used to seed child processes.
    fn vars_os(&self) -> OsEnvPairs {
        self.vars()
            .into_iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }
}

/// The real environment of the current process.
///
/// Writes are not synchronized. Callers that source scripts while other threads read
/// or write the environment must serialize those accesses themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl ProcessEnv for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    #[allow(unsafe_code)]
    fn set_var(&mut self, key: &str, value: &str) {
        // SAFETY: the environment is only mutated from the thread driving a sourcing
        // call; concurrent access is documented as the caller's responsibility.
        unsafe { std::env::set_var(key, value) };
    }

    fn vars(&self) -> EnvSnapshot {
        // `vars_os` does not panic on non-Unicode entries; those are dropped here.
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn vars_os(&self) -> OsEnvPairs {
        std::env::vars_os().collect()
    }
}

/// An in-memory environment table, for tests and for embedding the engine
/// without touching the real process environment.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table seeded with the given pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Seeds a table with the variables a child process needs to start and find
    /// programs (`PATH` and, on Windows, `SystemRoot`/`PATHEXT`/`ComSpec`), copied
    /// from the real environment.
    pub fn with_host_essentials() -> Self {
        let mut env = Self::new();
        for key in ["PATH", "SystemRoot", "PATHEXT", "ComSpec", "WINDIR"] {
            if let Ok(value) = std::env::var(key) {
                env.set_var(key, &value);
            }
        }
        env
    }

    /// Number of variables in the table.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the table holds no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl ProcessEnv for MemoryEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set_var(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    fn vars(&self) -> EnvSnapshot {
        self.vars.clone()
    }
}

/// Whether the host can store `key=value` at all. `std::env::set_var` panics on
/// an empty key, a key containing `=` or NUL, or a value containing NUL.
pub fn is_storable(key: &str, value: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\0']) && !value.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_env_overwrites() {
        let mut env = MemoryEnv::from_pairs([("FOO", "old")]);
        env.set_var("FOO", "new");
        env.set_var("BAR", "");
        assert_eq!(env.var("FOO").as_deref(), Some("new"));
        assert_eq!(env.var("BAR").as_deref(), Some(""));
        assert_eq!(env.len(), 2);
    }

    #[test]
    fn test_memory_env_vars_is_a_copy() {
        let mut env = MemoryEnv::from_pairs([("A", "1")]);
        let snapshot = env.vars();
        env.set_var("A", "2");
        assert_eq!(snapshot.get("A").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_is_storable() {
        assert!(is_storable("PATH", "/usr/bin"));
        assert!(is_storable("EMPTY", ""));
        assert!(is_storable("EQ", "a=b"));
        assert!(!is_storable("", "x"));
        assert!(!is_storable("A=B", "x"));
        assert!(!is_storable("NUL\0", "x"));
        assert!(!is_storable("OK", "bad\0value"));
    }

    #[test]
    fn test_memory_env_os_views_match() {
        let env = MemoryEnv::from_pairs([("A", "1")]);
        assert_eq!(env.var_os("A"), Some(OsString::from("1")));
        assert_eq!(env.var_os("MISSING"), None);
        assert_eq!(env.vars_os(), vec![(OsString::from("A"), OsString::from("1"))]);
    }

    #[cfg(unix)]
    #[test]
    #[allow(unsafe_code)]
    fn test_system_env_keeps_non_unicode_entries() {
        use std::os::unix::ffi::OsStrExt;

        let key = "ENVSOURCE_TEST_NON_UNICODE_VALUE";
        let raw = std::ffi::OsStr::from_bytes(b"caf\xe9");
        // SAFETY: the key is unique to this test.
        unsafe { std::env::set_var(key, raw) };

        assert_eq!(SystemEnv.var(key), None);
        assert_eq!(SystemEnv.var_os(key).as_deref(), Some(raw));
        assert!(!SystemEnv.vars().contains_key(key));
        assert!(SystemEnv.vars_os().iter().any(|(k, v)| k == key && v == raw));
    }
}

//! Sourcing into the real process environment.
#![cfg(unix)]
#![allow(unsafe_code)]

use envsource::core::sourcing::Sourcer;
use envsource::models::{Dialect, ShellsConfig, SourceRequest};
use envsource::system::environment::SystemEnv;
use std::ffi::OsStr;
use std::fs;
use std::os::unix::ffi::OsStrExt;

fn sourcer() -> Sourcer {
    Sourcer::with_shells(ShellsConfig::default())
}

#[test]
fn sourced_variables_land_in_the_process_environment() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("env.sh");
    fs::write(&script, "export ENVSOURCE_IT_SYSTEM=from_script\n").unwrap();

    let applied = sourcer()
        .source(SourceRequest::new(&script, Dialect::Posix), &mut SystemEnv)
        .unwrap();

    assert_eq!(
        applied.get("ENVSOURCE_IT_SYSTEM").map(String::as_str),
        Some("from_script")
    );
    assert_eq!(
        std::env::var("ENVSOURCE_IT_SYSTEM").as_deref(),
        Ok("from_script")
    );
}

#[test]
fn non_unicode_variables_are_inherited_and_preserved() {
    let raw = OsStr::from_bytes(b"caf\xe9");
    // SAFETY: the key is used by this test only.
    unsafe { std::env::set_var("ENVSOURCE_IT_RAW", raw) };

    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("check.sh");
    fs::write(
        &script,
        "if [ -n \"${ENVSOURCE_IT_RAW+x}\" ]; then export ENVSOURCE_IT_SAW=yes; else export ENVSOURCE_IT_SAW=no; fi\n",
    )
    .unwrap();

    sourcer()
        .source(SourceRequest::new(&script, Dialect::Posix), &mut SystemEnv)
        .unwrap();

    assert_eq!(std::env::var("ENVSOURCE_IT_SAW").as_deref(), Ok("yes"));
    assert_eq!(std::env::var_os("ENVSOURCE_IT_RAW").as_deref(), Some(raw));
}

//! Tests for the override resolution loader.
//!
//! Responsibilities:
//! - Test the six precedence policies and their selection.
//! - Test precedence between environment and direct overrides.
//! - Test case-sensitive and case-insensitive resolution.
//! - Test file reading, dotenv loading, and process-environment capture.
//!
//! Invariants:
//! - Tests that touch the real process environment or the working
//!   directory take `env_lock()` and are marked `#[serial]`; everything
//!   else resolves against an injected `EnvSnapshot`.

use std::sync::Mutex;


use crate::env::EnvSnapshot;
use crate::loader::OverrideLoader;

/// Returns the global test lock for process-environment isolation.
pub fn env_lock() -> &'static Mutex<()> {
    crate::test_util::global_test_lock()
}

pub const SAMPLE_INI: &str = "\
[SECTION1]
key1 = value1
key2 = value2

[SECTION2]
key3 = value3
";

pub const SAMPLE_INI_WITH_DEFAULT: &str = "\
[DEFAULT]
default_key = default_value

[SECTION1]
key1 = value1
";

/// Build a snapshot from literal pairs.
pub fn snapshot<const N: usize>(pairs: [(&str, &str); N]) -> EnvSnapshot {
    pairs.into_iter().collect()
}

/// A loader pinned to an empty environment so the host's variables
/// cannot leak into a test.
pub fn isolated_loader() -> OverrideLoader {
    OverrideLoader::new().with_env_snapshot(EnvSnapshot::default())
}

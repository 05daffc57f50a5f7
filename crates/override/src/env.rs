//! Environment variable snapshot.
//!
//! Responsibilities:
//! - Capture the process environment (or an injected mapping) once per
//!   resolution, so the engine reads a stable, testable view instead of
//!   a live ambient global.
//! - Answer the two lookups the strategies need: exact-prefix
//!   enumeration for create-new scans, and per-name lookup (exact or
//!   upper-folded) for existing-key scans.
//!
//! Invariants:
//! - Prefix enumeration matches by exact string prefix; the case mode
//!   only affects how derived names are folded for comparison.
//! - Enumeration order is sorted by variable name, so conflicting
//!   targets resolve deterministically.

use std::collections::HashMap;

use crate::codec::CaseMode;

/// Read-only view of the environment at resolution time.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
    // Upper-folded name -> first value seen under that folding.
    folded: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Look up a variable under the given case mode: exact in sensitive
    /// mode, upper-folded in insensitive mode.
    pub fn lookup(&self, name: &str, case: CaseMode) -> Option<&str> {
        match case {
            CaseMode::Sensitive => self.get(name),
            CaseMode::Insensitive => self
                .folded
                .get(&name.to_uppercase())
                .map(String::as_str),
        }
    }

    /// All variables whose name starts with `prefix`, with the prefix
    /// stripped, sorted by the remaining key.
    pub fn with_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        let mut matches: Vec<(String, String)> = self
            .vars
            .iter()
            .filter_map(|(name, value)| {
                name.strip_prefix(prefix)
                    .map(|key| (key.to_string(), value.clone()))
            })
            .collect();
        matches.sort();
        matches
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = EnvSnapshot::default();
        for (name, value) in iter {
            let name = name.into();
            let value = value.into();
            snapshot
                .folded
                .entry(name.to_uppercase())
                .or_insert_with(|| value.clone());
            snapshot.vars.insert(name, value);
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_and_folded_lookup() {
        let snapshot: EnvSnapshot = [("TEST_section1__key1", "v")].into_iter().collect();
        assert_eq!(snapshot.get("TEST_section1__key1"), Some("v"));
        assert_eq!(snapshot.get("TEST_SECTION1__KEY1"), None);
        assert_eq!(
            snapshot.lookup("TEST_SECTION1__KEY1", CaseMode::Insensitive),
            Some("v")
        );
        assert_eq!(
            snapshot.lookup("TEST_SECTION1__KEY1", CaseMode::Sensitive),
            None
        );
    }

    #[test]
    fn with_prefix_strips_and_sorts() {
        let snapshot: EnvSnapshot = [
            ("TEST_B__k", "2"),
            ("TEST_A__k", "1"),
            ("OTHER_C__k", "3"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            snapshot.with_prefix("TEST_"),
            vec![
                ("A__k".to_string(), "1".to_string()),
                ("B__k".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn with_prefix_matches_exact_prefix_only() {
        let snapshot: EnvSnapshot = [("test_A__k", "1")].into_iter().collect();
        assert!(snapshot.with_prefix("TEST_").is_empty());
    }

    #[test]
    fn from_process_sees_real_variables() {
        temp_env::with_vars([("_INIFOLD_SNAPSHOT_PROBE", Some("set"))], || {
            let snapshot = EnvSnapshot::from_process();
            assert_eq!(snapshot.get("_INIFOLD_SNAPSHOT_PROBE"), Some("set"));
        });
    }
}

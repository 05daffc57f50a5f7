//! Line-oriented INI reader.
//!
//! Responsibilities:
//! - Parse INI text into an `IniStore`, merging over whatever the store
//!   already holds (later sources win on conflicting keys).
//! - Enforce strictness within a single source: a section header or an
//!   option repeated in the same source is an error.
//!
//! Does NOT handle:
//! - Line continuations or inline comments; a comment occupies a whole
//!   line (`#` or `;`) and a value runs to end of line.
//!
//! Invariants:
//! - A section block headed by the store's default-section name
//!   populates the defaults.
//! - Options must appear under a section header.

use std::collections::HashSet;
use std::path::Path;

use crate::document::IniStore;
use crate::error::StoreError;

impl IniStore {
    /// Parse INI text and merge it into this store.
    pub fn read_string(&mut self, text: &str) -> Result<(), StoreError> {
        // Strictness is per source: duplicates are fine across calls.
        let mut seen_sections: HashSet<String> = HashSet::new();
        let mut seen_options: HashSet<(String, String)> = HashSet::new();
        let mut current: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            let lineno = idx + 1;

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err(StoreError::Syntax {
                        line: lineno,
                        message: format!("unterminated section header {line:?}"),
                    });
                };
                let name = name.trim();
                if name.is_empty() {
                    return Err(StoreError::Syntax {
                        line: lineno,
                        message: "empty section name".to_string(),
                    });
                }
                if !seen_sections.insert(name.to_string()) {
                    return Err(StoreError::DuplicateSection {
                        name: name.to_string(),
                    });
                }
                if name != self.default_section() && !self.has_section(name) {
                    self.add_section(name)?;
                }
                current = Some(name.to_string());
                continue;
            }

            let Some((key, value)) = split_assignment(line) else {
                return Err(StoreError::Syntax {
                    line: lineno,
                    message: format!("expected `key = value`, got {line:?}"),
                });
            };
            let Some(section) = current.as_deref() else {
                return Err(StoreError::Syntax {
                    line: lineno,
                    message: format!("option {key:?} appears before any section header"),
                });
            };
            let normalized = self.option_transform().apply(key);
            if !seen_options.insert((section.to_string(), normalized)) {
                return Err(StoreError::DuplicateOption {
                    section: section.to_string(),
                    option: key.to_string(),
                });
            }
            self.set(section, key, value)?;
        }

        tracing::debug!(
            sections = seen_sections.len(),
            "merged INI source into store"
        );
        Ok(())
    }

    /// Read and merge a single INI file.
    pub fn read_file(&mut self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StoreError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        self.read_string(&text)
    }
}

/// Split `key = value` or `key: value` on the first delimiter.
fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let eq = line.find('=');
    let colon = line.find(':');
    let at = match (eq, colon) {
        (Some(e), Some(c)) => e.min(c),
        (Some(e), None) => e,
        (None, Some(c)) => c,
        (None, None) => return None,
    };
    let (key, rest) = line.split_at(at);
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, rest[1..].trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
[SECTION1]
key1 = value1
key2 = value2

[SECTION2]
key3 = value3
";

    #[test]
    fn parses_sections_and_options() {
        let mut store = IniStore::new();
        store.read_string(SAMPLE).unwrap();
        assert_eq!(store.get("SECTION1", "key1"), Some("value1"));
        assert_eq!(store.get("SECTION1", "key2"), Some("value2"));
        assert_eq!(store.get("SECTION2", "key3"), Some("value3"));
    }

    #[test]
    fn parses_default_section_block() {
        let mut store = IniStore::new();
        store
            .read_string("[DEFAULT]\ndefault_key = default_value\n\n[SECTION1]\nkey1 = value1\n")
            .unwrap();
        assert_eq!(store.defaults().get("default_key"), Some("default_value"));
        assert_eq!(store.get("SECTION1", "default_key"), Some("default_value"));
        assert!(!store.has_section("DEFAULT"));
    }

    #[test]
    fn colon_delimiter_and_comments() {
        let mut store = IniStore::new();
        store
            .read_string("# leading comment\n[s]\na: 1\n; another comment\nb = x=y\n")
            .unwrap();
        assert_eq!(store.get("s", "a"), Some("1"));
        // Only the first delimiter splits.
        assert_eq!(store.get("s", "b"), Some("x=y"));
    }

    #[test]
    fn indented_lines_are_tolerated() {
        let mut store = IniStore::new();
        store
            .read_string("    [SECTION1]\n    key1 = value1\n")
            .unwrap();
        assert_eq!(store.get("SECTION1", "key1"), Some("value1"));
    }

    #[test]
    fn later_sources_override_earlier_ones() {
        let mut store = IniStore::new();
        store.read_string("[s]\nk = first\n").unwrap();
        store.read_string("[s]\nk = second\nextra = 1\n").unwrap();
        assert_eq!(store.get("s", "k"), Some("second"));
        assert_eq!(store.get("s", "extra"), Some("1"));
    }

    #[test]
    fn duplicate_section_in_one_source_is_an_error() {
        let mut store = IniStore::new();
        let err = store.read_string("[s]\na = 1\n[s]\nb = 2\n").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateSection { .. }));
    }

    #[test]
    fn duplicate_option_in_one_source_is_an_error() {
        let mut store = IniStore::new();
        let err = store.read_string("[s]\na = 1\nA = 2\n").unwrap_err();
        // Duplicate after normalization: `A` folds onto `a`.
        assert!(matches!(err, StoreError::DuplicateOption { .. }));
    }

    #[test]
    fn option_before_section_is_an_error() {
        let mut store = IniStore::new();
        let err = store.read_string("orphan = 1\n").unwrap_err();
        assert!(matches!(err, StoreError::Syntax { line: 1, .. }));
    }

    #[test]
    fn bare_line_is_a_syntax_error() {
        let mut store = IniStore::new();
        let err = store.read_string("[s]\nnot an assignment\n").unwrap_err();
        assert!(matches!(err, StoreError::Syntax { line: 2, .. }));
    }

    #[test]
    fn read_file_reports_path_on_missing_file() {
        let mut store = IniStore::new();
        let err = store.read_file("/nonexistent/inifold.ini").unwrap_err();
        assert!(matches!(err, StoreError::FileRead { .. }));
    }

    #[test]
    fn read_file_parses_on_disk_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, SAMPLE).unwrap();
        let mut store = IniStore::new();
        store.read_file(&path).unwrap();
        assert_eq!(store.get("SECTION2", "key3"), Some("value3"));
    }
}

//! In-memory INI document model.
//!
//! Responsibilities:
//! - Hold named sections and a distinguished default section, both as
//!   insertion-ordered option maps.
//! - Expose configparser-style accessors: options absent from a section
//!   but present in the default section read through as fall-backs
//!   without being copied into the section's own storage.
//! - Apply the configured `OptionTransform` to every option name on
//!   both writes and lookups.
//!
//! Does NOT handle:
//! - INI text parsing (see read.rs) or rendering (see write.rs).
//! - Override precedence of any kind; this is plain storage.
//!
//! Invariants:
//! - Section names are stored and matched exactly as given; any
//!   case-insensitive aliasing is a concern of callers.
//! - The default section is never a member of `sections()` and cannot be
//!   added via `add_section`.

use std::collections::HashMap;

use crate::error::StoreError;
use crate::transform::OptionTransform;

/// Conventional name of the default section.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// A single named group of options, in insertion order.
#[derive(Debug, Clone)]
pub struct Section {
    name: String,
    keys: Vec<String>,
    values: HashMap<String, String>,
}

impl Section {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            keys: Vec::new(),
            values: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up an option by its already-normalized name.
    pub fn get(&self, option: &str) -> Option<&str> {
        self.values.get(option).map(String::as_str)
    }

    pub fn contains(&self, option: &str) -> bool {
        self.values.contains_key(option)
    }

    /// Iterate options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.keys
            .iter()
            .map(|k| (k.as_str(), self.values[k].as_str()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn set(&mut self, option: String, value: String) {
        if !self.values.contains_key(&option) {
            self.keys.push(option.clone());
        }
        self.values.insert(option, value);
    }

    pub(crate) fn remove(&mut self, option: &str) -> Option<String> {
        let removed = self.values.remove(option);
        if removed.is_some() {
            self.keys.retain(|k| k != option);
        }
        removed
    }
}

/// Mutable INI document: ordered named sections plus the default section.
#[derive(Debug, Clone)]
pub struct IniStore {
    default_name: String,
    defaults: Section,
    sections: Vec<Section>,
    index: HashMap<String, usize>,
    transform: OptionTransform,
}

impl Default for IniStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IniStore {
    pub fn new() -> Self {
        Self::with_default_section(DEFAULT_SECTION)
    }

    /// Create a store whose default section has a custom name.
    pub fn with_default_section(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            defaults: Section::new(name.clone()),
            default_name: name,
            sections: Vec::new(),
            index: HashMap::new(),
            transform: OptionTransform::default(),
        }
    }

    /// Replace the option-name normalization. Applies to options stored
    /// or looked up after this call; does not re-normalize existing keys.
    pub fn with_option_transform(mut self, transform: OptionTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn option_transform(&self) -> &OptionTransform {
        &self.transform
    }

    /// Name of the default section.
    pub fn default_section(&self) -> &str {
        &self.default_name
    }

    /// The default section's own options.
    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// Names of the named (non-default) sections, in insertion order.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Whether a named section exists. The default section is not a
    /// named section and always reports `false` here.
    pub fn has_section(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Borrow a section by exact name; the default section's name
    /// resolves to the defaults.
    pub fn section(&self, name: &str) -> Option<&Section> {
        if name == self.default_name {
            return Some(&self.defaults);
        }
        self.index.get(name).map(|&i| &self.sections[i])
    }

    /// Add an empty named section.
    pub fn add_section(&mut self, name: impl Into<String>) -> Result<(), StoreError> {
        let name = name.into();
        if name == self.default_name {
            return Err(StoreError::ReservedSection { name });
        }
        if self.index.contains_key(&name) {
            return Err(StoreError::DuplicateSection { name });
        }
        self.index.insert(name.clone(), self.sections.len());
        self.sections.push(Section::new(name));
        Ok(())
    }

    /// Whether `option` is readable from `section`, either locally or
    /// through the default-section fall-back. `false` when the section
    /// itself is missing.
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        let option = self.transform.apply(option);
        if section == self.default_name {
            return self.defaults.contains(&option);
        }
        match self.index.get(section) {
            Some(&i) => self.sections[i].contains(&option) || self.defaults.contains(&option),
            None => false,
        }
    }

    /// Read an option, falling back to the default section's value when
    /// the section does not set it locally.
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        let option = self.transform.apply(option);
        if section == self.default_name {
            return self.defaults.get(&option);
        }
        let i = *self.index.get(section)?;
        self.sections[i]
            .get(&option)
            .or_else(|| self.defaults.get(&option))
    }

    /// Set an option in a section. Writing to the default section's name
    /// stores into the defaults; writing to a missing named section is
    /// an error.
    pub fn set(
        &mut self,
        section: &str,
        option: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), StoreError> {
        let option = self.transform.apply(&option.into());
        if section == self.default_name {
            self.defaults.set(option, value.into());
            return Ok(());
        }
        match self.index.get(section) {
            Some(&i) => {
                self.sections[i].set(option, value.into());
                Ok(())
            }
            None => Err(StoreError::NoSection {
                name: section.to_string(),
            }),
        }
    }

    /// Remove an option from a section's own storage. Returns whether a
    /// local value was removed; default-section fall-backs are untouched.
    pub fn remove_option(&mut self, section: &str, option: &str) -> Result<bool, StoreError> {
        let option = self.transform.apply(option);
        if section == self.default_name {
            return Ok(self.defaults.remove(&option).is_some());
        }
        match self.index.get(section) {
            Some(&i) => Ok(self.sections[i].remove(&option).is_some()),
            None => Err(StoreError::NoSection {
                name: section.to_string(),
            }),
        }
    }

    /// All option names readable from `section`: its own options in
    /// insertion order, then inherited defaults it does not shadow.
    pub fn options(&self, section: &str) -> Option<Vec<String>> {
        if section == self.default_name {
            return Some(self.defaults.keys.clone());
        }
        let i = *self.index.get(section)?;
        let local = &self.sections[i];
        let mut names = local.keys.clone();
        for key in &self.defaults.keys {
            if !local.contains(key) {
                names.push(key.clone());
            }
        }
        Some(names)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> IniStore {
        let mut store = IniStore::new();
        store.add_section("SECTION1").unwrap();
        store.set("SECTION1", "key1", "value1").unwrap();
        store.set("SECTION1", "key2", "value2").unwrap();
        store.add_section("SECTION2").unwrap();
        store.set("SECTION2", "key3", "value3").unwrap();
        store
    }

    #[test]
    fn set_and_get_round_trip() {
        let store = sample();
        assert_eq!(store.get("SECTION1", "key1"), Some("value1"));
        assert_eq!(store.get("SECTION2", "key3"), Some("value3"));
        assert_eq!(store.get("SECTION2", "missing"), None);
        assert_eq!(store.get("NOPE", "key1"), None);
    }

    #[test]
    fn option_names_are_normalized_by_default() {
        let mut store = sample();
        store.set("SECTION1", "MixedCase", "v").unwrap();
        assert_eq!(store.get("SECTION1", "mixedcase"), Some("v"));
        assert_eq!(store.get("SECTION1", "MIXEDCASE"), Some("v"));
        assert!(store.has_option("SECTION1", "MixedCase"));
    }

    #[test]
    fn identity_transform_preserves_option_case() {
        let mut store = IniStore::new().with_option_transform(OptionTransform::Identity);
        store.add_section("S").unwrap();
        store.set("S", "Key", "v").unwrap();
        assert_eq!(store.get("S", "Key"), Some("v"));
        assert_eq!(store.get("S", "key"), None);
    }

    #[test]
    fn defaults_read_through_but_are_not_copied() {
        let mut store = sample();
        store.set("DEFAULT", "shared", "fallback").unwrap();
        assert_eq!(store.get("SECTION1", "shared"), Some("fallback"));
        assert!(store.has_option("SECTION1", "shared"));
        // Not materialized into the section's own storage.
        assert!(!store.section("SECTION1").unwrap().contains("shared"));
        // Local value shadows the default.
        store.set("SECTION1", "shared", "local").unwrap();
        assert_eq!(store.get("SECTION1", "shared"), Some("local"));
        assert_eq!(store.get("SECTION2", "shared"), Some("fallback"));
    }

    #[test]
    fn default_section_is_not_a_named_section() {
        let store = sample();
        assert!(!store.has_section("DEFAULT"));
        assert!(store.sections().all(|s| s != "DEFAULT"));
        // But it is addressable.
        assert!(store.section("DEFAULT").is_some());
    }

    #[test]
    fn custom_default_section_name() {
        let mut store = IniStore::with_default_section("COMMON");
        store.set("COMMON", "default_key1", "default_value1").unwrap();
        store.add_section("SECTION1").unwrap();
        assert_eq!(store.get("SECTION1", "default_key1"), Some("default_value1"));
        assert!(matches!(
            store.add_section("COMMON"),
            Err(StoreError::ReservedSection { .. })
        ));
    }

    #[test]
    fn set_into_missing_section_is_an_error() {
        let mut store = IniStore::new();
        assert!(matches!(
            store.set("NOPE", "k", "v"),
            Err(StoreError::NoSection { .. })
        ));
    }

    #[test]
    fn duplicate_add_section_is_an_error() {
        let mut store = sample();
        assert!(matches!(
            store.add_section("SECTION1"),
            Err(StoreError::DuplicateSection { .. })
        ));
    }

    #[test]
    fn remove_option_only_touches_local_storage() {
        let mut store = sample();
        store.set("DEFAULT", "shared", "fallback").unwrap();
        store.set("SECTION1", "shared", "local").unwrap();
        assert!(store.remove_option("SECTION1", "shared").unwrap());
        // The fall-back becomes visible again.
        assert_eq!(store.get("SECTION1", "shared"), Some("fallback"));
        assert!(!store.remove_option("SECTION1", "shared").unwrap());
    }

    #[test]
    fn options_lists_local_then_inherited() {
        let mut store = sample();
        store.set("DEFAULT", "shared", "fallback").unwrap();
        let names = store.options("SECTION1").unwrap();
        assert_eq!(names, vec!["key1", "key2", "shared"]);
        assert_eq!(store.options("DEFAULT").unwrap(), vec!["shared"]);
        assert!(store.options("NOPE").is_none());
    }

    #[test]
    fn sections_preserve_insertion_order() {
        let store = sample();
        let names: Vec<_> = store.sections().collect();
        assert_eq!(names, vec!["SECTION1", "SECTION2"]);
    }
}

//! The six override strategies and their shared resolution passes.
//!
//! Responsibilities:
//! - Execute one strategy against a store: an environment pass (over
//!   existing keys, or creating keys from every prefixed variable)
//!   followed by a direct-override pass (existing-only or creating).
//! - Resolve section names case-insensitively through an alias index
//!   when the insensitive case mode is active.
//!
//! Does NOT handle:
//! - Choosing the strategy (see select.rs) or reading files (builder.rs).
//!
//! Invariants:
//! - The environment pass always runs before the direct pass, so a key
//!   touched by both ends up with the direct value.
//! - No-new passes never change the store's key set; misses are logged
//!   at debug level and dropped.
//! - In insensitive mode newly created sections are stored lower-cased,
//!   and a case-insensitively-equal existing section is reused instead
//!   of creating a duplicate.

use std::collections::{BTreeMap, HashMap};

use inifold_store::IniStore;

use crate::codec::{CaseMode, KeyCodec};
use crate::env::EnvSnapshot;
use crate::error::OverrideError;

/// Direct overrides, keyed by flat override key. `None` unsets the
/// target option.
pub(crate) type OverrideMap = BTreeMap<String, Option<String>>;

/// The six precedence policies. Selected once, executed once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Strategy {
    NoPrefixNoNew,
    NoPrefixNewDirect,
    PrefixNoNew,
    PrefixNewEnv,
    PrefixNewDirect,
    PrefixNewEnvNewDirect,
}

/// Alias index from lower-cased section name to the canonically-stored
/// name. Rebuilt from the store before a pass and kept current as the
/// pass creates sections.
struct SectionIndex {
    by_lower: HashMap<String, String>,
}

impl SectionIndex {
    fn build(store: &IniStore) -> Self {
        let mut by_lower = HashMap::new();
        for name in store.sections() {
            // First match by lower-case folding wins.
            by_lower
                .entry(name.to_lowercase())
                .or_insert_with(|| name.to_string());
        }
        Self { by_lower }
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        self.by_lower.get(&name.to_lowercase()).map(String::as_str)
    }

    fn insert(&mut self, canonical: &str) {
        self.by_lower
            .entry(canonical.to_lowercase())
            .or_insert_with(|| canonical.to_string());
    }
}

/// Executes one strategy against a store. Fully self-contained: all
/// inputs are injected, nothing persists across invocations.
pub(crate) struct Resolver<'a> {
    store: &'a mut IniStore,
    codec: KeyCodec,
    env: &'a EnvSnapshot,
    prefix: &'a str,
    overrides: &'a OverrideMap,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        store: &'a mut IniStore,
        codec: KeyCodec,
        env: &'a EnvSnapshot,
        prefix: &'a str,
        overrides: &'a OverrideMap,
    ) -> Self {
        Self {
            store,
            codec,
            env,
            prefix,
            overrides,
        }
    }

    pub(crate) fn execute(mut self, strategy: Strategy) -> Result<(), OverrideError> {
        tracing::debug!(?strategy, prefix = %self.prefix, "executing override strategy");
        match strategy {
            Strategy::NoPrefixNoNew => self.override_direct_existing(),
            Strategy::NoPrefixNewDirect => self.override_direct_create(),
            Strategy::PrefixNoNew => {
                self.override_env_existing()?;
                self.override_direct_existing()
            }
            Strategy::PrefixNewEnv => {
                self.override_env_create()?;
                self.override_direct_existing()
            }
            Strategy::PrefixNewDirect => {
                self.override_env_existing()?;
                self.override_direct_create()
            }
            Strategy::PrefixNewEnvNewDirect => {
                self.override_env_create()?;
                self.override_direct_create()
            }
        }
    }

    /// Environment pass, no-new mode: walk every existing
    /// (section, option) pair, inherited defaults included, derive its
    /// variable name, and overwrite where the variable is set. This
    /// scans the store, not the environment.
    fn override_env_existing(&mut self) -> Result<(), OverrideError> {
        let sections: Vec<String> = self.store.sections().map(String::from).collect();
        for section in sections {
            for option in self.store.options(&section).unwrap_or_default() {
                self.apply_env_var(&section, &option)?;
            }
        }
        let default = self.store.default_section().to_string();
        for option in self.store.options(&default).unwrap_or_default() {
            self.apply_env_var(&default, &option)?;
        }
        Ok(())
    }

    fn apply_env_var(&mut self, section: &str, option: &str) -> Result<(), OverrideError> {
        let var = self.codec.env_var_for(self.prefix, section, option);
        match self.env.lookup(&var, self.codec.case()) {
            Some(value) => {
                tracing::debug!(%section, %option, %var, "environment override applied");
                let value = value.to_string();
                self.store.set(section, option, value)?;
            }
            None => tracing::debug!(%var, "environment variable not set"),
        }
        Ok(())
    }

    /// Environment pass, create-new mode: every variable under the
    /// prefix is an override key; sections are created as needed.
    fn override_env_create(&mut self) -> Result<(), OverrideError> {
        let mut index = SectionIndex::build(self.store);
        for (key, value) in self.env.with_prefix(self.prefix) {
            let (section, option) = self.codec.parse_key(&key);
            let target = self.resolve_or_create(&mut index, &section)?;
            tracing::debug!(section = %target, %option, "environment override set");
            self.store.set(&target, &option, value)?;
        }
        Ok(())
    }

    /// Direct pass, no-new mode: apply only where the target section
    /// and option already exist; drop the rest silently.
    fn override_direct_existing(&mut self) -> Result<(), OverrideError> {
        let index = SectionIndex::build(self.store);
        let overrides = self.overrides;
        for (key, value) in overrides {
            let (section, option) = self.codec.parse_key(key);
            match self.resolve_existing(&index, &section) {
                Some(target) if self.store.has_option(&target, &option) => {
                    self.apply_direct(&target, &option, value.as_deref())?;
                }
                _ => tracing::debug!(%key, "direct override for unknown target ignored"),
            }
        }
        Ok(())
    }

    /// Direct pass, create-new mode: create the section if missing,
    /// then set unconditionally. Unsets still require an existing target.
    fn override_direct_create(&mut self) -> Result<(), OverrideError> {
        let mut index = SectionIndex::build(self.store);
        let overrides = self.overrides;
        for (key, value) in overrides {
            let (section, option) = self.codec.parse_key(key);
            match value {
                Some(_) => {
                    let target = self.resolve_or_create(&mut index, &section)?;
                    self.apply_direct(&target, &option, value.as_deref())?;
                }
                None => match self.resolve_existing(&index, &section) {
                    Some(target) => self.apply_direct(&target, &option, None)?,
                    None => tracing::debug!(%key, "unset for unknown section ignored"),
                },
            }
        }
        Ok(())
    }

    fn apply_direct(
        &mut self,
        section: &str,
        option: &str,
        value: Option<&str>,
    ) -> Result<(), OverrideError> {
        match value {
            Some(value) => {
                tracing::debug!(%section, %option, "direct override applied");
                self.store.set(section, option, value)?;
            }
            None => {
                let removed = self.store.remove_option(section, option)?;
                tracing::debug!(%section, %option, removed, "direct unset applied");
            }
        }
        Ok(())
    }

    /// Resolve a parsed section name to the canonical stored name, or
    /// `None` when it does not exist. The default section always exists.
    fn resolve_existing(&self, index: &SectionIndex, section: &str) -> Option<String> {
        if self.codec.is_default_section(section) {
            return Some(self.store.default_section().to_string());
        }
        match self.codec.case() {
            CaseMode::Sensitive => self
                .store
                .has_section(section)
                .then(|| section.to_string()),
            CaseMode::Insensitive => index.resolve(section).map(String::from),
        }
    }

    /// Resolve a parsed section name, creating the section when absent.
    /// In insensitive mode new sections are stored lower-cased and a
    /// case-insensitive match reuses the existing section.
    fn resolve_or_create(
        &mut self,
        index: &mut SectionIndex,
        section: &str,
    ) -> Result<String, OverrideError> {
        if self.codec.is_default_section(section) {
            return Ok(self.store.default_section().to_string());
        }
        match self.codec.case() {
            CaseMode::Sensitive => {
                if !self.store.has_section(section) {
                    self.store.add_section(section)?;
                    index.insert(section);
                }
                Ok(section.to_string())
            }
            CaseMode::Insensitive => {
                if let Some(canonical) = index.resolve(section) {
                    return Ok(canonical.to_string());
                }
                let folded = section.to_lowercase();
                self.store.add_section(folded.as_str())?;
                index.insert(&folded);
                Ok(folded)
            }
        }
    }
}

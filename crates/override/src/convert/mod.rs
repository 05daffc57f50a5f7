//! Typed materialization of a resolved store.
//!
//! Responsibilities:
//! - Convert a store into a nested section → option → value mapping.
//! - Deserialize a store into any `T: DeserializeOwned` through a
//!   type-directed walk: scalar fields parse their string value on
//!   demand, collection-shaped fields parse it as JSON first.
//!
//! Does NOT handle:
//! - Override resolution; this consumes the final store read-only.
//!
//! Invariants:
//! - Conversion failures are structured errors naming the offending
//!   value and target type, never silent defaults.
//! - `include_sections` and `exclude_sections` are mutually exclusive.

mod de;


use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::de::value::MapDeserializer;
use thiserror::Error;

use inifold_store::IniStore;

use self::de::SectionData;

/// Errors raised while materializing a store into a typed record.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("include_sections and exclude_sections cannot be combined")]
    InvalidParameters,

    #[error("cannot cast {value:?} into {target}")]
    Cast { value: String, target: &'static str },

    #[error("value {value:?} is not valid JSON for a collection-typed field: {message}")]
    Json { value: String, message: String },

    #[error("{0}")]
    Message(String),
}

impl serde::de::Error for ConvertError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ConvertError::Message(msg.to_string())
    }
}

/// The boolean spellings configparser-style stores accept.
fn default_boolean_states() -> HashMap<String, bool> {
    let mut states = HashMap::new();
    for truthy in ["1", "yes", "true", "on"] {
        states.insert(truthy.to_string(), true);
    }
    for falsy in ["0", "no", "false", "off"] {
        states.insert(falsy.to_string(), false);
    }
    states
}

/// Converts a store into a nested mapping or a typed record.
pub struct ConfigConverter<'a> {
    store: &'a IniStore,
    boolean_states: HashMap<String, bool>,
    include_sections: Option<Vec<String>>,
    exclude_sections: Option<Vec<String>>,
}

impl<'a> ConfigConverter<'a> {
    pub fn new(store: &'a IniStore) -> Self {
        Self {
            store,
            boolean_states: default_boolean_states(),
            include_sections: None,
            exclude_sections: None,
        }
    }

    /// Replace the mapping of accepted boolean spellings. Keys are
    /// compared lower-cased.
    pub fn with_boolean_states<K: Into<String>>(
        mut self,
        states: impl IntoIterator<Item = (K, bool)>,
    ) -> Self {
        self.boolean_states = states.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self
    }

    /// Only materialize the named sections. Other sections are omitted;
    /// record fields for them must be optional or defaulted.
    pub fn include_sections<S: Into<String>>(
        mut self,
        sections: impl IntoIterator<Item = S>,
    ) -> Self {
        self.include_sections = Some(sections.into_iter().map(Into::into).collect());
        self
    }

    /// Materialize everything except the named sections.
    pub fn exclude_sections<S: Into<String>>(
        mut self,
        sections: impl IntoIterator<Item = S>,
    ) -> Self {
        self.exclude_sections = Some(sections.into_iter().map(Into::into).collect());
        self
    }

    fn section_enabled(&self, name: &str) -> bool {
        if let Some(include) = &self.include_sections {
            return include.iter().any(|s| s == name);
        }
        if let Some(exclude) = &self.exclude_sections {
            return !exclude.iter().any(|s| s == name);
        }
        true
    }

    /// The store as a nested section → option → value mapping. Named
    /// sections list inherited defaults too; the default section lists
    /// its own options. Include/exclude filters do not apply here.
    pub fn to_map(&self) -> BTreeMap<String, BTreeMap<String, String>> {
        let mut out = BTreeMap::new();
        for name in self.store.sections() {
            let mut section_map = BTreeMap::new();
            for option in self.store.options(name).unwrap_or_default() {
                if let Some(value) = self.store.get(name, &option) {
                    section_map.insert(option, value.to_string());
                }
            }
            out.insert(name.to_string(), section_map);
        }
        let defaults: BTreeMap<String, String> = self
            .store
            .defaults()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        out.insert(self.store.default_section().to_string(), defaults);
        out
    }

    /// Materialize the store into `T`. Section names map to top-level
    /// fields; options map to the fields of the nested records.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, ConvertError> {
        if self.include_sections.is_some() && self.exclude_sections.is_some() {
            return Err(ConvertError::InvalidParameters);
        }
        let booleans = Arc::new(self.boolean_states.clone());

        let mut data: Vec<(String, SectionData)> = Vec::new();
        for name in self.store.sections() {
            if !self.section_enabled(name) {
                continue;
            }
            let Some(section) = self.store.section(name) else {
                continue;
            };
            let mut pairs = Vec::new();
            for option in self.store.options(name).unwrap_or_default() {
                let value = section
                    .get(&option)
                    .or_else(|| self.store.defaults().get(&option))
                    .unwrap_or_default();
                pairs.push((option, value.to_string()));
            }
            data.push((name.to_string(), SectionData::new(pairs, booleans.clone())));
        }
        let default_name = self.store.default_section();
        if self.section_enabled(default_name) {
            let pairs = self
                .store
                .defaults()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            data.push((
                default_name.to_string(),
                SectionData::new(pairs, booleans.clone()),
            ));
        }

        T::deserialize(MapDeserializer::new(data.into_iter()))
    }
}

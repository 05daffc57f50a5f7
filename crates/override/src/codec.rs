//! Key Codec: the bidirectional mapping between flat override keys,
//! (section, option) pairs, and environment variable names.
//!
//! Responsibilities:
//! - Split a flat key (`SECTION__option`, or a bare `option` for the
//!   default section) into its (section, option) target.
//! - Derive the environment variable name that addresses a
//!   (section, option) pair under a given prefix, so a reader can
//!   predict the variable name for any pair from the policy alone.
//!
//! Does NOT handle:
//! - Looking keys up in a store or in the environment (see
//!   loader/strategy.rs and env.rs).
//!
//! Invariants:
//! - The separator is matched on its first occurrence only.
//! - Option names always pass through the active normalization.
//! - In case-insensitive mode derived variable names are upper-cased
//!   whole; in case-sensitive mode case is preserved as given.

use inifold_store::OptionTransform;

use crate::constants::KEY_SEPARATOR;

/// How section names and derived environment variable names compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseMode {
    /// Section names and variable names match exactly.
    Sensitive,
    /// Section names match ignoring case; derived variable names are
    /// upper-cased and compared case-insensitively.
    #[default]
    Insensitive,
}

impl CaseMode {
    pub fn is_insensitive(self) -> bool {
        matches!(self, CaseMode::Insensitive)
    }
}

/// Encoder/decoder for override keys and environment variable names.
#[derive(Debug, Clone)]
pub struct KeyCodec {
    default_section: String,
    case: CaseMode,
    transform: OptionTransform,
}

impl KeyCodec {
    pub fn new(
        default_section: impl Into<String>,
        case: CaseMode,
        transform: OptionTransform,
    ) -> Self {
        Self {
            default_section: default_section.into(),
            case,
            transform,
        }
    }

    pub fn case(&self) -> CaseMode {
        self.case
    }

    /// Whether `section` addresses the default section under the active
    /// case mode.
    pub fn is_default_section(&self, section: &str) -> bool {
        match self.case {
            CaseMode::Sensitive => section == self.default_section,
            CaseMode::Insensitive => {
                section.to_lowercase() == self.default_section.to_lowercase()
            }
        }
    }

    /// Split a flat override key into its (section, option) target.
    ///
    /// No separator means the default section. The section part keeps
    /// its case (resolution happens later); the option part is
    /// normalized.
    pub fn parse_key(&self, key: &str) -> (String, String) {
        match key.split_once(KEY_SEPARATOR) {
            Some((section, option)) => (section.to_string(), self.transform.apply(option)),
            None => (self.default_section.clone(), self.transform.apply(key)),
        }
    }

    /// Environment variable name addressing `(section, option)` under
    /// `prefix`. The default section drops the section part entirely.
    pub fn env_var_for(&self, prefix: &str, section: &str, option: &str) -> String {
        let name = if self.is_default_section(section) {
            format!("{prefix}{option}")
        } else {
            format!("{prefix}{section}{KEY_SEPARATOR}{option}")
        };
        match self.case {
            CaseMode::Sensitive => name,
            CaseMode::Insensitive => name.to_uppercase(),
        }
    }
}

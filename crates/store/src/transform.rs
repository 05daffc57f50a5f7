//! Option-name normalization.

use std::fmt;
use std::sync::Arc;

/// Normalization applied to every option name before storage or lookup.
///
/// The conventional INI treatment is lower-case folding, which is the
/// default. `Identity` preserves option names exactly; `Custom` accepts
/// an arbitrary mapping.
#[derive(Clone, Default)]
pub enum OptionTransform {
    #[default]
    Lowercase,
    Identity,
    Custom(Arc<dyn Fn(&str) -> String + Send + Sync>),
}

impl OptionTransform {
    pub fn apply(&self, option: &str) -> String {
        match self {
            OptionTransform::Lowercase => option.to_lowercase(),
            OptionTransform::Identity => option.to_string(),
            OptionTransform::Custom(f) => f(option),
        }
    }
}

impl fmt::Debug for OptionTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionTransform::Lowercase => f.write_str("OptionTransform::Lowercase"),
            OptionTransform::Identity => f.write_str("OptionTransform::Identity"),
            OptionTransform::Custom(_) => f.write_str("OptionTransform::Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_is_the_default() {
        assert_eq!(OptionTransform::default().apply("KeyName"), "keyname");
    }

    #[test]
    fn identity_preserves_case() {
        assert_eq!(OptionTransform::Identity.apply("KeyName"), "KeyName");
    }

    #[test]
    fn custom_transform_applies_closure() {
        let upper = OptionTransform::Custom(Arc::new(|s: &str| s.to_uppercase()));
        assert_eq!(upper.apply("key"), "KEY");
    }
}

//! Strategy Selector: decision table from policy inputs to strategy.

use crate::error::OverrideError;
use crate::loader::strategy::Strategy;

/// Map the three policy inputs to exactly one strategy.
///
/// The six conditions are mutually exclusive and cover every input
/// except an empty prefix combined with create-new-from-environment,
/// which has no meaningful interpretation and fails.
pub(crate) fn select_strategy(
    prefix: &str,
    create_new_from_env: bool,
    create_new_from_direct: bool,
) -> Result<Strategy, OverrideError> {
    match (!prefix.is_empty(), create_new_from_env, create_new_from_direct) {
        (false, false, false) => Ok(Strategy::NoPrefixNoNew),
        (false, false, true) => Ok(Strategy::NoPrefixNewDirect),
        (true, false, false) => Ok(Strategy::PrefixNoNew),
        (true, true, false) => Ok(Strategy::PrefixNewEnv),
        (true, false, true) => Ok(Strategy::PrefixNewDirect),
        (true, true, true) => Ok(Strategy::PrefixNewEnvNewDirect),
        (false, true, _) => Err(OverrideError::PolicyNotImplemented {
            prefix: prefix.to_string(),
            create_new_from_env,
            create_new_from_direct,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_six_strategies_are_reachable() {
        assert_eq!(
            select_strategy("", false, false).unwrap(),
            Strategy::NoPrefixNoNew
        );
        assert_eq!(
            select_strategy("", false, true).unwrap(),
            Strategy::NoPrefixNewDirect
        );
        assert_eq!(
            select_strategy("APP_", false, false).unwrap(),
            Strategy::PrefixNoNew
        );
        assert_eq!(
            select_strategy("APP_", true, false).unwrap(),
            Strategy::PrefixNewEnv
        );
        assert_eq!(
            select_strategy("APP_", false, true).unwrap(),
            Strategy::PrefixNewDirect
        );
        assert_eq!(
            select_strategy("APP_", true, true).unwrap(),
            Strategy::PrefixNewEnvNewDirect
        );
    }

    #[test]
    fn empty_prefix_with_new_from_env_is_not_implemented() {
        for create_new_from_direct in [false, true] {
            let err = select_strategy("", true, create_new_from_direct).unwrap_err();
            assert!(matches!(
                err,
                OverrideError::PolicyNotImplemented {
                    create_new_from_env: true,
                    ..
                }
            ));
        }
    }
}

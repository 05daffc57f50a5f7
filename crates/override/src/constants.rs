//! Shared constants for override resolution.

/// Separator between the section and option parts of a flat override
/// key (`SECTION__option`). Split on its first occurrence only.
pub const KEY_SEPARATOR: &str = "__";

/// Environment variable that disables `.env` loading when set to
/// `true` or `1` (useful for tests).
pub const DOTENV_DISABLED_VAR: &str = "DOTENV_DISABLED";

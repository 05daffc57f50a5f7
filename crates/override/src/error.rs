//! Error types for override resolution.
//!
//! Invariants:
//! - `PolicyNotImplemented` is the engine's only hard failure; every
//!   other mismatch during resolution (unset variable, override aimed
//!   at a missing target in a no-new policy) is a logged no-op.
//! - Dotenv errors never include raw `.env` line contents, so secrets
//!   cannot leak through error messages.

use std::io::ErrorKind;
use thiserror::Error;

use inifold_store::StoreError;

/// Errors that can occur while resolving overrides.
#[derive(Error, Debug)]
pub enum OverrideError {
    /// The policy inputs select none of the six strategies. Raised for
    /// an empty prefix combined with create-new-from-environment: there
    /// is no meaningful unprefixed wildcard environment scan.
    #[error(
        "no override strategy for env_prefix={prefix:?}, \
         create_new_from_env={create_new_from_env}, \
         create_new_from_direct={create_new_from_direct}"
    )]
    PolicyNotImplemented {
        prefix: String,
        create_new_from_env: bool,
        create_new_from_direct: bool,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unable to determine config directory: {0}")]
    ConfigDirUnavailable(String),

    #[error("no configuration files found for file_name={file_name:?}, app_name={app_name:?}")]
    NoConfigFilesFound { file_name: String, app_name: String },

    /// Failed to parse the `.env` file. Only the byte index of the
    /// failure is reported, never the offending line.
    #[error(
        "failed to parse .env file at position {error_index}. \
         Hint: set DOTENV_DISABLED=1 to skip .env loading"
    )]
    DotenvParse { error_index: usize },

    #[error("failed to read .env file: {kind}")]
    DotenvIo { kind: ErrorKind },

    /// Unknown dotenv error (future variants of the dotenvy crate).
    #[error("failed to load .env file. Hint: set DOTENV_DISABLED=1 to skip .env loading")]
    DotenvUnknown,
}

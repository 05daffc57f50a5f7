//! Error types for the INI document store.
//!
//! Invariants:
//! - All variants carry enough context to locate the problem (path,
//!   line number, section/option names).
//! - Parse errors are fatal for the source being read; the store keeps
//!   whatever was merged before the failing line.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or mutating an [`IniStore`](crate::IniStore).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to read config file at {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("duplicate section [{name}]")]
    DuplicateSection { name: String },

    #[error("duplicate option {option:?} in section [{section}]")]
    DuplicateOption { section: String, option: String },

    #[error("no such section [{name}]")]
    NoSection { name: String },

    #[error("section name {name:?} is reserved for the default section")]
    ReservedSection { name: String },
}

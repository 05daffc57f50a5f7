//! Layered override resolution for INI configuration.
//!
//! This crate merges up to three configuration sources into one
//! [`IniStore`]: values read from INI files, environment variables
//! matched against a configurable prefix, and directly-supplied
//! overrides. Which source wins, and whether a source may create keys
//! the files did not declare, is governed by one of six fixed
//! precedence policies selected from the loader's settings.

pub mod constants;

mod codec;
mod convert;
mod discover;
mod env;
mod error;
mod loader;

pub use codec::{CaseMode, KeyCodec};
pub use convert::{ConfigConverter, ConvertError};
pub use discover::{DiscoverOptions, collect_config_files};
pub use env::EnvSnapshot;
pub use error::OverrideError;
pub use loader::OverrideLoader;

pub use inifold_store::{DEFAULT_SECTION, IniStore, OptionTransform, Section, StoreError};

#[cfg(test)]
pub(crate) mod test_util {
    use std::sync::{Mutex, OnceLock};

    pub fn global_test_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }
}

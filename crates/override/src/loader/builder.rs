//! Builder-pattern loader for override resolution.

use std::path::Path;

use serde::de::DeserializeOwned;

use inifold_store::{IniStore, OptionTransform};

use crate::codec::{CaseMode, KeyCodec};
use crate::constants::DOTENV_DISABLED_VAR;
use crate::convert::{ConfigConverter, ConvertError};
use crate::env::EnvSnapshot;
use crate::error::OverrideError;
use crate::loader::select::select_strategy;
use crate::loader::strategy::{OverrideMap, Resolver};

/// Reads INI sources into a store and layers environment and direct
/// overrides over them under one of six precedence policies.
///
/// Defaults match the conventional configuration: no environment
/// prefix, direct overrides may create new keys, environment overrides
/// may not, and section matching is case-insensitive.
#[derive(Debug)]
pub struct OverrideLoader {
    env_prefix: String,
    create_new_from_env: bool,
    create_new_from_direct: bool,
    case_sensitive: bool,
    overrides: OverrideMap,
    env: Option<EnvSnapshot>,
    store: IniStore,
}

impl Default for OverrideLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl OverrideLoader {
    pub fn new() -> Self {
        Self {
            env_prefix: String::new(),
            create_new_from_env: false,
            create_new_from_direct: true,
            case_sensitive: false,
            overrides: OverrideMap::new(),
            env: None,
            store: IniStore::new(),
        }
    }

    /// Set the prefix that environment override variables must carry.
    /// An empty prefix disables the environment pass entirely.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Allow the environment pass to create sections and options the
    /// files did not declare. Requires a non-empty prefix; resolution
    /// fails with `PolicyNotImplemented` otherwise.
    pub fn create_new_from_env(mut self, allow: bool) -> Self {
        self.create_new_from_env = allow;
        self
    }

    /// Allow direct overrides to create sections and options the files
    /// did not declare.
    pub fn create_new_from_direct(mut self, allow: bool) -> Self {
        self.create_new_from_direct = allow;
        self
    }

    /// Match section names and derived variable names exactly instead
    /// of case-insensitively.
    pub fn case_sensitive_overrides(mut self, sensitive: bool) -> Self {
        self.case_sensitive = sensitive;
        self
    }

    /// Add a direct override. The key is a flat `SECTION__option` key;
    /// a bare key targets the default section.
    pub fn with_override(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), Some(value.into()));
        self
    }

    /// Add a direct unset: remove the target option from the resolved
    /// store when present. A missing target is a silent no-op.
    pub fn with_override_unset(mut self, key: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), None);
        self
    }

    /// Replace the backing store, e.g. one pre-populated by the caller.
    /// The store's own default-section name and option normalization
    /// take effect.
    pub fn with_store(mut self, store: IniStore) -> Self {
        self.store = store;
        self
    }

    /// Use a custom default-section name. Call before reading sources.
    pub fn with_default_section(mut self, name: impl Into<String>) -> Self {
        let transform = self.store.option_transform().clone();
        self.store = IniStore::with_default_section(name).with_option_transform(transform);
        self
    }

    /// Replace the option-name normalization (default: lower-case fold).
    pub fn with_option_transform(mut self, transform: OptionTransform) -> Self {
        self.store = self.store.with_option_transform(transform);
        self
    }

    /// Resolve against a fixed environment snapshot instead of the
    /// process environment. Primarily for tests; note that variables
    /// loaded by [`load_dotenv`](Self::load_dotenv) are not visible
    /// through an injected snapshot.
    pub fn with_env_snapshot(mut self, env: EnvSnapshot) -> Self {
        self.env = Some(env);
        self
    }

    fn dotenv_disabled() -> bool {
        matches!(
            std::env::var(DOTENV_DISABLED_VAR).ok().as_deref(),
            Some("true") | Some("1")
        )
    }

    fn is_not_found(err: &dotenvy::Error) -> bool {
        matches!(
            err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        )
    }

    /// Populate the process environment from a `.env` file if present.
    ///
    /// Skipped when the `DOTENV_DISABLED` variable is set to `true` or
    /// `1`; a missing `.env` file is silently ignored.
    ///
    /// # Errors
    ///
    /// Returns [`OverrideError::DotenvParse`] for syntax errors (byte
    /// index only, never line contents) and
    /// [`OverrideError::DotenvIo`] for read failures.
    pub fn load_dotenv(self) -> Result<Self, OverrideError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }
        match dotenvy::dotenv() {
            Ok(_) => Ok(self),
            Err(e) if Self::is_not_found(&e) => Ok(self),
            Err(dotenvy::Error::LineParse(_, idx)) => {
                Err(OverrideError::DotenvParse { error_index: idx })
            }
            Err(dotenvy::Error::Io(io_err)) => Err(OverrideError::DotenvIo {
                kind: io_err.kind(),
            }),
            Err(_) => Err(OverrideError::DotenvUnknown),
        }
    }

    /// Read configuration files in order and resolve overrides.
    ///
    /// Missing paths are skipped, mirroring the usual read-what-exists
    /// file merge; later files win over earlier ones on conflicting
    /// keys. After the files are merged the policy is selected and
    /// executed; selection can fail with
    /// [`OverrideError::PolicyNotImplemented`] before any override is
    /// applied.
    pub fn read<I, P>(&mut self, paths: I) -> Result<&IniStore, OverrideError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            if !path.exists() {
                tracing::debug!(path = %path.display(), "config file not found, skipped");
                continue;
            }
            self.store.read_file(path)?;
        }
        self.resolve()?;
        Ok(&self.store)
    }

    /// Read one in-memory INI source and resolve overrides.
    pub fn read_string(&mut self, text: &str) -> Result<&IniStore, OverrideError> {
        self.store.read_string(text)?;
        self.resolve()?;
        Ok(&self.store)
    }

    /// Resolve overrides against whatever the store currently holds.
    fn resolve(&mut self) -> Result<(), OverrideError> {
        let strategy = select_strategy(
            &self.env_prefix,
            self.create_new_from_env,
            self.create_new_from_direct,
        )?;

        let case = if self.case_sensitive {
            CaseMode::Sensitive
        } else {
            CaseMode::Insensitive
        };
        let codec = KeyCodec::new(
            self.store.default_section(),
            case,
            self.store.option_transform().clone(),
        );
        let env = match &self.env {
            Some(snapshot) => snapshot.clone(),
            None => EnvSnapshot::from_process(),
        };

        Resolver::new(&mut self.store, codec, &env, &self.env_prefix, &self.overrides)
            .execute(strategy)
    }

    /// The resolved (or not-yet-resolved) store.
    pub fn store(&self) -> &IniStore {
        &self.store
    }

    pub fn into_store(self) -> IniStore {
        self.store
    }

    /// Materialize the resolved store into a typed record.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, ConvertError> {
        ConfigConverter::new(&self.store).to_typed()
    }
}

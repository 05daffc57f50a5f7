//! Platform-convention discovery of configuration files.
//!
//! Responsibilities:
//! - Collect existing candidate config files from the platform's
//!   conventional locations: XDG config home and `XDG_CONFIG_DIRS`
//!   (or bare `/etc`) on Unix, `APPDATA`/`PROGRAMDATA` on Windows.
//! - Order candidates lowest-priority first, so feeding the list to
//!   [`OverrideLoader::read`](crate::OverrideLoader::read) lets the
//!   highest-priority file win the merge.
//!
//! Does NOT handle:
//! - Reading or parsing the files; only existence is checked here.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::OverrideError;

/// Knobs for [`collect_config_files`].
#[derive(Debug, Clone)]
pub struct DiscoverOptions {
    /// Return every found file (merge order) instead of only the
    /// highest-priority one.
    pub merge_files: bool,
    /// Treat an empty result as acceptable instead of an error.
    pub allow_missing: bool,
    /// On Unix, look in bare `/etc/<app>/` instead of `XDG_CONFIG_DIRS`.
    pub bare_etc: bool,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            merge_files: true,
            allow_missing: true,
            bare_etc: false,
        }
    }
}

/// Collect existing configuration files named `file_name` for
/// `app_name`, lowest priority first.
///
/// # Errors
///
/// [`OverrideError::NoConfigFilesFound`] when nothing was found and
/// `allow_missing` is false; [`OverrideError::ConfigDirUnavailable`]
/// when the home directory cannot be determined.
pub fn collect_config_files(
    file_name: &str,
    app_name: &str,
    options: &DiscoverOptions,
) -> Result<Vec<PathBuf>, OverrideError> {
    let mut found = system_candidates(app_name, file_name, options.bare_etc);
    if let Some(home) = home_candidate(app_name, file_name)? {
        found.push(home);
    }

    if found.is_empty() && !options.allow_missing {
        return Err(OverrideError::NoConfigFilesFound {
            file_name: file_name.to_string(),
            app_name: app_name.to_string(),
        });
    }

    if !options.merge_files
        && let Some(last) = found.pop()
    {
        return Ok(vec![last]);
    }
    Ok(found)
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        tracing::debug!(path = %path.display(), "found config file");
        Some(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file");
        None
    }
}

#[cfg(not(windows))]
fn home_candidate(app_name: &str, file_name: &str) -> Result<Option<PathBuf>, OverrideError> {
    let config_home = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base = directories::BaseDirs::new()
                .context("failed to determine home directory")
                .map_err(|e| OverrideError::ConfigDirUnavailable(e.to_string()))?;
            base.home_dir().join(".config")
        }
    };
    Ok(existing(config_home.join(app_name).join(file_name)))
}

#[cfg(not(windows))]
fn system_candidates(app_name: &str, file_name: &str, bare_etc: bool) -> Vec<PathBuf> {
    if bare_etc {
        return existing(Path::new("/etc").join(app_name).join(file_name))
            .into_iter()
            .collect();
    }
    let dirs = std::env::var("XDG_CONFIG_DIRS").unwrap_or_else(|_| "/etc/xdg".to_string());
    let mut found: Vec<PathBuf> = dirs
        .split(':')
        .filter(|dir| !dir.is_empty())
        .filter_map(|dir| existing(Path::new(dir).join(app_name).join(file_name)))
        .collect();
    // XDG lists highest priority first; merge order wants it last.
    found.reverse();
    found
}

#[cfg(windows)]
fn home_candidate(app_name: &str, file_name: &str) -> Result<Option<PathBuf>, OverrideError> {
    let base = directories::BaseDirs::new()
        .context("failed to determine the AppData directory")
        .map_err(|e| OverrideError::ConfigDirUnavailable(e.to_string()))?;
    Ok(existing(base.config_dir().join(app_name).join(file_name)))
}

#[cfg(windows)]
fn system_candidates(app_name: &str, file_name: &str, _bare_etc: bool) -> Vec<PathBuf> {
    match std::env::var_os("PROGRAMDATA") {
        Some(dir) if !dir.is_empty() => {
            existing(PathBuf::from(dir).join(app_name).join(file_name))
                .into_iter()
                .collect()
        }
        _ => Vec::new(),
    }
}

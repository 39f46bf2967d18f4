//! Settings file loading and environment overrides.

use crate::config::schema::Settings;
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding `packages_path` (platform path-list syntax).
pub const PACKAGES_PATH_ENV: &str = "PKGRES_PACKAGES_PATH";

/// Load settings from a YAML file.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file cannot be read or parsed.
pub fn load_settings_file(path: &Path) -> Result<Settings> {
    let content = fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    parse_settings(&content, path)
}

/// Parse YAML content into [`Settings`].
///
/// An empty document yields the defaults.
pub fn parse_settings(content: &str, source_path: &Path) -> Result<Settings> {
    if content.trim().is_empty() {
        return Ok(Settings::default());
    }
    serde_yaml::from_str(content).map_err(|e| Error::Config {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

impl Settings {
    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_packages_path_override(std::env::var_os(PACKAGES_PATH_ENV))
    }

    fn with_packages_path_override(mut self, value: Option<OsString>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let paths: Vec<PathBuf> = std::env::split_paths(&value)
                .filter(|p| !p.as_os_str().is_empty())
                .collect();
            tracing::debug!("packages_path overridden from {}: {:?}", PACKAGES_PATH_ENV, paths);
            self.packages_path = paths;
        }
        self
    }
}

/// Load settings from an optional file, then apply environment overrides.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let settings = match path {
        Some(path) => load_settings_file(path)?,
        None => Settings::default(),
    };
    Ok(settings.with_env_overrides())
}

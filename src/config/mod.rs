//! Resolver settings.
//!
//! - Schema definitions in [`schema`]
//! - File loading and environment overrides in [`loader`]
//!
//! # Example
//!
//! ```
//! use pkgres::config::{parse_settings, Settings};
//! use std::path::{Path, PathBuf};
//!
//! let settings = parse_settings("packages_path: [/pkgs]", Path::new("settings.yml")).unwrap();
//! assert_eq!(settings.packages_path, vec![PathBuf::from("/pkgs")]);
//! assert!(!settings.check_version_consistency);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_settings, load_settings_file, parse_settings, PACKAGES_PATH_ENV};
pub use schema::Settings;

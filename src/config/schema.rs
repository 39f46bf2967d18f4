//! Settings schema for the resolver.
//!
//! Maps to the YAML settings file format:
//!
//! ```yaml
//! packages_path:
//!   - /studio/packages
//!   - /home/me/packages
//! check_version_consistency: true
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings that shape a resolution context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Search paths bound to `folder.packages_root` when a query does not
    /// name one.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub packages_path: Vec<PathBuf>,

    /// Fail loading a versioned package whose declared version differs from
    /// the version folder it lives in.
    #[serde(skip_serializing_if = "is_false")]
    pub check_version_consistency: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Settings {
    /// Settings with the given package search paths.
    pub fn with_packages_path<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            packages_path: paths.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Enable or disable the folder/file version consistency check.
    pub fn check_version_consistency(mut self, enabled: bool) -> Self {
        self.check_version_consistency = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_empty() {
        let settings = Settings::default();
        assert!(settings.packages_path.is_empty());
        assert!(!settings.check_version_consistency);
    }

    #[test]
    fn parses_full_settings() {
        let settings: Settings = serde_yaml::from_str(
            r#"
packages_path:
  - /a
  - /b
check_version_consistency: true
"#,
        )
        .unwrap();
        assert_eq!(
            settings.packages_path,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
        assert!(settings.check_version_consistency);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result: Result<Settings, _> = serde_yaml::from_str("package_path: [/a]");
        assert!(result.is_err());
    }

    #[test]
    fn builder_sets_fields() {
        let settings = Settings::with_packages_path(["/x"]).check_version_consistency(true);
        assert_eq!(settings.packages_path, vec![PathBuf::from("/x")]);
        assert!(settings.check_version_consistency);
    }

    #[test]
    fn serializes_without_defaults() {
        let yaml = serde_yaml::to_string(&Settings::default()).unwrap();
        assert_eq!(yaml.trim(), "{}");
    }
}

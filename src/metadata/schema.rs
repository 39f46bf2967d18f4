//! Package metadata schema.
//!
//! Raw mappings from a loader are validated and coerced by deserializing
//! them into [`PackageMetadata`]. Strings become [`Version`] and
//! [`Requirement`] values, unknown top-level keys are rejected, and every
//! failure is reported as a [`MetadataError`] carrying the file path.

use crate::error::MetadataError;
use crate::types::{Requirement, Version};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Validated contents of a single package definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageMetadata {
    /// Schema revision of the definition.
    #[serde(default)]
    pub config_version: u32,

    /// Package name.
    pub name: String,

    /// Package version; absent for versionless packages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// Runtime requirements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requirement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_requires: Vec<Requirement>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_build_requires: Vec<Requirement>,

    /// Alternative requirement sets the package can be built against.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variants: Vec<Vec<Requirement>>,

    /// Executables the package provides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Release time, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// A combined family file, summarized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyMetadata {
    /// Family name, shared by every entry.
    pub name: String,
    /// Versions of the entries, in file order.
    pub versions: Vec<Version>,
}

/// What loading a resource produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceData {
    /// Directories and roots carry no content.
    Folder,
    /// A validated package definition.
    Package(PackageMetadata),
    /// A combined family file.
    Family(FamilyMetadata),
}

impl ResourceData {
    /// The package definition, if this is one.
    pub fn as_package(&self) -> Option<&PackageMetadata> {
        match self {
            ResourceData::Package(p) => Some(p),
            _ => None,
        }
    }

    /// Consume into the package definition, if this is one.
    pub fn into_package(self) -> Option<PackageMetadata> {
        match self {
            ResourceData::Package(p) => Some(p),
            _ => None,
        }
    }

    /// The family summary, if this is one.
    pub fn as_family(&self) -> Option<&FamilyMetadata> {
        match self {
            ResourceData::Family(f) => Some(f),
            _ => None,
        }
    }
}

/// Validate and coerce a raw mapping into [`PackageMetadata`].
pub fn validate_package(raw: Mapping, path: &Path) -> Result<PackageMetadata, MetadataError> {
    serde_yaml::from_value(Value::Mapping(raw)).map_err(|e| MetadataError::Invalid {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn coerces_versions_and_requirements() {
        let pkg = validate_package(
            raw(
                r#"
name: foo
version: 3.0.1
requires:
  - bah-1.2+<2
"#,
            ),
            Path::new("/p/package.yaml"),
        )
        .unwrap();

        assert_eq!(pkg.config_version, 0);
        assert_eq!(pkg.version, Some(Version::parse("3.0.1").unwrap()));
        assert_eq!(pkg.requires, vec![Requirement::parse("bah-1.2+<2").unwrap()]);
    }

    #[test]
    fn numeric_version_keeps_its_text() {
        let pkg = validate_package(raw("name: foo\nversion: 1.0\n"), Path::new("/p")).unwrap();
        assert_eq!(pkg.version.unwrap().as_str(), "1.0");
    }

    #[test]
    fn unknown_key_is_invalid() {
        let err = validate_package(
            raw("name: bad\ncustom_key: 1\n"),
            Path::new("/p/bad/1/package.yaml"),
        )
        .unwrap_err();
        assert!(matches!(err, MetadataError::Invalid { .. }));
        let msg = err.to_string();
        assert!(msg.contains("/p/bad/1/package.yaml"));
        assert!(msg.contains("custom_key"));
    }

    #[test]
    fn missing_name_is_invalid() {
        let err = validate_package(raw("version: '1'\n"), Path::new("/p")).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn malformed_requirement_is_invalid() {
        let err = validate_package(raw("name: x\nrequires: ['-nope']\n"), Path::new("/p"));
        assert!(err.is_err());
    }

    #[test]
    fn package_data_accessors() {
        let data = ResourceData::Package(PackageMetadata {
            name: "x".into(),
            ..Default::default()
        });
        assert_eq!(data.as_package().unwrap().name, "x");
        assert!(data.as_family().is_none());
        assert!(ResourceData::Folder.into_package().is_none());
    }
}

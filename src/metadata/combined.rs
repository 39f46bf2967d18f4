//! Decomposition of combined family files.
//!
//! A combined file holds a shared section plus an optional `versions` list:
//!
//! ```yaml
//! name: multi
//! versions:
//!   - version: "1.0"
//!     tools: [tweak]
//!   - version: "1.1"
//!     tools: [twerk]
//! ```
//!
//! Each entry is shallow-merged over the shared section, entry fields
//! winning. A file without `versions` is a family of exactly one entry whose
//! version is the top-level `version` (or empty).

use crate::error::MetadataError;
use crate::types::format_float;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::Path;

/// Key holding the per-version entries.
pub const VERSIONS_KEY: &str = "versions";

/// Key every entry must supply.
pub const VERSION_KEY: &str = "version";

/// One logical package decomposed out of a family file.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyEntry {
    /// The entry's version as written (empty for an unversioned single entry).
    pub version: String,
    /// Shared fields with the entry's overrides applied.
    pub data: Mapping,
}

/// String form of a scalar, keeping floats as written (`1.0`, not `1`).
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if n.is_f64() => format_float(f),
            _ => n.to_string(),
        }),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn invalid(path: &Path, message: impl Into<String>) -> MetadataError {
    MetadataError::Invalid {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Decompose a raw family mapping into its entries, in file order.
pub fn decompose(raw: &Mapping, path: &Path) -> Result<Vec<FamilyEntry>, MetadataError> {
    let mut shared = raw.clone();
    let versions = shared.remove(VERSIONS_KEY);

    let Some(versions) = versions else {
        let version = match shared.get(VERSION_KEY) {
            Some(v) => scalar_string(v)
                .ok_or_else(|| invalid(path, "'version' must be a scalar"))?,
            None => String::new(),
        };
        return Ok(vec![FamilyEntry {
            version,
            data: shared,
        }]);
    };

    let Value::Sequence(items) = versions else {
        return Err(invalid(path, "'versions' must be a list of mappings"));
    };

    let mut seen = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let Value::Mapping(overrides) = item else {
            return Err(invalid(path, format!("entry {} of 'versions' is not a mapping", index)));
        };
        let version = overrides
            .get(VERSION_KEY)
            .and_then(scalar_string)
            .ok_or_else(|| invalid(path, format!("entry {} of 'versions' has no version", index)))?;
        if !seen.insert(version.clone()) {
            return Err(invalid(path, format!("version '{}' appears more than once", version)));
        }

        let mut data = shared.clone();
        for (key, value) in overrides {
            data.insert(key, value);
        }
        entries.push(FamilyEntry { version, data });
    }
    Ok(entries)
}

/// The versions a family file declares, without merging entry data.
pub fn entry_versions(raw: &Mapping, path: &Path) -> Result<Vec<String>, MetadataError> {
    Ok(decompose(raw, path)?.into_iter().map(|e| e.version).collect())
}

/// The single entry for `version`.
pub fn entry(raw: &Mapping, path: &Path, version: &str) -> Result<FamilyEntry, MetadataError> {
    decompose(raw, path)?
        .into_iter()
        .find(|e| e.version == version)
        .ok_or_else(|| MetadataError::MissingEntry {
            path: path.to_path_buf(),
            version: version.to_string(),
        })
}

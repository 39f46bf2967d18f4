//! Resource type registry.
//!
//! The registry is an immutable table of [`ResourceType`] descriptors built
//! once at startup. Hierarchy queries ([`Registry::ancestors`],
//! [`Registry::children`]) are plain table scans.
//!
//! # Example
//!
//! ```
//! use pkgres::registry::Registry;
//!
//! let registry = Registry::builtin();
//! let versioned = registry.get("package.versioned").unwrap();
//! let chain: Vec<&str> = registry.ancestors(versioned).iter().map(|t| t.key).collect();
//! assert_eq!(chain, ["folder.packages_root", "folder.name", "folder.version"]);
//! ```

pub mod builtin;
pub mod resource_type;

pub use builtin::{BUILTIN_RESOURCE_TYPES, PACKAGE_EXTENSIONS};
pub use resource_type::{
    Content, Name, ResourceType, RootBinding, Segment, EXT_VAR, SEARCH_PATH_VAR,
};

use crate::error::ResourceError;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

static BUILTIN: LazyLock<Arc<Registry>> =
    LazyLock::new(|| Arc::new(Registry::from_table(BUILTIN_RESOURCE_TYPES)));

/// Table of registered resource types.
#[derive(Debug)]
pub struct Registry {
    types: Vec<&'static ResourceType>,
}

impl Registry {
    /// Build a registry from a table, checking that keys are unique and
    /// every parent is registered.
    pub fn new(table: &'static [ResourceType]) -> Result<Self, ResourceError> {
        let mut seen = HashSet::new();
        for rt in table {
            if !seen.insert(rt.key) {
                return Err(ResourceError::DuplicateKey {
                    key: rt.key.to_string(),
                });
            }
        }
        for rt in table {
            if let Some(parent) = rt.parent {
                if !seen.contains(parent) {
                    return Err(ResourceError::UnknownKey {
                        key: parent.to_string(),
                    });
                }
            }
        }
        Ok(Self::from_table(table))
    }

    fn from_table(table: &'static [ResourceType]) -> Self {
        Self {
            types: table.iter().collect(),
        }
    }

    /// The shared built-in registry.
    pub fn builtin() -> Arc<Registry> {
        Arc::clone(&BUILTIN)
    }

    /// All registered types, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static ResourceType> + '_ {
        self.types.iter().copied()
    }

    /// Look up a type by exact key.
    pub fn get(&self, key: &str) -> Option<&'static ResourceType> {
        self.iter().find(|rt| rt.key == key)
    }

    /// Look up a type by exact key, failing for unregistered keys.
    pub fn lookup(&self, key: &str) -> Result<&'static ResourceType, ResourceError> {
        self.get(key).ok_or_else(|| ResourceError::UnknownKey {
            key: key.to_string(),
        })
    }

    /// The parent of a type.
    pub fn parent(&self, rt: &ResourceType) -> Option<&'static ResourceType> {
        rt.parent.and_then(|key| self.get(key))
    }

    /// Chain of types from the ultimate root down to the immediate parent.
    pub fn ancestors(&self, rt: &ResourceType) -> Vec<&'static ResourceType> {
        let mut chain = Vec::new();
        let mut current = self.parent(rt);
        while let Some(parent) = current {
            chain.push(parent);
            current = self.parent(parent);
        }
        chain.reverse();
        chain
    }

    /// All types whose parent is `rt`.
    pub fn children(&self, rt: &ResourceType) -> Vec<&'static ResourceType> {
        self.iter().filter(|c| c.parent == Some(rt.key)).collect()
    }

    /// The root type of the hierarchy `rt` belongs to.
    pub fn root_of(&self, rt: &'static ResourceType) -> &'static ResourceType {
        self.ancestors(rt).first().copied().unwrap_or(rt)
    }

    /// All registered root types.
    pub fn roots(&self) -> Vec<&'static ResourceType> {
        self.iter().filter(|rt| rt.is_root()).collect()
    }

    /// `rt` and every type below it.
    pub fn subtree(&self, rt: &'static ResourceType) -> Vec<&'static ResourceType> {
        let mut out = vec![rt];
        let mut i = 0;
        while i < out.len() {
            out.extend(self.children(out[i]));
            i += 1;
        }
        out
    }

    /// Every variable a resource of this type is identified by, root first.
    pub fn variables(&self, rt: &'static ResourceType) -> Vec<&'static str> {
        self.ancestors(rt)
            .into_iter()
            .chain([rt])
            .flat_map(|t| t.own_variables())
            .collect()
    }

    /// The full path pattern below the root: ancestors' segments followed by
    /// this type's own.
    pub fn full_pattern(&self, rt: &ResourceType) -> Vec<Segment> {
        self.ancestors(rt)
            .into_iter()
            .flat_map(|t| t.pattern.iter().copied())
            .chain(rt.pattern.iter().copied())
            .collect()
    }

    /// Types whose key matches any of `patterns`.
    ///
    /// Every pattern must match at least one registered type.
    pub fn matching<S: AsRef<str>>(
        &self,
        patterns: &[S],
    ) -> Result<Vec<&'static ResourceType>, ResourceError> {
        let mut out: Vec<&'static ResourceType> = Vec::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let matched: Vec<_> = self.iter().filter(|rt| match_key(pattern, rt.key)).collect();
            if matched.is_empty() {
                return Err(ResourceError::UnknownKey {
                    key: pattern.to_string(),
                });
            }
            for rt in matched {
                if !out.iter().any(|t| t.key == rt.key) {
                    out.push(rt);
                }
            }
        }
        Ok(out)
    }
}

/// Match a dotted resource key against a pattern.
///
/// Segments must be equal, except that a trailing `*` matches exactly one
/// more segment: `package.*` matches `package.versioned` but neither
/// `package` nor `package.a.b`.
pub fn match_key(pattern: &str, key: &str) -> bool {
    let pattern_parts: Vec<&str> = pattern.split('.').collect();
    let key_parts: Vec<&str> = key.split('.').collect();

    match pattern_parts.split_last() {
        Some((&"*", prefix)) => {
            key_parts.len() == pattern_parts.len()
                && prefix.iter().zip(&key_parts).all(|(p, k)| p == k)
        }
        _ => pattern_parts == key_parts,
    }
}

/// Whether `key` matches any pattern in `patterns`.
pub fn match_any<S: AsRef<str>>(patterns: &[S], key: &str) -> bool {
    patterns.iter().any(|p| match_key(p.as_ref(), key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(types: &[&ResourceType]) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = types.iter().map(|t| t.key).collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn builtin_table_is_consistent() {
        assert!(Registry::new(BUILTIN_RESOURCE_TYPES).is_ok());
    }

    #[test]
    fn ancestors_run_root_first() {
        let registry = Registry::builtin();
        let rt = registry.get("package.versionless").unwrap();
        let chain: Vec<_> = registry.ancestors(rt).iter().map(|t| t.key).collect();
        assert_eq!(chain, ["folder.packages_root", "folder.name"]);

        let rt = registry.get("package.combined").unwrap();
        let chain: Vec<_> = registry.ancestors(rt).iter().map(|t| t.key).collect();
        assert_eq!(chain, ["folder.packages_root", "package_family.combined"]);

        let rt = registry.get("package.dev").unwrap();
        let chain: Vec<_> = registry.ancestors(rt).iter().map(|t| t.key).collect();
        assert_eq!(chain, ["folder.dev_packages_root"]);
    }

    #[test]
    fn children_of_name_folder() {
        let registry = Registry::builtin();
        let rt = registry.get("folder.name").unwrap();
        assert_eq!(
            keys(&registry.children(rt)),
            vec!["folder.version", "package.versionless"]
        );
    }

    #[test]
    fn roots_and_subtree() {
        let registry = Registry::builtin();
        assert_eq!(
            keys(&registry.roots()),
            vec!["folder.dev_packages_root", "folder.packages_root"]
        );

        let dev = registry.get("folder.dev_packages_root").unwrap();
        assert_eq!(
            keys(&registry.subtree(dev)),
            vec!["folder.dev_packages_root", "package.dev"]
        );
        assert_eq!(registry.root_of(registry.get("package.dev").unwrap()).key, dev.key);
    }

    #[test]
    fn variables_cover_the_whole_chain() {
        let registry = Registry::builtin();
        let rt = registry.get("package.versioned").unwrap();
        assert_eq!(
            registry.variables(rt),
            vec!["search_path", "name", "version", "ext"]
        );

        let rt = registry.get("package.combined").unwrap();
        assert_eq!(
            registry.variables(rt),
            vec!["search_path", "name", "ext", "version"]
        );
    }

    #[test]
    fn full_pattern_concatenates_segments() {
        let registry = Registry::builtin();
        let rt = registry.get("package.versioned").unwrap();
        let pattern = registry.full_pattern(rt);
        assert_eq!(pattern.len(), 3);
        assert!(pattern[2].is_file());
    }

    #[test]
    fn wildcard_matches_one_more_segment() {
        assert!(match_key("package.*", "package.versioned"));
        assert!(match_key("package.*", "package.combined"));
        assert!(!match_key("package.*", "package"));
        assert!(!match_key("package.*", "package.a.b"));
        assert!(!match_key("package.*", "package_family.combined"));
        assert!(match_key("folder.name", "folder.name"));
        assert!(!match_key("folder", "folder.name"));
    }

    #[test]
    fn match_any_is_or_combined() {
        assert!(match_any(&["folder.*", "package.dev"], "package.dev"));
        assert!(match_any(&["folder.*", "package.dev"], "folder.version"));
        assert!(!match_any(&["folder.*", "package.dev"], "package.versioned"));
    }

    #[test]
    fn matching_rejects_unknown_patterns() {
        let registry = Registry::builtin();
        let err = registry.matching(&["non_existent"]).unwrap_err();
        assert!(matches!(err, ResourceError::UnknownKey { .. }));

        let types = registry.matching(&["package.*"]).unwrap();
        assert_eq!(
            keys(&types),
            vec![
                "package.combined",
                "package.dev",
                "package.versioned",
                "package.versionless"
            ]
        );
    }
}

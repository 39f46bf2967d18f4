//! Per-context resource instance cache.
//!
//! Resources are interned by `(type key, canonical variables)`, so resolving
//! the same identity twice within a context yields the same `Arc`. The cache
//! belongs to one [`crate::Context`] and is dropped with it.

use super::Resource;
use crate::template::Variables;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

type CacheKey = (&'static str, Variables);

/// Interning cache for resource instances.
#[derive(Debug, Default)]
pub struct ResourceCache {
    entries: Mutex<HashMap<CacheKey, Arc<Resource>>>,
}

impl ResourceCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached instance for `(key, variables)`, creating it with
    /// `make` on first use.
    pub fn get_or_insert_with(
        &self,
        key: &'static str,
        variables: Variables,
        make: impl FnOnce(Variables) -> Resource,
    ) -> Arc<Resource> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let cache_key = (key, variables);
        if let Some(existing) = entries.get(&cache_key) {
            tracing::trace!("Resource cache hit: {}", key);
            return Arc::clone(existing);
        }

        tracing::trace!("Resource cache miss: {}", key);
        let resource = Arc::new(make(cache_key.1.clone()));
        entries.insert(cache_key, Arc::clone(&resource));
        resource
    }

    /// Look up an instance without creating it.
    pub fn get(&self, key: &'static str, variables: &Variables) -> Option<Arc<Resource>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(&(key, variables.clone())).cloned()
    }

    /// Number of cached instances.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached instance.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use std::path::PathBuf;

    fn make_resource(variables: Variables) -> Resource {
        let rt = Registry::builtin().get("folder.name").unwrap();
        Resource::new(rt, variables, PathBuf::from("/pkgs/foo"))
    }

    fn vars(name: &str) -> Variables {
        let mut v = Variables::new();
        v.insert("name".into(), name.into());
        v.insert("search_path".into(), "/pkgs".into());
        v
    }

    #[test]
    fn same_identity_same_instance() {
        let cache = ResourceCache::new();
        let a = cache.get_or_insert_with("folder.name", vars("foo"), make_resource);
        let b = cache.get_or_insert_with("folder.name", vars("foo"), |_| {
            panic!("should not be created twice")
        });
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn different_variables_different_instances() {
        let cache = ResourceCache::new();
        let a = cache.get_or_insert_with("folder.name", vars("foo"), make_resource);
        let b = cache.get_or_insert_with("folder.name", vars("bar"), make_resource);
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("folder.name", &vars("bar")).is_some());
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = ResourceCache::new();
        cache.get_or_insert_with("folder.name", vars("foo"), make_resource);
        assert!(!cache.is_empty());
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get("folder.name", &vars("foo")).is_none());
    }
}

//! Resolution context.
//!
//! A [`Context`] bundles everything a query needs: the type registry, the
//! settings that supply default search paths, the metadata loaders and the
//! instance cache. Two contexts never share resource instances.

use crate::config::Settings;
use crate::error::{ResourceError, Result};
use crate::metadata::{LoaderRegistry, MetadataLoader, ResourceData};
use crate::registry::{Registry, ResourceType, RootBinding};
use crate::resolver::{self, Query, ResourceIter};
use crate::resource::{self, Resource, ResourceCache, ResourceHandle};
use crate::template::{self, Variables};
use std::path::PathBuf;
use std::sync::Arc;

/// Registry, settings, loaders and instance cache for a set of queries.
#[derive(Debug)]
pub struct Context {
    registry: Arc<Registry>,
    settings: Settings,
    loaders: LoaderRegistry,
    cache: ResourceCache,
}

impl Context {
    /// A context over the built-in registry with the default loaders.
    pub fn new(settings: Settings) -> Self {
        Self {
            registry: Registry::builtin(),
            settings,
            loaders: LoaderRegistry::with_defaults(),
            cache: ResourceCache::new(),
        }
    }

    /// Use a different resource type registry.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self.cache.clear();
        self
    }

    /// Register a metadata loader for a file extension.
    pub fn with_loader(mut self, extension: &str, loader: impl MetadataLoader + 'static) -> Self {
        self.loaders.register(extension, loader);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn loaders(&self) -> &LoaderRegistry {
        &self.loaders
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    /// Search paths a root type is bound to when the caller names none.
    ///
    /// Paths are made absolute against the working directory and
    /// normalized. Entries naming the same directory are kept once, at their
    /// first position.
    pub fn default_bindings(&self, root: &ResourceType) -> Vec<PathBuf> {
        if root.binding != RootBinding::PackagesPath {
            return Vec::new();
        }
        let mut bindings: Vec<PathBuf> = Vec::new();
        for p in &self.settings.packages_path {
            match std::path::absolute(p) {
                Ok(abs) => {
                    let path = template::normalize_path(&abs);
                    if bindings.contains(&path) {
                        tracing::debug!("Ignoring repeated search path {}", p.display());
                    } else {
                        bindings.push(path);
                    }
                }
                Err(e) => tracing::warn!("Ignoring search path {}: {}", p.display(), e),
            }
        }
        bindings
    }

    /// The interned instance of `rt` identified by `variables`.
    ///
    /// Variables are canonicalized first; the filesystem is not consulted.
    pub fn get(
        &self,
        rt: &'static ResourceType,
        variables: Variables,
    ) -> std::result::Result<Arc<Resource>, ResourceError> {
        let (variables, path) = resource::canonicalize(self, rt, variables)?;
        Ok(self
            .cache
            .get_or_insert_with(rt.key, variables, |variables| {
                Resource::new(rt, variables, path)
            }))
    }

    /// Re-resolve a handle to a live resource.
    ///
    /// Fails with [`ResourceError::NotFound`] when the backing file or
    /// directory no longer exists.
    pub fn from_handle(&self, handle: &ResourceHandle) -> Result<Arc<Resource>> {
        let rt = self.registry.lookup(&handle.key)?;
        let resource = self.get(rt, handle.variables.clone())?;
        if !resource.exists() {
            return Err(ResourceError::NotFound {
                key: handle.key.clone(),
                path: resource.path().to_path_buf(),
            }
            .into());
        }
        Ok(resource)
    }

    /// Lazily iterate every resource matching `query`.
    pub fn iter_resources(&self, query: &Query) -> Result<ResourceIter<'_>> {
        resolver::iter_resources(self, query)
    }

    /// The single resource matching `query`.
    pub fn get_resource(&self, query: &Query) -> Result<Arc<Resource>> {
        resolver::get_resource(self, query)
    }

    /// Load the content of the single resource matching `query`.
    pub fn load_resource(&self, query: &Query) -> Result<ResourceData> {
        resolver::load_resource(self, query)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

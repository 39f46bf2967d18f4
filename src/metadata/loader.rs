//! Extension-specific metadata loaders.
//!
//! A loader turns a file into a raw key/value mapping. Validation against
//! the package schema happens afterwards, in [`super::schema`].
//!
//! Only YAML is built in. Hosts register loaders for other formats (for
//! example `py` package definitions) through [`LoaderRegistry::register`] or
//! [`crate::Context::with_loader`].

use crate::error::MetadataError;
use anyhow::{bail, Context as _};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Reads a metadata file into a raw mapping.
pub trait MetadataLoader: Send + Sync {
    /// Load `path` and return its top-level mapping.
    fn load(&self, path: &Path) -> anyhow::Result<Mapping>;
}

impl<F> MetadataLoader for F
where
    F: Fn(&Path) -> anyhow::Result<Mapping> + Send + Sync,
{
    fn load(&self, path: &Path) -> anyhow::Result<Mapping> {
        self(path)
    }
}

/// Loader for `.yaml` / `.yml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

impl MetadataLoader for YamlLoader {
    fn load(&self, path: &Path) -> anyhow::Result<Mapping> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value: Value = serde_yaml::from_str(&content).context("Invalid YAML")?;
        match value {
            Value::Mapping(mapping) => Ok(mapping),
            Value::Null => Ok(Mapping::new()),
            _ => bail!("Expected a mapping at the top level"),
        }
    }
}

/// Loaders keyed by file extension.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn MetadataLoader>>,
}

impl LoaderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in loaders.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("yaml", YamlLoader);
        registry.register("yml", YamlLoader);
        registry
    }

    /// Register (or replace) the loader for an extension.
    pub fn register(&mut self, extension: &str, loader: impl MetadataLoader + 'static) {
        self.loaders
            .insert(extension.to_string(), Arc::new(loader));
    }

    /// Whether a loader exists for `extension`.
    pub fn has(&self, extension: &str) -> bool {
        self.loaders.contains_key(extension)
    }

    /// Load `path` with the loader registered for its extension.
    pub fn load(&self, path: &Path) -> Result<Mapping, MetadataError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        let loader = self
            .loaders
            .get(extension)
            .ok_or_else(|| MetadataError::NoLoader {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            })?;

        tracing::trace!("Loading metadata from {}", path.display());
        loader.load(path).map_err(|e| MetadataError::Unreadable {
            path: path.to_path_buf(),
            message: format!("{:#}", e),
        })
    }
}

impl fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extensions: Vec<&str> = self.loaders.keys().map(String::as_str).collect();
        extensions.sort_unstable();
        f.debug_struct("LoaderRegistry")
            .field("extensions", &extensions)
            .finish()
    }
}

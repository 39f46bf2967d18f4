//! Resolved resources.
//!
//! A [`Resource`] is one located instance of a [`ResourceType`]: the type,
//! its variable bindings and an absolute path. Sub-resources share the path
//! of the file they were decomposed from.
//!
//! Identity is `(type key, variables)`. Instances are interned per context
//! by [`ResourceCache`], and [`ResourceHandle`] carries the same identity in
//! serializable form.

pub mod cache;
pub mod handle;
pub mod instances;

pub use cache::ResourceCache;
pub use handle::ResourceHandle;
pub use instances::{child_instances, InstanceIter};

use crate::context::Context;
use crate::error::{ResourceError, Result};
use crate::metadata::{self, ResourceData};
use crate::registry::{Content, Registry, ResourceType, Segment, EXT_VAR, SEARCH_PATH_VAR};
use crate::template::{self, Variables};
use crate::types::Version;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A resolved, typed, located unit of package data.
#[derive(Debug)]
pub struct Resource {
    resource_type: &'static ResourceType,
    variables: Variables,
    path: PathBuf,
}

impl Resource {
    pub(crate) fn new(
        resource_type: &'static ResourceType,
        variables: Variables,
        path: PathBuf,
    ) -> Self {
        Self {
            resource_type,
            variables,
            path,
        }
    }

    /// The resource type key, e.g. `package.versioned`.
    pub fn key(&self) -> &'static str {
        self.resource_type.key
    }

    /// The resource type descriptor.
    pub fn resource_type(&self) -> &'static ResourceType {
        self.resource_type
    }

    /// Absolute path of the file or directory backing this resource.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Canonical variable bindings.
    pub fn variables(&self) -> &Variables {
        &self.variables
    }

    /// A single variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    /// A single variable, or `default` when unbound.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Serializable identity of this resource.
    pub fn handle(&self) -> ResourceHandle {
        ResourceHandle::new(self.key(), self.variables.clone())
    }

    /// Load and validate this resource's content.
    pub fn load(&self, ctx: &Context) -> Result<ResourceData> {
        Ok(metadata::load(ctx, self)?)
    }

    /// The resource this one lives in, or `None` for roots.
    ///
    /// Child-specific variables are dropped and the remainder re-resolved
    /// against the parent type, so the result is the cached parent instance.
    pub fn parent_instance(&self, ctx: &Context) -> Result<Option<Arc<Resource>>> {
        let registry = ctx.registry();
        let Some(parent) = registry.parent(self.resource_type) else {
            return Ok(None);
        };
        let wanted = registry.variables(parent);
        let variables: Variables = self
            .variables
            .iter()
            .filter(|(name, _)| wanted.iter().any(|w| *w == name.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(Some(ctx.get(parent, variables)?))
    }

    /// Instances of this resource's type found under `parent`.
    pub fn iter_instances<'c>(&self, ctx: &'c Context, parent: &Arc<Resource>) -> InstanceIter<'c> {
        child_instances(ctx, Arc::clone(parent), self.resource_type, Arc::default())
    }

    /// Types from the root down to this resource's parent type.
    pub fn ancestors(&self, ctx: &Context) -> Vec<&'static ResourceType> {
        ctx.registry().ancestors(self.resource_type)
    }

    /// Types that may live directly under this resource.
    pub fn children(&self, ctx: &Context) -> Vec<&'static ResourceType> {
        ctx.registry().children(self.resource_type)
    }

    /// Whether the backing file or directory still exists.
    pub fn exists(&self) -> bool {
        match self.resource_type.content {
            Content::None => self.path.is_dir(),
            Content::Package | Content::Family | Content::FamilyEntry => self.path.is_file(),
        }
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key() && self.variables == other.variables
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
        self.variables.hash(state);
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.key(), self.path.display())
    }
}

fn invalid(rt: &ResourceType, variable: &str, value: &str, reason: &str) -> ResourceError {
    ResourceError::InvalidVariable {
        key: rt.key.to_string(),
        variable: variable.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Put `variables` into canonical form for `rt` and compute the path.
///
/// Variables the type does not use are dropped, `search_path` is filled
/// from the context when the root has exactly one default binding, every
/// required variable must be present, and values are type-checked.
pub(crate) fn canonicalize(
    ctx: &Context,
    rt: &'static ResourceType,
    mut variables: Variables,
) -> std::result::Result<(Variables, PathBuf), ResourceError> {
    let registry = ctx.registry();
    let required = registry.variables(rt);
    variables.retain(|name, _| required.iter().any(|r| *r == name.as_str()));

    if !variables.contains_key(SEARCH_PATH_VAR) {
        if let [only] = ctx.default_bindings(registry.root_of(rt)).as_slice() {
            variables.insert(SEARCH_PATH_VAR.to_string(), template::path_value(only));
        }
    }

    for name in &required {
        if !variables.contains_key(*name) {
            return Err(ResourceError::MissingVariable {
                key: rt.key.to_string(),
                variable: name.to_string(),
            });
        }
    }

    let pattern = registry.full_pattern(rt);
    for (name, value) in variables.iter_mut() {
        check_value(registry, rt, &pattern, name, value)?;
    }

    let search_path = PathBuf::from(&variables[SEARCH_PATH_VAR]);
    let path = template::render(&search_path, &pattern, &variables).ok_or_else(|| {
        ResourceError::MissingVariable {
            key: rt.key.to_string(),
            variable: "<path>".to_string(),
        }
    })?;
    Ok((variables, path))
}

fn check_value(
    registry: &Registry,
    rt: &'static ResourceType,
    pattern: &[Segment],
    name: &str,
    value: &mut String,
) -> std::result::Result<(), ResourceError> {
    match name {
        SEARCH_PATH_VAR => {
            if !Path::new(value.as_str()).is_absolute() {
                return Err(invalid(rt, name, value, "search path must be absolute"));
            }
            *value = template::path_value(Path::new(value.as_str()));
        }
        EXT_VAR => {
            let allowed = match pattern.last() {
                Some(Segment::File { extensions, .. }) => *extensions,
                _ => &[],
            };
            if !allowed.iter().any(|e| *e == value.as_str()) {
                return Err(invalid(rt, name, value, "extension not allowed"));
            }
        }
        _ => {
            let is_entry = rt.entry_variable == Some(name)
                || registry
                    .ancestors(rt)
                    .iter()
                    .any(|a| a.entry_variable == Some(name));
            if is_entry {
                // family entries may be unversioned
                if !value.is_empty() && Version::parse(value).is_err() {
                    return Err(invalid(rt, name, value, "not a valid version"));
                }
                return Ok(());
            }
            if value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']) {
                return Err(invalid(rt, name, value, "not a valid path component"));
            }
            if name == "version" && Version::parse(value).is_err() {
                return Err(invalid(rt, name, value, "not a valid version"));
            }
        }
    }
    Ok(())
}

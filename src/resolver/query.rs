//! Query parameters for the resolution engine.

use crate::template::Variables;
use std::fmt;
use std::path::PathBuf;

/// What to look for.
///
/// Every field is optional. An empty query visits every resource under
/// every root that has a search path binding.
///
/// ```
/// use pkgres::Query;
///
/// let query = Query::new()
///     .key("package.*")
///     .root("folder.packages_root")
///     .var("name", "foo");
/// assert_eq!(query.to_string(), "keys=[package.*] root=folder.packages_root variables={name=foo}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Key patterns selecting the types to yield.
    pub keys: Vec<String>,
    /// Root type to start from.
    pub root: Option<String>,
    /// Partial variable constraints.
    pub variables: Variables,
    /// Search path binding every candidate root.
    pub search_path: Option<PathBuf>,
    /// A known path that must resolve to the result.
    pub filepath: Option<PathBuf>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key pattern.
    pub fn key(mut self, pattern: impl Into<String>) -> Self {
        self.keys.push(pattern.into());
        self
    }

    /// Add several key patterns.
    pub fn keys<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn root(mut self, key: impl Into<String>) -> Self {
        self.root = Some(key.into());
        self
    }

    /// Constrain a variable.
    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Constrain several variables.
    pub fn variables(mut self, variables: Variables) -> Self {
        self.variables.extend(variables);
        self
    }

    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_path = Some(path.into());
        self
    }

    pub fn filepath(mut self, path: impl Into<PathBuf>) -> Self {
        self.filepath = Some(path.into());
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.keys.is_empty() {
            parts.push(format!("keys=[{}]", self.keys.join(", ")));
        }
        if let Some(root) = &self.root {
            parts.push(format!("root={}", root));
        }
        if !self.variables.is_empty() {
            let vars: Vec<String> = self
                .variables
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            parts.push(format!("variables={{{}}}", vars.join(", ")));
        }
        if let Some(path) = &self.search_path {
            parts.push(format!("search_path={}", path.display()));
        }
        if let Some(path) = &self.filepath {
            parts.push(format!("filepath={}", path.display()));
        }
        if parts.is_empty() {
            write!(f, "<any>")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

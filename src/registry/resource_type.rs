//! Static resource type descriptors.
//!
//! A [`ResourceType`] is pure data: a key, a parent key, a relative path
//! pattern and a content category. Descriptors never hold resolved state;
//! that lives on [`crate::resource::Resource`].

/// Variable holding the absolute path a root resource is bound to.
pub const SEARCH_PATH_VAR: &str = "search_path";

/// Variable holding the extension of a file segment.
pub const EXT_VAR: &str = "ext";

/// Part of a path segment: either fixed text or a named variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Name {
    /// Fixed text that must match exactly.
    Literal(&'static str),
    /// A variable bound to whatever text appears at this position.
    Var(&'static str),
}

impl Name {
    /// The variable name, if this is a variable.
    pub fn var(&self) -> Option<&'static str> {
        match self {
            Name::Var(v) => Some(v),
            Name::Literal(_) => None,
        }
    }
}

/// One component of a path pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// A directory.
    Dir(Name),
    /// A terminal file `<stem>.<ext>`; `ext` binds [`EXT_VAR`] and must be
    /// one of `extensions`.
    File {
        stem: Name,
        extensions: &'static [&'static str],
    },
}

impl Segment {
    /// Variables bound by this segment.
    pub fn variables(&self) -> Vec<&'static str> {
        match self {
            Segment::Dir(name) => name.var().into_iter().collect(),
            Segment::File { stem, .. } => stem.var().into_iter().chain([EXT_VAR]).collect(),
        }
    }

    /// Whether this segment names a file rather than a directory.
    pub fn is_file(&self) -> bool {
        matches!(self, Segment::File { .. })
    }
}

/// What `load()` produces for a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    /// Directories and roots; nothing to load.
    None,
    /// A single package definition validated against the package schema.
    Package,
    /// A combined file holding several package versions.
    Family,
    /// One version entry decomposed out of its parent family file.
    FamilyEntry,
}

/// Where a root resource type gets its search paths from when the caller
/// does not supply one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootBinding {
    /// Not a root.
    None,
    /// The configured package search paths.
    PackagesPath,
    /// Only an explicit search path will do.
    Explicit,
}

/// Immutable descriptor of one resource category.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceType {
    /// Unique dotted key, e.g. `package.versioned`.
    pub key: &'static str,
    /// Key of the parent type; `None` for roots.
    pub parent: Option<&'static str>,
    /// Path pattern relative to the parent's path. Empty for roots and
    /// sub-resources.
    pub pattern: &'static [Segment],
    /// Content category.
    pub content: Content,
    /// Default search path binding; only meaningful for roots.
    pub binding: RootBinding,
    /// For sub-resources, the variable that selects an entry of the parent's
    /// content.
    pub entry_variable: Option<&'static str>,
}

impl ResourceType {
    /// Whether this type has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this type is virtual, decomposed from its parent's content.
    pub fn is_sub_resource(&self) -> bool {
        self.entry_variable.is_some()
    }

    /// Variables introduced by this type (not inherited from ancestors).
    pub fn own_variables(&self) -> Vec<&'static str> {
        if self.is_root() {
            return vec![SEARCH_PATH_VAR];
        }
        let mut vars: Vec<&'static str> = self.pattern.iter().flat_map(Segment::variables).collect();
        vars.extend(self.entry_variable);
        vars
    }

    /// Extensions accepted by the terminal file segment, if there is one.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self.pattern.last() {
            Some(Segment::File { extensions, .. }) => extensions,
            _ => &[],
        }
    }
}

//! Error types for resource resolution and metadata loading.
//!
//! Errors come in two tiers:
//!
//! - [`ResourceError`] is the resolution tier. It is raised while working out
//!   *which* resources a query refers to, and aborts the query.
//! - [`MetadataError`] is the content tier. It is raised only when a resource
//!   is loaded, so a malformed file never interrupts iteration over its
//!   siblings.
//!
//! [`Error`] wraps both, and [`Result`] is the alias used by the public API.

use std::path::PathBuf;
use thiserror::Error;

/// Resolution-tier failures.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A root resource type was requested without any search path binding.
    #[error("Resource type '{key}' needs a search path")]
    MissingSearchPath { key: String },

    /// No registered resource type matches a key or key pattern.
    #[error("Unknown resource key: {key}")]
    UnknownKey { key: String },

    /// Two resource types were registered under the same key.
    #[error("Duplicate resource key: {key}")]
    DuplicateKey { key: String },

    /// The key given as a root is registered but has a parent.
    #[error("Resource type '{key}' is not a root resource type")]
    NotARootKey { key: String },

    /// The requested keys live under more than one root hierarchy.
    #[error("Requested resource types span conflicting hierarchies ({roots:?}): {keys:?}")]
    ConflictingHierarchies {
        keys: Vec<String>,
        roots: Vec<String>,
    },

    /// An exactly-one query found nothing.
    #[error("No resource found matching {query}")]
    NoMatch { query: String },

    /// An exactly-one query found several resources.
    #[error("Ambiguous query {query}: {count} resources match")]
    Ambiguous { query: String, count: usize },

    /// A filepath did not fit the pattern of any candidate resource type.
    #[error("File path does not match any known resource: {path}")]
    UnmatchedFilepath { path: PathBuf },

    /// A variable the resource type requires was not supplied.
    #[error("Resource '{key}' is missing required variable '{variable}'")]
    MissingVariable { key: String, variable: String },

    /// A variable value failed its type check.
    #[error("Invalid value '{value}' for variable '{variable}' of resource '{key}': {reason}")]
    InvalidVariable {
        key: String,
        variable: String,
        value: String,
        reason: String,
    },

    /// The resource described by a handle no longer exists on disk.
    #[error("Resource '{key}' not found at {path}")]
    NotFound { key: String, path: PathBuf },

    /// A serialized handle could not be decoded.
    #[error("Invalid resource handle: {message}")]
    InvalidHandle { message: String },

    /// Filesystem failure while enumerating candidates.
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Content-tier failures, raised only by `load()`.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The file could not be read or parsed by its loader.
    #[error("Failed to read package metadata at {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// No loader is registered for the file's extension.
    #[error("No metadata loader registered for '.{extension}' files ({path})")]
    NoLoader { path: PathBuf, extension: String },

    /// The content did not satisfy the schema.
    #[error("Invalid package metadata at {path}: {message}")]
    Invalid { path: PathBuf, message: String },

    /// A combined family has no entry for the requested version.
    #[error("No entry for version '{version}' in {path}")]
    MissingEntry { path: PathBuf, version: String },

    /// The version encoded in the folder differs from the declared version.
    #[error("Version mismatch at {path}: folder says '{folder}', file declares '{declared}'")]
    VersionMismatch {
        path: PathBuf,
        folder: String,
        declared: String,
    },
}

/// Top-level error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Resolution-tier error.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Content-tier error.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// Settings could not be read.
    #[error("Failed to load settings from {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Writing a report failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Loaded data could not be rendered as YAML.
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_yaml::Error),
}

impl Error {
    /// Whether this is a resolution-tier error.
    pub fn is_resource_error(&self) -> bool {
        matches!(self, Error::Resource(_))
    }

    /// Whether this is a content-tier error.
    pub fn is_metadata_error(&self) -> bool {
        matches!(self, Error::Metadata(_))
    }
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

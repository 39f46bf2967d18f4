//! pkgres - Package resource resolution.
//!
//! pkgres locates, disambiguates and loads package definition files laid
//! out under one or more search paths. The layout is described by a static
//! hierarchy of resource types (family folders, version folders, package
//! files, and combined files holding several versions), and queries are
//! resolved against it by lazily walking the filesystem.
//!
//! # Modules
//!
//! - [`registry`] - Resource type descriptors and the built-in hierarchy
//! - [`template`] - Path pattern matching, rendering and enumeration
//! - [`resource`] - Resolved resources, handles and the instance cache
//! - [`resolver`] - Queries and lazy traversal
//! - [`metadata`] - Loaders, package schema and combined-file decomposition
//! - [`context`] - The resolution context tying everything together
//! - [`config`] - Settings loading
//! - [`types`] - Version and requirement values
//! - [`error`] - Error types and result aliases
//! - [`cli`] - The `pkgres` inspection command
//!
//! # Example
//!
//! ```
//! use pkgres::{Context, Query, Settings};
//! use std::fs;
//!
//! let dir = tempfile::tempdir().unwrap();
//! fs::create_dir_all(dir.path().join("foo/1.0")).unwrap();
//! fs::write(dir.path().join("foo/1.0/package.yaml"), "name: foo\nversion: '1.0'\n").unwrap();
//!
//! let ctx = Context::new(Settings::with_packages_path([dir.path()]));
//! let query = Query::new().key("package.versioned").var("name", "foo");
//! let package = ctx.get_resource(&query).unwrap();
//! assert_eq!(package.get("version"), Some("1.0"));
//!
//! let data = package.load(&ctx).unwrap();
//! assert_eq!(data.as_package().unwrap().name, "foo");
//! ```

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod metadata;
pub mod registry;
pub mod resolver;
pub mod resource;
pub mod template;
pub mod types;

pub use config::Settings;
pub use context::Context;
pub use error::{Error, MetadataError, ResourceError, Result};
pub use metadata::ResourceData;
pub use resolver::{Query, ResourceIter};
pub use resource::{Resource, ResourceHandle};
pub use template::Variables;

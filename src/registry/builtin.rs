//! The built-in package resource hierarchy.
//!
//! ```text
//! folder.packages_root            <search_path>
//! ├── folder.name                 <search_path>/<name>/
//! │   ├── folder.version          <search_path>/<name>/<version>/
//! │   │   └── package.versioned   <search_path>/<name>/<version>/package.<ext>
//! │   └── package.versionless     <search_path>/<name>/package.<ext>
//! └── package_family.combined     <search_path>/<name>.<ext>
//!     └── package.combined        (one per version entry in the file)
//!
//! folder.dev_packages_root        <search_path>
//! └── package.dev                 <search_path>/package.<ext>
//! ```

use super::resource_type::{Content, Name, ResourceType, RootBinding, Segment};

/// File extensions package definitions may use.
pub const PACKAGE_EXTENSIONS: &[&str] = &["yaml", "py"];

const PACKAGE_FILE: Segment = Segment::File {
    stem: Name::Literal("package"),
    extensions: PACKAGE_EXTENSIONS,
};

/// Every built-in resource type, parents before children.
pub static BUILTIN_RESOURCE_TYPES: &[ResourceType] = &[
    ResourceType {
        key: "folder.packages_root",
        parent: None,
        pattern: &[],
        content: Content::None,
        binding: RootBinding::PackagesPath,
        entry_variable: None,
    },
    ResourceType {
        key: "folder.name",
        parent: Some("folder.packages_root"),
        pattern: &[Segment::Dir(Name::Var("name"))],
        content: Content::None,
        binding: RootBinding::None,
        entry_variable: None,
    },
    ResourceType {
        key: "folder.version",
        parent: Some("folder.name"),
        pattern: &[Segment::Dir(Name::Var("version"))],
        content: Content::None,
        binding: RootBinding::None,
        entry_variable: None,
    },
    ResourceType {
        key: "package.versionless",
        parent: Some("folder.name"),
        pattern: &[PACKAGE_FILE],
        content: Content::Package,
        binding: RootBinding::None,
        entry_variable: None,
    },
    ResourceType {
        key: "package.versioned",
        parent: Some("folder.version"),
        pattern: &[PACKAGE_FILE],
        content: Content::Package,
        binding: RootBinding::None,
        entry_variable: None,
    },
    ResourceType {
        key: "package_family.combined",
        parent: Some("folder.packages_root"),
        pattern: &[Segment::File {
            stem: Name::Var("name"),
            extensions: PACKAGE_EXTENSIONS,
        }],
        content: Content::Family,
        binding: RootBinding::None,
        entry_variable: None,
    },
    ResourceType {
        key: "package.combined",
        parent: Some("package_family.combined"),
        pattern: &[],
        content: Content::FamilyEntry,
        binding: RootBinding::None,
        entry_variable: Some("version"),
    },
    ResourceType {
        key: "folder.dev_packages_root",
        parent: None,
        pattern: &[],
        content: Content::None,
        binding: RootBinding::Explicit,
        entry_variable: None,
    },
    ResourceType {
        key: "package.dev",
        parent: Some("folder.dev_packages_root"),
        pattern: &[PACKAGE_FILE],
        content: Content::Package,
        binding: RootBinding::None,
        entry_variable: None,
    },
];

//! Metadata loading and validation.
//!
//! [`load`] dispatches on a resource type's [`Content`] category:
//!
//! - folders and roots produce [`ResourceData::Folder`]
//! - package files are read by the extension's loader and validated
//! - combined family files are decomposed into their entries, and a
//!   `package.combined` sub-resource validates just its own entry
//!
//! Every failure here is content-tier ([`MetadataError`]); nothing in this
//! module runs during iteration except [`family_versions`].

pub mod combined;
pub mod loader;
pub mod schema;

pub use combined::{decompose, FamilyEntry, VERSIONS_KEY, VERSION_KEY};
pub use loader::{LoaderRegistry, MetadataLoader, YamlLoader};
pub use schema::{validate_package, FamilyMetadata, PackageMetadata, ResourceData};

use crate::context::Context;
use crate::error::MetadataError;
use crate::registry::Content;
use crate::resource::Resource;
use crate::types::Version;

/// Variable naming the version of versioned packages and family entries.
const VERSION_VAR: &str = "version";

/// Load and validate a resource's content.
pub fn load(ctx: &Context, resource: &Resource) -> Result<ResourceData, MetadataError> {
    let path = resource.path();
    match resource.resource_type().content {
        Content::None => Ok(ResourceData::Folder),
        Content::Package => {
            let raw = ctx.loaders().load(path)?;
            let package = validate_package(raw, path)?;
            if ctx.settings().check_version_consistency {
                check_version_consistency(resource, &package)?;
            }
            Ok(ResourceData::Package(package))
        }
        Content::Family => {
            let raw = ctx.loaders().load(path)?;
            let mut name = None;
            let mut versions = Vec::new();
            for entry in decompose(&raw, path)? {
                let package = validate_package(entry.data, path)?;
                name.get_or_insert(package.name);
                versions.push(package.version.unwrap_or_else(Version::empty));
            }
            Ok(ResourceData::Family(FamilyMetadata {
                name: name.unwrap_or_default(),
                versions,
            }))
        }
        Content::FamilyEntry => {
            let version = resource.get(VERSION_VAR).unwrap_or_default();
            let raw = ctx.loaders().load(path)?;
            let entry = combined::entry(&raw, path, version)?;
            Ok(ResourceData::Package(validate_package(entry.data, path)?))
        }
    }
}

/// The entry versions of a family resource, without validating entries.
pub fn family_versions(ctx: &Context, family: &Resource) -> Result<Vec<String>, MetadataError> {
    let raw = ctx.loaders().load(family.path())?;
    combined::entry_versions(&raw, family.path())
}

/// Compare the version folder a package lives in with the version the file
/// declares.
fn check_version_consistency(
    resource: &Resource,
    package: &PackageMetadata,
) -> Result<(), MetadataError> {
    let Some(folder) = resource.get(VERSION_VAR) else {
        return Ok(());
    };
    let declared = package.version.as_ref().map(Version::as_str).unwrap_or("");
    if declared != folder {
        return Err(MetadataError::VersionMismatch {
            path: resource.path().to_path_buf(),
            folder: folder.to_string(),
            declared: declared.to_string(),
        });
    }
    Ok(())
}

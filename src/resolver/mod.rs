//! The resolution engine.
//!
//! A [`Query`] is first planned into a list of walks, one per root search
//! path binding, each carrying the set of types to yield and the variable
//! constraints. Planning is where every resolution-tier error is raised,
//! except filesystem failures, which surface during iteration.
//!
//! The walks are then traversed lazily by [`ResourceIter`].

pub mod iter;
pub mod query;

pub use iter::ResourceIter;
pub use query::Query;

use crate::context::Context;
use crate::error::{ResourceError, Result};
use crate::metadata::ResourceData;
use crate::registry::{Registry, ResourceType, SEARCH_PATH_VAR};
use crate::resource::Resource;
use crate::template::{self, Variables};
use iter::{Selection, Walk};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lazily iterate every resource matching `query`.
pub fn iter_resources<'c>(ctx: &'c Context, query: &Query) -> Result<ResourceIter<'c>> {
    let walks = plan(ctx, query)?;
    Ok(ResourceIter::new(ctx, walks))
}

/// The single resource matching `query`.
///
/// Fails with [`ResourceError::NoMatch`] or [`ResourceError::Ambiguous`]
/// unless exactly one resource matches.
pub fn get_resource(ctx: &Context, query: &Query) -> Result<Arc<Resource>> {
    let mut found = iter_resources(ctx, query)?.collect::<Result<Vec<_>>>()?;
    match found.len() {
        0 => Err(ResourceError::NoMatch {
            query: query.to_string(),
        }
        .into()),
        1 => Ok(found.remove(0)),
        count => Err(ResourceError::Ambiguous {
            query: query.to_string(),
            count,
        }
        .into()),
    }
}

/// Load the content of the single resource matching `query`.
pub fn load_resource(ctx: &Context, query: &Query) -> Result<ResourceData> {
    get_resource(ctx, query)?.load(ctx)
}

/// A root type together with the types to yield below it.
struct Scope {
    root: &'static ResourceType,
    types: Vec<&'static ResourceType>,
    /// The caller asked for this root, directly or through a key.
    required: bool,
}

/// Search paths a scope's root may be bound to.
enum Bindings {
    Paths(Vec<String>),
    /// A requested root with nothing configured, bound by the prefix of the
    /// query's filepath.
    FromFilepath,
}

fn absolute(path: &Path) -> std::result::Result<PathBuf, ResourceError> {
    std::path::absolute(path)
        .map(|p| template::normalize_path(&p))
        .map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn plan(ctx: &Context, query: &Query) -> Result<Vec<Walk>> {
    let registry = ctx.registry();
    let scopes = scopes(registry, query)?;

    let mut constraints = query.variables.clone();
    if let Some(sp) = constraints.get_mut(SEARCH_PATH_VAR) {
        *sp = template::path_value(&absolute(Path::new(sp.as_str()))?);
    }
    let explicit = match (&query.search_path, constraints.get(SEARCH_PATH_VAR)) {
        (Some(path), _) => Some(template::path_value(&absolute(path)?)),
        (None, Some(sp)) => Some(sp.clone()),
        (None, None) => None,
    };

    let mut bound = Vec::new();
    for scope in scopes {
        let bindings: Vec<String> = match &explicit {
            Some(sp) => vec![sp.clone()],
            None => ctx
                .default_bindings(scope.root)
                .iter()
                .map(|p| template::path_value(p))
                .collect(),
        };
        if !bindings.is_empty() {
            bound.push((scope, Bindings::Paths(bindings)));
        } else if scope.required && query.filepath.is_some() {
            bound.push((scope, Bindings::FromFilepath));
        } else if scope.required {
            return Err(ResourceError::MissingSearchPath {
                key: scope.root.key.to_string(),
            }
            .into());
        } else {
            tracing::debug!("Skipping {}: no search path", scope.root.key);
        }
    }

    match &query.filepath {
        Some(filepath) => plan_filepath(registry, &absolute(filepath)?, bound, constraints),
        None => Ok(bound
            .into_iter()
            .flat_map(|(scope, bindings)| {
                let selection = Selection::new(registry, scope.types, constraints.clone());
                let paths = match bindings {
                    Bindings::Paths(paths) => paths,
                    Bindings::FromFilepath => Vec::new(),
                };
                paths.into_iter().map(move |search_path| Walk {
                    root: scope.root,
                    search_path,
                    selection: selection.clone(),
                })
            })
            .collect()),
    }
}

/// Work out which roots to start from and which types to yield below each.
fn scopes(registry: &Registry, query: &Query) -> Result<Vec<Scope>> {
    let explicit_root = match &query.root {
        Some(key) => {
            let rt = registry.lookup(key)?;
            if !rt.is_root() {
                return Err(ResourceError::NotARootKey { key: key.clone() }.into());
            }
            Some(rt)
        }
        None => None,
    };

    if query.keys.is_empty() {
        let roots = explicit_root.map_or_else(|| registry.roots(), |rt| vec![rt]);
        return Ok(roots
            .into_iter()
            .map(|root| Scope {
                root,
                types: registry.subtree(root).into_iter().skip(1).collect(),
                required: explicit_root.is_some(),
            })
            .collect());
    }

    let selected = registry.matching(&query.keys)?;
    if let Some(root) = explicit_root {
        let subtree = registry.subtree(root);
        let types: Vec<_> = selected
            .into_iter()
            .filter(|rt| subtree.iter().any(|t| t.key == rt.key))
            .collect();
        if types.is_empty() {
            return Err(ResourceError::UnknownKey {
                key: format!("{} under {}", query.keys.join(", "), root.key),
            }
            .into());
        }
        return Ok(vec![Scope {
            root,
            types,
            required: true,
        }]);
    }

    let mut roots: Vec<&'static ResourceType> = Vec::new();
    for rt in &selected {
        let root = registry.root_of(rt);
        if !roots.iter().any(|r| r.key == root.key) {
            roots.push(root);
        }
    }
    match roots.as_slice() {
        [root] => Ok(vec![Scope {
            root,
            types: selected,
            required: true,
        }]),
        _ => Err(ResourceError::ConflictingHierarchies {
            keys: query.keys.clone(),
            roots: roots.iter().map(|r| r.key.to_string()).collect(),
        }
        .into()),
    }
}

/// One walk per type whose pattern produces `filepath` under a bound root.
fn plan_filepath(
    registry: &Registry,
    filepath: &Path,
    bound: Vec<(Scope, Bindings)>,
    constraints: Variables,
) -> Result<Vec<Walk>> {
    let mut walks: Vec<Walk> = Vec::new();
    for (scope, bindings) in &bound {
        for &rt in &scope.types {
            if rt.is_root() {
                continue;
            }
            let pattern = registry.full_pattern(rt);
            let Some(extracted) = template::extract(filepath, &pattern, &constraints) else {
                continue;
            };
            let search_path = extracted[SEARCH_PATH_VAR].clone();
            if let Bindings::Paths(paths) = bindings {
                if !paths.contains(&search_path) {
                    continue;
                }
            }
            tracing::debug!("{} matches {}", filepath.display(), rt.key);

            let mut merged = constraints.clone();
            merged.extend(extracted);
            match walks.iter_mut().find(|w| {
                w.root.key == scope.root.key
                    && w.search_path == search_path
                    && w.selection.constraints() == &merged
            }) {
                Some(walk) => walk.selection.add(registry, rt),
                None => walks.push(Walk {
                    root: scope.root,
                    search_path,
                    selection: Selection::new(registry, [rt], merged),
                }),
            }
        }
    }
    if walks.is_empty() {
        return Err(ResourceError::UnmatchedFilepath {
            path: filepath.to_path_buf(),
        }
        .into());
    }
    Ok(walks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::Error;

    fn ctx() -> Context {
        Context::new(Settings::with_packages_path(["/a", "/b"]))
    }

    fn resource_error(result: Result<Vec<Walk>>) -> ResourceError {
        match result {
            Err(Error::Resource(e)) => e,
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn empty_query_walks_every_bound_root() {
        let ctx = ctx();
        let walks = plan(&ctx, &Query::new()).unwrap();
        let paths: Vec<_> = walks.iter().map(|w| w.search_path.as_str()).collect();
        assert_eq!(paths, ["/a", "/b"]);
        assert!(walks.iter().all(|w| w.root.key == "folder.packages_root"));
    }

    #[test]
    fn search_path_overrides_defaults() {
        let ctx = ctx();
        let walks = plan(&ctx, &Query::new().search_path("/c/")).unwrap();
        let paths: Vec<_> = walks.iter().map(|w| w.search_path.as_str()).collect();
        assert_eq!(paths, ["/c", "/c"]);
    }

    #[test]
    fn explicit_root_without_binding_fails() {
        let ctx = ctx();
        let err = resource_error(plan(&ctx, &Query::new().key("package.dev")));
        assert!(matches!(err, ResourceError::MissingSearchPath { .. }));

        let err = resource_error(plan(&ctx, &Query::new().root("folder.dev_packages_root")));
        assert!(matches!(err, ResourceError::MissingSearchPath { .. }));
    }

    #[test]
    fn keys_from_two_hierarchies_conflict() {
        let ctx = ctx();
        let err = resource_error(plan(
            &ctx,
            &Query::new().keys(["package.versioned", "package.dev"]),
        ));
        assert!(matches!(err, ResourceError::ConflictingHierarchies { .. }));
    }

    #[test]
    fn root_key_filters_keys_to_its_subtree() {
        let ctx = ctx();
        let walks = plan(&ctx, &Query::new().key("folder.*").root("folder.packages_root")).unwrap();
        assert_eq!(walks.len(), 2);

        let err = resource_error(plan(
            &ctx,
            &Query::new().key("package.dev").root("folder.packages_root"),
        ));
        assert!(matches!(err, ResourceError::UnknownKey { .. }));
    }

    #[test]
    fn root_key_must_be_a_root() {
        let ctx = ctx();
        let err = resource_error(plan(&ctx, &Query::new().root("folder.name")));
        assert!(matches!(err, ResourceError::NotARootKey { .. }));
    }

    #[test]
    fn unknown_key_fails() {
        let ctx = ctx();
        let err = resource_error(plan(&ctx, &Query::new().key("non_existent")));
        assert!(matches!(err, ResourceError::UnknownKey { .. }));
    }

    #[test]
    fn filepath_binds_variables() {
        let ctx = ctx();
        let walks = plan(&ctx, &Query::new().filepath("/b/foo/1.0/package.py")).unwrap();
        assert_eq!(walks.len(), 1);
        assert_eq!(walks[0].search_path, "/b");
        assert_eq!(walks[0].selection.constraints().get("version").unwrap(), "1.0");
        assert_eq!(walks[0].selection.constraints().get("ext").unwrap(), "py");
    }

    #[test]
    fn filepath_matching_family_and_entries_shares_a_walk() {
        let ctx = ctx();
        let walks = plan(&ctx, &Query::new().filepath("/a/multi.yaml").var("version", "1.1")).unwrap();
        // folder.name also fits structurally, as a directory called multi.yaml
        let family: Vec<_> = walks
            .iter()
            .filter(|w| w.selection.constraints().get("name").map(String::as_str) == Some("multi"))
            .collect();
        assert_eq!(family.len(), 1);
        assert_eq!(family[0].selection.constraints().get("ext").unwrap(), "yaml");
    }

    #[test]
    fn filepath_binds_a_requested_root_without_search_path() {
        let ctx = ctx();
        let walks = plan(
            &ctx,
            &Query::new().key("package.dev").filepath("/work/dev/package.yaml"),
        )
        .unwrap();
        assert_eq!(walks.len(), 1);
        assert_eq!(walks[0].root.key, "folder.dev_packages_root");
        assert_eq!(walks[0].search_path, "/work/dev");

        let walks = plan(
            &ctx,
            &Query::new()
                .root("folder.dev_packages_root")
                .filepath("/work/dev/package.yaml"),
        )
        .unwrap();
        assert_eq!(walks.len(), 1);
        assert_eq!(walks[0].search_path, "/work/dev");
    }

    #[test]
    fn unrequested_unbound_root_ignores_filepath() {
        let ctx = ctx();
        let err = resource_error(plan(&ctx, &Query::new().filepath("/work/dev/package.yaml")));
        assert!(matches!(err, ResourceError::UnmatchedFilepath { .. }));
    }

    #[test]
    fn duplicate_packages_path_entries_walk_once() {
        let ctx = Context::new(Settings::with_packages_path(["/a", "/a/", "/b", "/a/./"]));
        let walks = plan(&ctx, &Query::new().key("package.versionless")).unwrap();
        let paths: Vec<_> = walks.iter().map(|w| w.search_path.as_str()).collect();
        assert_eq!(paths, ["/a", "/b"]);
    }

    #[test]
    fn filepath_outside_bindings_fails() {
        let ctx = ctx();
        let err = resource_error(plan(&ctx, &Query::new().filepath("/path/to/nothing")));
        assert!(matches!(err, ResourceError::UnmatchedFilepath { .. }));
    }
}

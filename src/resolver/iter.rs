//! Lazy depth-first traversal.

use crate::context::Context;
use crate::error::Result;
use crate::registry::{Registry, ResourceType, SEARCH_PATH_VAR};
use crate::resource::{child_instances, InstanceIter, Resource};
use crate::template::Variables;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Which types a traversal yields and visits, and the variables every
/// yielded resource must carry.
#[derive(Debug, Clone)]
pub(crate) struct Selection {
    yielded: HashSet<&'static str>,
    traversable: HashSet<&'static str>,
    constraints: Arc<Variables>,
}

impl Selection {
    pub(crate) fn new(
        registry: &Registry,
        yielded: impl IntoIterator<Item = &'static ResourceType>,
        constraints: Variables,
    ) -> Self {
        let mut yield_keys = HashSet::new();
        let mut traversable = HashSet::new();
        for rt in yielded {
            yield_keys.insert(rt.key);
            traversable.insert(rt.key);
            traversable.extend(registry.ancestors(rt).iter().map(|a| a.key));
        }
        Self {
            yielded: yield_keys,
            traversable,
            constraints: Arc::new(constraints),
        }
    }

    pub(crate) fn add(&mut self, registry: &Registry, rt: &'static ResourceType) {
        self.yielded.insert(rt.key);
        self.traversable.insert(rt.key);
        self.traversable
            .extend(registry.ancestors(rt).iter().map(|a| a.key));
    }

    pub(crate) fn constraints(&self) -> &Variables {
        &self.constraints
    }

    fn accepts(&self, resource: &Resource) -> bool {
        !resource.resource_type().is_root()
            && self.yielded.contains(resource.key())
            && self
                .constraints
                .iter()
                .all(|(name, value)| resource.get(name) == Some(value.as_str()))
    }
}

/// One root binding to traverse.
#[derive(Debug, Clone)]
pub(crate) struct Walk {
    pub(crate) root: &'static ResourceType,
    pub(crate) search_path: String,
    pub(crate) selection: Selection,
}

/// Lazy sequence of resources matching a query.
///
/// Parents come before their children. Dropping the iterator early leaves
/// unvisited directories unlisted. After the first error the iterator is
/// exhausted.
pub struct ResourceIter<'c> {
    ctx: &'c Context,
    walks: VecDeque<Walk>,
    selection: Option<Selection>,
    stack: Vec<InstanceIter<'c>>,
    done: bool,
}

impl<'c> ResourceIter<'c> {
    pub(crate) fn new(ctx: &'c Context, walks: Vec<Walk>) -> Self {
        Self {
            ctx,
            walks: walks.into(),
            selection: None,
            stack: Vec::new(),
            done: false,
        }
    }

    /// Start the next walk. Returns `false` when none are left.
    fn start_walk(&mut self) -> Result<bool> {
        let Some(walk) = self.walks.pop_front() else {
            return Ok(false);
        };
        let mut variables = Variables::new();
        variables.insert(SEARCH_PATH_VAR.to_string(), walk.search_path);
        let root = self.ctx.get(walk.root, variables)?;
        if !root.path().is_dir() {
            tracing::debug!(
                "Skipping {}: {} is not a directory",
                walk.root.key,
                root.path().display()
            );
            return Ok(true);
        }
        tracing::debug!("Walking {} at {}", walk.root.key, root.path().display());
        self.push_children(&walk.selection, root);
        self.selection = Some(walk.selection);
        Ok(true)
    }

    fn push_children(&mut self, selection: &Selection, parent: Arc<Resource>) {
        let ctx = self.ctx;
        let children: Vec<&'static ResourceType> = ctx
            .registry()
            .children(parent.resource_type())
            .into_iter()
            .filter(|c| selection.traversable.contains(c.key))
            .collect();
        if children.is_empty() {
            return;
        }
        let known = Arc::clone(&selection.constraints);
        self.stack.push(Box::new(children.into_iter().flat_map(move |rt| {
            child_instances(ctx, Arc::clone(&parent), rt, Arc::clone(&known))
        })));
    }
}

impl Iterator for ResourceIter<'_> {
    type Item = Result<Arc<Resource>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            if self.stack.is_empty() {
                match self.start_walk() {
                    Ok(true) => continue,
                    Ok(false) => {
                        self.done = true;
                        return None;
                    }
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }
            let next = self.stack.last_mut().and_then(|top| top.next());
            match next {
                Some(Ok(resource)) => {
                    let Some(selection) = self.selection.take() else {
                        continue;
                    };
                    self.push_children(&selection, Arc::clone(&resource));
                    let accepted = selection.accepts(&resource);
                    self.selection = Some(selection);
                    if accepted {
                        return Some(Ok(resource));
                    }
                }
                Some(Err(e)) => {
                    self.done = true;
                    self.stack.clear();
                    return Some(Err(e));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::template;
    use std::fs;
    use tempfile::TempDir;

    fn walk(ctx: &Context, sp: &str, keys: &[&str], constraints: Variables) -> Walk {
        let registry = ctx.registry();
        let yielded: Vec<_> = keys.iter().map(|k| registry.get(k).unwrap()).collect();
        Walk {
            root: registry.get("folder.packages_root").unwrap(),
            search_path: sp.to_string(),
            selection: Selection::new(registry, yielded, constraints),
        }
    }

    fn fixture() -> (TempDir, String) {
        let temp = TempDir::new().unwrap();
        for name in ["a", "b"] {
            let dir = temp.path().join(name).join("1.0");
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("package.yaml"), format!("name: {}\n", name)).unwrap();
        }
        let sp = template::path_value(temp.path());
        (temp, sp)
    }

    #[test]
    fn parents_come_before_children() {
        let (_temp, sp) = fixture();
        let ctx = Context::default();
        let w = walk(
            &ctx,
            &sp,
            &["folder.name", "folder.version", "package.versioned"],
            Variables::new(),
        );
        let keys: Vec<_> = ResourceIter::new(&ctx, vec![w])
            .map(|r| r.unwrap())
            .map(|r| (r.key(), r.get("name").unwrap().to_string()))
            .collect();
        assert_eq!(keys.len(), 6);
        for name in ["a", "b"] {
            let pos = |key: &str| keys.iter().position(|(k, n)| *k == key && n == name).unwrap();
            assert!(pos("folder.name") < pos("folder.version"));
            assert!(pos("folder.version") < pos("package.versioned"));
        }
    }

    #[test]
    fn intermediate_types_are_not_yielded() {
        let (_temp, sp) = fixture();
        let ctx = Context::default();
        let w = walk(&ctx, &sp, &["package.versioned"], Variables::new());
        let all: Vec<_> = ResourceIter::new(&ctx, vec![w]).map(|r| r.unwrap()).collect();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.key() == "package.versioned"));
    }

    #[test]
    fn constraints_narrow_results() {
        let (_temp, sp) = fixture();
        let ctx = Context::default();
        let constraints: Variables = [("name".to_string(), "b".to_string())].into();
        let w = walk(&ctx, &sp, &["package.versioned"], constraints);
        let all: Vec<_> = ResourceIter::new(&ctx, vec![w]).map(|r| r.unwrap()).collect();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].get("name"), Some("b"));
    }

    #[test]
    fn missing_search_path_directory_is_skipped() {
        let ctx = Context::default();
        let w = walk(&ctx, "/definitely/not/here", &["folder.name"], Variables::new());
        assert_eq!(ResourceIter::new(&ctx, vec![w]).count(), 0);
    }

    #[test]
    fn stops_after_first_error() {
        let ctx = Context::default();
        let w = walk(&ctx, "relative", &["folder.name"], Variables::new());
        let mut iter = ResourceIter::new(&ctx, vec![w.clone(), w]);
        assert!(matches!(iter.next(), Some(Err(_))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn early_abandonment() {
        let (_temp, sp) = fixture();
        let ctx = Context::new(Settings::default());
        let w = walk(&ctx, &sp, &["folder.name"], Variables::new());
        let first = ResourceIter::new(&ctx, vec![w]).next().unwrap().unwrap();
        assert_eq!(first.key(), "folder.name");
    }
}

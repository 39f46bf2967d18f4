//! Enumeration of a resource's children of one type.

use super::Resource;
use crate::context::Context;
use crate::error::{Error, ResourceError, Result};
use crate::metadata;
use crate::registry::ResourceType;
use crate::template::{self, Variables};
use std::iter;
use std::sync::Arc;

/// Lazily produced child instances.
pub type InstanceIter<'c> = Box<dyn Iterator<Item = Result<Arc<Resource>>> + 'c>;

/// Instances of `rt` that live directly under `parent`.
///
/// Values in `known` narrow the enumeration: a known directory or file name
/// is checked for existence instead of listing its parent directory.
/// Candidates whose variables fail validation are skipped.
pub fn child_instances<'c>(
    ctx: &'c Context,
    parent: Arc<Resource>,
    rt: &'static ResourceType,
    known: Arc<Variables>,
) -> InstanceIter<'c> {
    if let Some(entry_var) = rt.entry_variable {
        return entries(ctx, &parent, rt, entry_var, &known);
    }

    let bound = parent.variables().clone();
    let found = template::candidates(rt.pattern, parent.path().to_path_buf(), bound, known);
    Box::new(found.filter_map(move |candidate| match candidate {
        Ok((_, variables)) => instantiate(ctx, rt, variables),
        Err(e) => Some(Err(e.into())),
    }))
}

fn entries<'c>(
    ctx: &'c Context,
    family: &Resource,
    rt: &'static ResourceType,
    entry_var: &'static str,
    known: &Variables,
) -> InstanceIter<'c> {
    let versions = match metadata::family_versions(ctx, family) {
        Ok(versions) => versions,
        Err(e) => {
            tracing::warn!("Skipping entries of {}: {}", family.path().display(), e);
            return Box::new(iter::empty());
        }
    };
    let wanted = known.get(entry_var).cloned();
    let base = family.variables().clone();
    Box::new(
        versions
            .into_iter()
            .filter(move |v| wanted.as_ref().is_none_or(|w| w == v))
            .filter_map(move |version| {
                let mut variables = base.clone();
                variables.insert(entry_var.to_string(), version);
                instantiate(ctx, rt, variables)
            }),
    )
}

fn instantiate(
    ctx: &Context,
    rt: &'static ResourceType,
    variables: Variables,
) -> Option<Result<Arc<Resource>>> {
    match ctx.get(rt, variables) {
        Ok(resource) => Some(Ok(resource)),
        Err(ResourceError::InvalidVariable {
            variable, value, reason, ..
        }) => {
            tracing::debug!(
                "Skipping {} candidate: {}='{}' ({})",
                rt.key,
                variable,
                value,
                reason
            );
            None
        }
        Err(e) => Some(Err(Error::from(e))),
    }
}

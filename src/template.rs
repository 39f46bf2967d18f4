//! Path template engine.
//!
//! Matches absolute paths against a resource type's path pattern
//! ([`extract`]), renders paths from variable bindings ([`render`]) and
//! enumerates the filesystem for paths a pattern could describe
//! ([`candidates`]).
//!
//! Enumeration is lazy: a directory is only listed when the consumer pulls
//! past the candidates already produced, and a segment whose value is
//! already known is existence-checked instead of listed.

use crate::error::ResourceError;
use crate::registry::{Name, Segment, EXT_VAR, SEARCH_PATH_VAR};
use std::collections::BTreeMap;
use std::fs;
use std::iter;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// Variable bindings, kept in a stable (sorted) order.
pub type Variables = BTreeMap<String, String>;

/// A lazily produced candidate path with the variables that describe it.
pub type CandidateIter = Box<dyn Iterator<Item = Result<(PathBuf, Variables), ResourceError>>>;

/// Normalize a path for use as a `search_path` value (drops `.` components
/// and trailing separators).
pub fn normalize_path(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// The string form of a path used as a `search_path` variable value.
pub fn path_value(path: &Path) -> String {
    normalize_path(path).to_string_lossy().into_owned()
}

/// Split `name.ext` into its stem and extension.
pub fn split_extension(file_name: &str) -> Option<(&str, &str)> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    (!stem.is_empty() && !ext.is_empty()).then_some((stem, ext))
}

/// Whether `text` can stand as a single path component.
fn is_component(text: &str) -> bool {
    !text.is_empty() && text != "." && text != ".." && !text.contains(['/', '\\'])
}

fn bind(vars: &mut Variables, known: &Variables, name: &str, value: &str) -> bool {
    if known.get(name).is_some_and(|k| k != value) {
        return false;
    }
    match vars.get(name) {
        Some(existing) => existing == value,
        None => {
            vars.insert(name.to_string(), value.to_string());
            true
        }
    }
}

fn bind_name(vars: &mut Variables, known: &Variables, name: Name, text: &str) -> bool {
    match name {
        Name::Literal(lit) => lit == text,
        Name::Var(var) => bind(vars, known, var, text),
    }
}

/// Parse an absolute `path` against `segments` (the full pattern below the
/// root). The leading components not covered by the pattern become the
/// `search_path` variable.
///
/// Fails on a segment-count mismatch, a literal mismatch, a disallowed
/// extension, or a value conflicting with `known`.
pub fn extract(path: &Path, segments: &[Segment], known: &Variables) -> Option<Variables> {
    if !path.is_absolute() {
        return None;
    }
    let components: Vec<Component> = path.components().collect();
    if components.len() <= segments.len() {
        return None;
    }
    let split = components.len() - segments.len();
    let search_path: PathBuf = components[..split].iter().collect();
    if search_path.parent().is_none() {
        // a bare filesystem root is never a search path
        return None;
    }

    let mut vars = Variables::new();
    if !bind(&mut vars, known, SEARCH_PATH_VAR, &path_value(&search_path)) {
        return None;
    }

    for (segment, component) in segments.iter().zip(&components[split..]) {
        let Component::Normal(text) = component else {
            return None;
        };
        let text = text.to_str()?;
        let ok = match *segment {
            Segment::Dir(name) => bind_name(&mut vars, known, name, text),
            Segment::File { stem, extensions } => {
                let (file_stem, ext) = split_extension(text)?;
                extensions.iter().any(|e| *e == ext)
                    && bind_name(&mut vars, known, stem, file_stem)
                    && bind(&mut vars, known, EXT_VAR, ext)
            }
        };
        if !ok {
            return None;
        }
    }
    Some(vars)
}

fn name_text<'a>(name: Name, vars: &'a Variables) -> Option<&'a str> {
    match name {
        Name::Literal(lit) => Some(lit),
        Name::Var(var) => vars.get(var).map(String::as_str),
    }
}

/// Build the path described by `segments` under `search_path`.
///
/// Returns `None` when a variable the pattern needs is not bound.
pub fn render(search_path: &Path, segments: &[Segment], vars: &Variables) -> Option<PathBuf> {
    let mut path = search_path.to_path_buf();
    for segment in segments {
        match *segment {
            Segment::Dir(name) => path.push(name_text(name, vars)?),
            Segment::File { stem, .. } => {
                let ext = vars.get(EXT_VAR)?;
                path.push(format!("{}.{}", name_text(stem, vars)?, ext));
            }
        }
    }
    Some(path)
}

/// Lazily enumerate the paths below `base` that match `segments`.
///
/// `bound` holds the variables already fixed by `base` (they are carried
/// into every candidate). Segments whose variables appear in `known` are
/// existence-checked rather than listed, so a fully specified pattern never
/// lists a directory.
pub fn candidates(
    segments: &'static [Segment],
    base: PathBuf,
    bound: Variables,
    known: Arc<Variables>,
) -> CandidateIter {
    let Some((first, rest)) = segments.split_first() else {
        return Box::new(iter::once(Ok((base, bound))));
    };

    let step = expand_segment(*first, base, bound, &known);
    Box::new(step.flat_map(move |item| -> CandidateIter {
        match item {
            Ok((path, vars)) => candidates(rest, path, vars, Arc::clone(&known)),
            Err(e) => Box::new(iter::once(Err(e))),
        }
    }))
}

fn expand_segment(
    segment: Segment,
    base: PathBuf,
    bound: Variables,
    known: &Arc<Variables>,
) -> CandidateIter {
    match segment {
        Segment::Dir(name) => match name_text(name, known) {
            Some(text) => {
                let path = base.join(text);
                let mut vars = bound;
                if is_component(text) && path.is_dir() && bind_name(&mut vars, known, name, text) {
                    Box::new(iter::once(Ok((path, vars))))
                } else {
                    Box::new(iter::empty())
                }
            }
            None => {
                let known = Arc::clone(known);
                Box::new(list_dir(base).filter_map(move |entry| {
                    let (path, file_name) = match entry {
                        Ok(entry) => entry,
                        Err(e) => return Some(Err(e)),
                    };
                    if !path.is_dir() {
                        return None;
                    }
                    let mut vars = bound.clone();
                    bind_name(&mut vars, &known, name, &file_name).then_some(Ok((path, vars)))
                }))
            }
        },
        Segment::File { stem, extensions } => {
            let extensions: Vec<&'static str> = match known.get(EXT_VAR) {
                Some(ext) => extensions
                    .iter()
                    .copied()
                    .filter(|e| *e == ext.as_str())
                    .collect(),
                None => extensions.to_vec(),
            };
            match name_text(stem, known) {
                Some(text) if !is_component(text) => Box::new(iter::empty()),
                Some(text) => {
                    let found: Vec<_> = extensions
                        .into_iter()
                        .filter_map(|ext| {
                            let path = base.join(format!("{}.{}", text, ext));
                            if !path.is_file() {
                                return None;
                            }
                            let mut vars = bound.clone();
                            (bind_name(&mut vars, known, stem, text)
                                && bind(&mut vars, known, EXT_VAR, ext))
                            .then_some(Ok((path, vars)))
                        })
                        .collect();
                    Box::new(found.into_iter())
                }
                None => {
                    let known = Arc::clone(known);
                    Box::new(list_dir(base).filter_map(move |entry| {
                        let (path, file_name) = match entry {
                            Ok(entry) => entry,
                            Err(e) => return Some(Err(e)),
                        };
                        let (file_stem, ext) = split_extension(&file_name)?;
                        if !extensions.iter().any(|e| *e == ext) || !path.is_file() {
                            return None;
                        }
                        let mut vars = bound.clone();
                        (bind_name(&mut vars, &known, stem, file_stem)
                            && bind(&mut vars, &known, EXT_VAR, ext))
                        .then_some(Ok((path, vars)))
                    }))
                }
            }
        }
    }
}

/// Lazily list a directory, skipping dot-entries and non-UTF-8 names.
fn list_dir(dir: PathBuf) -> Box<dyn Iterator<Item = Result<(PathBuf, String), ResourceError>>> {
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(source) => return Box::new(iter::once(Err(ResourceError::Io { path: dir, source }))),
    };
    Box::new(entries.filter_map(move |entry| match entry {
        Ok(entry) => {
            let file_name = entry.file_name().into_string().ok()?;
            if file_name.starts_with('.') {
                return None;
            }
            Some(Ok((entry.path(), file_name)))
        }
        Err(source) => Some(Err(ResourceError::Io {
            path: dir.clone(),
            source,
        })),
    }))
}

//! Package value types: [`Version`] and [`Requirement`].
//!
//! Both are parsed from strings found in package metadata and in folder
//! names. They are treated as opaque values by the resolver; the only
//! operations it needs are validation, comparison and display.

use regex::Regex;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+(?:[.\-][A-Za-z0-9_]+)*$").unwrap());

static REQUIREMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<prefix>[!~]?)(?P<name>[A-Za-z_][A-Za-z0-9_]*)(?:-(?P<range>[A-Za-z0-9_.+<>=|\-]+)|(?P<op>[<>=][A-Za-z0-9_.+<>=|\-]*))?$")
        .unwrap()
});

/// Error produced when a version or requirement string is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: &'static str,
    input: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.kind, self.input)
    }
}

impl std::error::Error for ParseError {}

/// A package version such as `1.0`, `3.0.1` or `2.1-beta`.
///
/// The empty version is valid and sorts before every other version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    raw: String,
}

impl Version {
    /// Parse a version string.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        if s.is_empty() || VERSION_REGEX.is_match(s) {
            Ok(Self { raw: s.to_string() })
        } else {
            Err(ParseError {
                kind: "version",
                input: s.to_string(),
            })
        }
    }

    /// The empty version.
    pub fn empty() -> Self {
        Self { raw: String::new() }
    }

    /// Whether this is the empty version.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The version as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn tokens(&self) -> impl Iterator<Item = &str> {
        self.raw.split(['.', '-']).filter(|t| !t.is_empty())
    }
}

impl FromStr for Version {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn compare_tokens(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        // numeric tokens sort after alphanumeric ones ("1.0.alpha" < "1.0.0")
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut left = self.tokens();
        let mut right = other.tokens();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return self.raw.cmp(&other.raw),
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(a), Some(b)) => match compare_tokens(a, b) {
                    Ordering::Equal => continue,
                    other => return other,
                },
            }
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Accepts strings and bare numbers, so `version: 1.0` in YAML reads as `"1.0"`.
struct VersionVisitor;

impl<'de> Visitor<'de> for VersionVisitor {
    type Value = Version;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a version string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Version, E> {
        Version::parse(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Version, E> {
        Ok(Version { raw: v.to_string() })
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Version, E> {
        Version::parse(&v.to_string()).map_err(E::custom)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Version, E> {
        Version::parse(&format_float(v)).map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(VersionVisitor)
    }
}

/// Format a float the way it was most likely written (`1.0`, not `1`).
pub(crate) fn format_float(v: f64) -> String {
    format!("{:?}", v)
}

/// A package requirement such as `bah-1.2+<2`, `~weak` or `!conflict`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    raw: String,
    name_start: usize,
    name_end: usize,
}

impl Requirement {
    /// Parse a requirement string.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let s = s.trim();
        let caps = REQUIREMENT_REGEX.captures(s).ok_or_else(|| ParseError {
            kind: "requirement",
            input: s.to_string(),
        })?;
        let name = caps.name("name").ok_or_else(|| ParseError {
            kind: "requirement",
            input: s.to_string(),
        })?;

        Ok(Self {
            raw: s.to_string(),
            name_start: name.start(),
            name_end: name.end(),
        })
    }

    /// The package name this requirement refers to.
    pub fn name(&self) -> &str {
        &self.raw[self.name_start..self.name_end]
    }

    /// The version range, if any (without the separating dash).
    pub fn range(&self) -> Option<&str> {
        let rest = &self.raw[self.name_end..];
        let rest = rest.strip_prefix('-').unwrap_or(rest);
        (!rest.is_empty()).then_some(rest)
    }

    /// Whether this is a conflict requirement (`!name`).
    pub fn is_conflict(&self) -> bool {
        self.raw.starts_with('!')
    }

    /// Whether this is a weak requirement (`~name`).
    pub fn is_weak(&self) -> bool {
        self.raw.starts_with('~')
    }
}

impl FromStr for Requirement {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Requirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Requirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Requirement::parse(&s).map_err(de::Error::custom)
    }
}

//! Serializable resource handles.

use crate::error::ResourceError;
use crate::template::Variables;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The minimal identity of a resource: its type key and variables.
///
/// A handle can be persisted or sent elsewhere and turned back into an
/// equal resource with [`crate::Context::from_handle`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle {
    /// Resource type key.
    pub key: String,
    /// Canonical variables.
    pub variables: Variables,
}

impl ResourceHandle {
    /// Create a handle.
    pub fn new(key: impl Into<String>, variables: Variables) -> Self {
        Self {
            key: key.into(),
            variables,
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String, ResourceError> {
        serde_json::to_string(self).map_err(|e| ResourceError::InvalidHandle {
            message: e.to_string(),
        })
    }

    /// Decode from JSON.
    pub fn from_json(s: &str) -> Result<Self, ResourceError> {
        serde_json::from_str(s).map_err(|e| ResourceError::InvalidHandle {
            message: e.to_string(),
        })
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        let mut sep = "{";
        for (name, value) in &self.variables {
            write!(f, "{}{}={}", sep, name, value)?;
            sep = ", ";
        }
        if !self.variables.is_empty() {
            write!(f, "}}")?;
        }
        Ok(())
    }
}

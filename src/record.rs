//! Response record: the per-subject value store
//!
//! A record maps variable identifiers to values. Collected answers arrive
//! with the record; derived values are appended by the engine. Mutation is
//! append/overwrite only: the engine never alters a collected value, it only
//! adds new keys or rewrites keys it derived itself within the same run.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One survey subject's responses, collected and derived.
///
/// Serializes as `{"values": {...}}`, the shape response collaborators
/// exchange. Key order is preserved so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Variable identifier -> value
    pub values: Map<String, Value>,
}

impl ResponseRecord {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a variable's value. Absent variables return `None`; the caller
    /// decides whether absence is deferrable or terminal.
    pub fn get(&self, variable: &str) -> Option<&Value> {
        self.values.get(variable)
    }

    /// Returns true if the variable is present (even if null).
    pub fn contains(&self, variable: &str) -> bool {
        self.values.contains_key(variable)
    }

    /// Writes a variable's value, appending or overwriting.
    pub fn insert(&mut self, variable: impl Into<String>, value: Value) {
        self.values.insert(variable.into(), value);
    }

    /// Number of variables in the record.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record holds no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, Value)> for ResponseRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Sentinel key for validation errors not attributable to a single field.
pub const BASE: &str = "base";

/// Outcome of one provider lookup, normalized by the lookup client.
///
/// The three variants are mutually exclusive by construction: a lookup
/// either yields extracted fields, a single normalized error message, or
/// nothing usable at all. "No data" is deliberately distinct from an
/// explicit provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Extracted enrichment fields, in request order.
    ///
    /// The client only produces this with at least one field; the variant
    /// itself permits an empty set so callers can distinguish "provider
    /// answered without the requested fields" from "provider unreachable".
    Fields(Vec<(String, String)>),
    /// A single normalized provider error message.
    Error(String),
    /// Nothing usable was fetched: transport failure, unparsable success
    /// body, or an empty extraction with no error markers.
    NoData,
}

impl LookupOutcome {
    /// Value of an extracted field, if it is present and non-blank.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Fields(fields) => fields
                .iter()
                .find(|(key, value)| key == name && !value.trim().is_empty())
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData)
    }
}

/// Ordered set of validation errors keyed by field name.
///
/// Keys appear in insertion order and each key holds its messages in
/// insertion order, so the JSON rendering is deterministic. Non-field
/// errors go under the [`BASE`] sentinel key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message under a key, keeping first-insertion key order.
    pub fn add(&mut self, key: &str, message: impl Into<String>) {
        let message = message.into();
        if let Some((_, messages)) = self.entries.iter_mut().find(|(k, _)| k == key) {
            messages.push(message);
        } else {
            self.entries.push((key.to_string(), vec![message]));
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Messages recorded under a key, in insertion order.
    pub fn messages(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, messages)| messages.as_slice())
    }

    /// Total number of messages across all keys.
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, messages)| messages.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(key, messages)| (key.as_str(), messages.as_slice()))
    }
}

// Serialized as a JSON object in insertion order, independent of any map
// ordering feature flags.
impl Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, messages) in &self.entries {
            map.serialize_entry(key, messages)?;
        }
        map.end()
    }
}

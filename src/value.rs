//! Stored value shapes: plain scalar or JSON property bag.
//!
//! DESIGN
//! ======
//! A raw stored string is sniffed exactly once by [`StoreValue::parse`]. It is
//! a bag only when it parses as JSON *and* the result is an object; anything
//! else, including malformed JSON, arrays and JSON strings, is a scalar.
//! Parsing never fails.
//!
//! TRADE-OFFS
//! ==========
//! Bag values are kept as `serde_json::Value` rather than `String` so a merge
//! never rewrites sibling properties some other writer stored as numbers or
//! nested objects. Key order survives re-serialization (`preserve_order`).

use serde_json::{Map, Value};

use crate::error::StoreError;

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;

/// A raw stored string, classified.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    /// Anything that is not a JSON object.
    Scalar(String),
    /// A JSON object mapping property names to values.
    Bag(Map<String, Value>),
}

impl StoreValue {
    /// Classify a raw stored string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self::Bag(map),
            _ => Self::Scalar(raw.to_owned()),
        }
    }

    /// The bag, or `None` for a scalar.
    #[must_use]
    pub fn as_bag(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Bag(map) => Some(map),
            Self::Scalar(_) => None,
        }
    }

    /// Take the bag, or an empty one when this is a scalar.
    #[must_use]
    pub fn into_bag(self) -> Map<String, Value> {
        match self {
            Self::Bag(map) => map,
            Self::Scalar(_) => Map::new(),
        }
    }

    /// Look up `property` in a bag and render it as text.
    ///
    /// Returns `None` for a scalar, a missing property, or a `null` value.
    #[must_use]
    pub fn property(&self, property: &str) -> Option<String> {
        self.as_bag()?.get(property).and_then(stringify)
    }
}

/// Render a bag value as element text.
///
/// Strings are returned verbatim, other scalars in their JSON text form, and
/// arrays/objects as compact JSON. `null` has no text form.
#[must_use]
pub fn stringify(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Set `property` to `value` inside the bag stored as `existing`.
///
/// A non-bag `existing` is discarded and replaced by a fresh bag holding only
/// the new property.
///
/// # Errors
///
/// Returns `Encode` if the merged bag cannot be serialized.
pub fn merge_property(existing: &str, property: &str, value: &str) -> Result<String, StoreError> {
    let mut bag = StoreValue::parse(existing).into_bag();
    bag.insert(property.to_owned(), Value::String(value.to_owned()));
    Ok(serde_json::to_string(&bag)?)
}

//! Closed value type for the free-form `context` and `metadata` maps.
//!
//! Incidents and meaning entries carry descriptive key/value data whose
//! shape is chosen by the reporting system. Rather than an open dynamic
//! value, the engine restricts these maps to a closed set of variants so
//! that serialization stays deterministic: keys are kept in a [`BTreeMap`]
//! and every value is one of the variants below.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Ordered string-keyed map of [`Value`]s.
pub type Mapping = BTreeMap<String, Value>;

/// A single context or metadata value.
///
/// Serialized untagged, so a mapping round-trips through JSON as an
/// ordinary object. Variant order matters for deserialization: signed
/// integers are tried first, then unsigned ones above `i64::MAX`, then
/// floats, so whole numbers never lose precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export, export_to = "bindings/")]
pub enum Value {
    /// A boolean flag.
    Bool(bool),
    /// A signed integer.
    Integer(i64),
    /// An unsigned integer too large for [`Value::Integer`].
    Unsigned(u64),
    /// A floating point number.
    Float(f64),
    /// Free text.
    Text(String),
    /// An ordered list of values.
    List(Vec<Value>),
    /// A nested mapping.
    Map(Mapping),
}

impl Value {
    /// Return the text content if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Return the items if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Return the nested mapping if this is a [`Value::Map`].
    pub const fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(Self::Unsigned(v), Self::Integer)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self {
        Self::Map(v)
    }
}

/// Build a [`Value::List`] of text items.
pub fn text_list<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::List(items.into_iter().map(|s| Value::Text(s.into())).collect())
}

//! Flat metadata model for vector entries.
//!
//! A managed similarity index only accepts flat mappings of strings, numbers
//! and string lists alongside each vector. [`MetadataValue`] is the closed set
//! of value types; [`Metadata`] is one entry's mapping.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single metadata value as stored by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Number(f64),
    List(Vec<String>),
}

/// Flat metadata mapping attached to one vector entry.
///
/// BTreeMap keeps serialized output deterministic.
pub type Metadata = BTreeMap<String, MetadataValue>;

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MetadataValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            // Some stores hand numeric metadata back as floats.
            MetadataValue::Number(n) if n.fract() == 0.0 => Some(*n as i64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            MetadataValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        MetadataValue::Integer(i)
    }
}

impl From<Vec<String>> for MetadataValue {
    fn from(items: Vec<String>) -> Self {
        MetadataValue::List(items)
    }
}

/// Typed accessors over a [`Metadata`] mapping.
///
/// Every getter fails loudly: a missing or ill-typed field on a returned
/// match means the index holds records from an incompatible schema, which
/// must surface rather than corrupt downstream consumers.
pub trait MetadataExt {
    fn require_text(&self, field: &str) -> Result<String>;
    fn require_integer(&self, field: &str) -> Result<i64>;
    fn require_list(&self, field: &str) -> Result<Vec<String>>;
}

impl MetadataExt for Metadata {
    fn require_text(&self, field: &str) -> Result<String> {
        let value = self
            .get(field)
            .ok_or_else(|| Error::MissingField(field.to_string()))?;
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| Error::FieldType { field: field.to_string(), expected: "string" })
    }

    fn require_integer(&self, field: &str) -> Result<i64> {
        let value = self
            .get(field)
            .ok_or_else(|| Error::MissingField(field.to_string()))?;
        value
            .as_integer()
            .ok_or_else(|| Error::FieldType { field: field.to_string(), expected: "integer" })
    }

    fn require_list(&self, field: &str) -> Result<Vec<String>> {
        let value = self
            .get(field)
            .ok_or_else(|| Error::MissingField(field.to_string()))?;
        value
            .as_list()
            .map(<[String]>::to_vec)
            .ok_or_else(|| Error::FieldType { field: field.to_string(), expected: "string list" })
    }
}

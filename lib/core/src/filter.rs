//! Metadata filter predicates and the filter compiler.
//!
//! Raw query parameters arrive loosely typed (comma-separated lists, min/max
//! strings). The compiler turns them into a [`FilterCondition`] tree per
//! metadata field, which serializes to the index's operator language
//! (`$eq`, `$in`, `$gte`/`$lte`, `$and`).
//!
//! Compilation is fail-soft: a malformed numeric bound is dropped and the
//! rest of the filter proceeds. An absent filter always means "no
//! constraint" - the compiler never emits a predicate that matches nothing.

use crate::metadata::MetadataValue;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A filter predicate applied to exactly one metadata field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    Eq(MetadataValue),
    In(Vec<MetadataValue>),
    Range {
        gte: Option<MetadataValue>,
        lte: Option<MetadataValue>,
    },
    All(Vec<FilterCondition>),
}

impl Serialize for FilterCondition {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FilterCondition::Eq(value) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$eq", value)?;
                map.end()
            }
            FilterCondition::In(values) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$in", values)?;
                map.end()
            }
            FilterCondition::Range { gte, lte } => {
                let len = gte.is_some() as usize + lte.is_some() as usize;
                let mut map = serializer.serialize_map(Some(len))?;
                if let Some(bound) = gte {
                    map.serialize_entry("$gte", bound)?;
                }
                if let Some(bound) = lte {
                    map.serialize_entry("$lte", bound)?;
                }
                map.end()
            }
            FilterCondition::All(conditions) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("$and", conditions)?;
                map.end()
            }
        }
    }
}

/// Compiled predicates for one request.
///
/// `index_filter` is keyed by metadata field names and goes upstream;
/// `applied` is keyed by the caller-facing parameter names and is echoed in
/// the response. Fields with no predicate are omitted from both.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledFilters {
    pub index_filter: BTreeMap<String, FilterCondition>,
    pub applied: BTreeMap<String, FilterCondition>,
}

impl CompiledFilters {
    pub fn is_empty(&self) -> bool {
        self.index_filter.is_empty()
    }

    fn add(&mut self, index_field: &str, applied_name: &str, condition: Option<FilterCondition>) {
        if let Some(condition) = condition {
            self.index_filter.insert(index_field.to_string(), condition.clone());
            self.applied.insert(applied_name.to_string(), condition);
        }
    }
}

/// Raw filter parameters for company search.
///
/// Revenue bounds stay opaque currency strings (e.g. `"$100M"`): the store
/// compares them lexically. That is the contract of the underlying index for
/// string fields, not something the compiler papers over.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyFilterParams {
    pub industry_list: Option<String>,
    pub location_list: Option<String>,
    pub revenue_min: Option<String>,
    pub revenue_max: Option<String>,
    pub employees_min: Option<String>,
    pub employees_max: Option<String>,
}

impl CompanyFilterParams {
    /// Compile into per-field predicates. Never fails; malformed numeric
    /// bounds are dropped.
    pub fn compile(&self) -> CompiledFilters {
        let mut filters = CompiledFilters::default();
        filters.add("industry", "industry", list_condition(self.industry_list.as_deref()));
        filters.add("headquarters", "location", list_condition(self.location_list.as_deref()));
        filters.add(
            "revenue",
            "revenue",
            range_condition(
                self.revenue_min.as_deref().map(text_bound),
                self.revenue_max.as_deref().map(text_bound),
            ),
        );
        filters.add(
            "employees",
            "employees",
            range_condition(
                integer_bound(self.employees_min.as_deref()),
                integer_bound(self.employees_max.as_deref()),
            ),
        );
        filters
    }
}

/// Raw filter parameters for property search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyFilterParams {
    pub location_list: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub bedrooms_min: Option<String>,
    pub bedrooms_max: Option<String>,
}

impl PropertyFilterParams {
    pub fn compile(&self) -> CompiledFilters {
        let mut filters = CompiledFilters::default();
        filters.add("location", "location", list_condition(self.location_list.as_deref()));
        filters.add(
            "price_usd",
            "price",
            range_condition(
                integer_bound(self.price_min.as_deref()),
                integer_bound(self.price_max.as_deref()),
            ),
        );
        filters.add(
            "bedrooms",
            "bedrooms",
            range_condition(
                integer_bound(self.bedrooms_min.as_deref()),
                integer_bound(self.bedrooms_max.as_deref()),
            ),
        );
        filters
    }
}

/// Split a comma-separated list into an `$in` predicate.
///
/// Whitespace-only tokens are dropped and order is preserved. An empty
/// token set produces no predicate at all: an empty `$in` would match
/// nothing, which is never what an absent filter means.
fn list_condition(raw: Option<&str>) -> Option<FilterCondition> {
    let raw = raw?;
    let values: Vec<MetadataValue> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(MetadataValue::from)
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(FilterCondition::In(values))
    }
}

/// Combine optional bounds into a range predicate.
///
/// One bound yields a single `Range`; both yield a conjunction of the two,
/// so each serialized operator object carries exactly the bound that was
/// supplied.
fn range_condition(
    gte: Option<MetadataValue>,
    lte: Option<MetadataValue>,
) -> Option<FilterCondition> {
    match (gte, lte) {
        (None, None) => None,
        (gte @ Some(_), None) => Some(FilterCondition::Range { gte, lte: None }),
        (None, lte @ Some(_)) => Some(FilterCondition::Range { gte: None, lte }),
        (gte @ Some(_), lte @ Some(_)) => Some(FilterCondition::All(vec![
            FilterCondition::Range { gte, lte: None },
            FilterCondition::Range { gte: None, lte },
        ])),
    }
}

fn text_bound(raw: &str) -> MetadataValue {
    MetadataValue::Text(raw.to_string())
}

/// Parse an integer bound, dropping it on failure.
fn integer_bound(raw: Option<&str>) -> Option<MetadataValue> {
    raw?.trim().parse::<i64>().ok().map(MetadataValue::Integer)
}

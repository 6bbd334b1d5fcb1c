//! Search domains and the structured result schema.
//!
//! A [`SearchDomain`] binds one record type to everything the engine needs
//! to serve it: the response key its items appear under, its filter
//! parameter type, how a match's metadata becomes a record, and how a result
//! set is summarized.

use ragx_core::{
    Company, CompanyFilterParams, CompiledFilters, FilterCondition, Metadata, Property,
    PropertyFilterParams, Result,
};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::summary;

/// A record type the engine can search over.
pub trait SearchDomain: Sized + Serialize + Send + Sync {
    /// Raw filter parameters for this domain.
    type Filters: Default + Send + Sync;

    /// Response key the item list is serialized under ("companies" /
    /// "properties"); also the noun used in summaries.
    const ITEMS_KEY: &'static str;

    fn from_metadata(metadata: &Metadata) -> Result<Self>;

    fn compile_filters(filters: &Self::Filters) -> CompiledFilters;

    fn summarize(
        query: &str,
        items: &[Ranked<Self>],
        applied: &BTreeMap<String, FilterCondition>,
    ) -> String;
}

/// One shaped result: rank and rounded score wrapped around the domain
/// record, with the record's fields flattened into the same object.
#[derive(Debug, Clone, Serialize)]
pub struct Ranked<R> {
    /// 1-based, assigned by the engine in upstream order.
    pub rank: usize,
    /// Cosine score rounded to 3 decimals.
    pub score: f64,
    #[serde(flatten)]
    pub record: R,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// One retrieval request.
#[derive(Debug, Clone)]
pub struct SearchRequest<F> {
    pub query: String,
    pub top_k: usize,
    pub filters: F,
    pub with_reasoning: bool,
}

impl<F: Default> SearchRequest<F> {
    pub fn new(query: impl Into<String>, top_k: usize) -> Self {
        Self { query: query.into(), top_k, filters: F::default(), with_reasoning: false }
    }
}

/// The full structured response for one request.
///
/// Always well-formed: an empty result set (`total_found = 0`, empty items,
/// no `error`) is a successful response, distinct from the error-annotated
/// shape produced when embedding or the index failed.
#[derive(Debug, Clone)]
pub struct SearchResults<D: SearchDomain> {
    pub query: String,
    pub top_k: usize,
    pub filters_applied: BTreeMap<String, FilterCondition>,
    pub items: Vec<Ranked<D>>,
    pub total_found: usize,
    pub search_summary: String,
    pub error: Option<String>,
}

impl<D: SearchDomain> Serialize for SearchResults<D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let len = 6 + usize::from(self.error.is_some());
        let mut state = serializer.serialize_struct("SearchResults", len)?;
        state.serialize_field("query", &self.query)?;
        state.serialize_field("top_k", &self.top_k)?;
        state.serialize_field("filters_applied", &self.filters_applied)?;
        state.serialize_field(D::ITEMS_KEY, &self.items)?;
        state.serialize_field("total_found", &self.total_found)?;
        state.serialize_field("search_summary", &self.search_summary)?;
        match &self.error {
            Some(error) => state.serialize_field("error", error)?,
            None => state.skip_field("error")?,
        }
        state.end()
    }
}

impl SearchDomain for Company {
    type Filters = CompanyFilterParams;

    const ITEMS_KEY: &'static str = "companies";

    fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Company::from_metadata(metadata)
    }

    fn compile_filters(filters: &Self::Filters) -> CompiledFilters {
        filters.compile()
    }

    fn summarize(
        query: &str,
        items: &[Ranked<Self>],
        applied: &BTreeMap<String, FilterCondition>,
    ) -> String {
        summary::company_summary(query, items, applied)
    }
}

impl SearchDomain for Property {
    type Filters = PropertyFilterParams;

    const ITEMS_KEY: &'static str = "properties";

    fn from_metadata(metadata: &Metadata) -> Result<Self> {
        Property::from_metadata(metadata)
    }

    fn compile_filters(filters: &Self::Filters) -> CompiledFilters {
        filters.compile()
    }

    fn summarize(
        query: &str,
        items: &[Ranked<Self>],
        applied: &BTreeMap<String, FilterCondition>,
    ) -> String {
        summary::property_summary(query, items, applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_property() -> Property {
        Property {
            property_name: "Penthouse #23".to_string(),
            location: "Palm Springs, CA".to_string(),
            bedrooms: 5,
            view: "lake view".to_string(),
            price_usd: 2_206_633,
            size_sqft: 2349,
            description: "Original description".to_string(),
            property_type: "Penthouse".to_string(),
        }
    }

    #[test]
    fn test_results_serialize_under_domain_key() {
        let results: SearchResults<Property> = SearchResults {
            query: "luxury penthouse".to_string(),
            top_k: 5,
            filters_applied: BTreeMap::new(),
            items: vec![Ranked { rank: 1, score: 0.85, record: sample_property(), reasoning: None }],
            total_found: 1,
            search_summary: "Found 1 properties".to_string(),
            error: None,
        };
        let json = serde_json::to_value(&results).unwrap();
        assert!(json.get("properties").is_some());
        assert!(json.get("companies").is_none());
        assert!(json.get("error").is_none());
        // Record fields are flattened next to rank and score.
        let first = &json["properties"][0];
        assert_eq!(first["rank"], 1);
        assert_eq!(first["score"], 0.85);
        assert_eq!(first["property_name"], "Penthouse #23");
        assert!(first.get("reasoning").is_none());
    }

    #[test]
    fn test_error_field_appears_when_set() {
        let results: SearchResults<Property> = SearchResults {
            query: "q".to_string(),
            top_k: 5,
            filters_applied: BTreeMap::new(),
            items: vec![],
            total_found: 0,
            search_summary: "Unable to process query".to_string(),
            error: Some("Failed to generate query embedding".to_string()),
        };
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json["error"], "Failed to generate query embedding");
        assert_eq!(json["total_found"], 0);
        assert_eq!(json["properties"], serde_json::json!([]));
    }
}

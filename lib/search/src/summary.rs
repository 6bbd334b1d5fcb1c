//! Natural-language digests of a result set.
//!
//! One paragraph per response: hit count, a lossy rendering of the applied
//! filters (first `$in` value only - a display summary, not a filter echo),
//! value ranges and the leading distinct categorical values.

use crate::domain::Ranked;
use ragx_core::{format_thousands, Company, FilterCondition, MetadataValue, Property};
use std::collections::BTreeMap;

/// Up to this many distinct categorical values are listed before "...".
const DISTINCT_LIMIT: usize = 3;

pub fn company_summary(
    query: &str,
    items: &[Ranked<Company>],
    applied: &BTreeMap<String, FilterCondition>,
) -> String {
    if items.is_empty() {
        return format!("No companies found matching '{query}'");
    }

    let mut parts = vec![format!("Found {} companies matching '{query}'", items.len())];

    let mut filter_desc = Vec::new();
    if let Some(value) = applied.get("industry").and_then(first_in_value) {
        filter_desc.push(format!("in {value}"));
    }
    if let Some(value) = applied.get("location").and_then(first_in_value) {
        filter_desc.push(format!("in {value}"));
    }
    if let Some(value) = applied.get("revenue").and_then(gte_value) {
        filter_desc.push(format!("revenue {}+", render(value)));
    }
    if let Some(value) = applied.get("employees").and_then(gte_value) {
        filter_desc.push(format!("{}+ employees", render(value)));
    }
    if !filter_desc.is_empty() {
        parts.push(format!("with filters: {}", filter_desc.join(", ")));
    }

    let industries = distinct(items.iter().map(|item| item.record.industry.as_str()));
    let locations = distinct(items.iter().map(|item| item.record.headquarters.as_str()));
    // Revenue strings compare lexically, matching the store's ordering.
    let revenue_min = items.iter().map(|item| item.record.revenue.as_str()).min().unwrap_or("");
    let revenue_max = items.iter().map(|item| item.record.revenue.as_str()).max().unwrap_or("");

    parts.push(format!("Industries: {}", truncated(&industries)));
    parts.push(format!("Locations: {}", truncated(&locations)));
    parts.push(format!("Revenue range: {revenue_min} - {revenue_max}"));

    format!("{}.", parts.join(". "))
}

pub fn property_summary(
    query: &str,
    items: &[Ranked<Property>],
    applied: &BTreeMap<String, FilterCondition>,
) -> String {
    if items.is_empty() {
        return format!("No properties found matching '{query}'");
    }

    let mut parts = vec![format!("Found {} properties matching '{query}'", items.len())];

    let mut filter_desc = Vec::new();
    if let Some(condition) = applied.get("price") {
        if let Some(value) = lte_value(condition).and_then(MetadataValue::as_integer) {
            filter_desc.push(format!("under ${}", format_thousands(value)));
        } else if let Some(value) = gte_value(condition).and_then(MetadataValue::as_integer) {
            filter_desc.push(format!("over ${}", format_thousands(value)));
        }
    }
    if let Some(value) = applied.get("bedrooms").and_then(gte_value) {
        filter_desc.push(format!("{}+ bedrooms", render(value)));
    }
    if let Some(value) = applied.get("location").and_then(first_in_value) {
        filter_desc.push(format!("in {value}"));
    }
    if !filter_desc.is_empty() {
        parts.push(format!("with filters: {}", filter_desc.join(", ")));
    }

    let price_min = items.iter().map(|item| item.record.price_usd).min().unwrap_or(0);
    let price_max = items.iter().map(|item| item.record.price_usd).max().unwrap_or(0);
    let locations = distinct(items.iter().map(|item| item.record.location.as_str()));
    let types = distinct(items.iter().map(|item| item.record.property_type.as_str()));

    parts.push(format!(
        "Price range: ${} - ${}",
        format_thousands(price_min),
        format_thousands(price_max)
    ));
    parts.push(format!("Locations: {}", truncated(&locations)));
    parts.push(format!("Types: {}", types.join(", ")));

    format!("{}.", parts.join(". "))
}

/// First value of an `$in` predicate, rendered. The rest are dropped on
/// purpose: the summary names the filter, it does not echo it.
fn first_in_value(condition: &FilterCondition) -> Option<String> {
    match condition {
        FilterCondition::In(values) => values.first().map(render),
        _ => None,
    }
}

/// The bound of a plain `$gte` predicate. A conjunction of both bounds is
/// not unpacked here - like the original summary, a bounded-both-ways range
/// simply goes undescribed.
fn gte_value(condition: &FilterCondition) -> Option<&MetadataValue> {
    match condition {
        FilterCondition::Range { gte: Some(value), .. } => Some(value),
        _ => None,
    }
}

fn lte_value(condition: &FilterCondition) -> Option<&MetadataValue> {
    match condition {
        FilterCondition::Range { lte: Some(value), .. } => Some(value),
        _ => None,
    }
}

fn render(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Text(text) => text.clone(),
        MetadataValue::Integer(i) => i.to_string(),
        MetadataValue::Number(n) => n.to_string(),
        MetadataValue::List(items) => items.join(", "),
    }
}

/// Distinct values in first-observed order.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.iter().any(|existing: &String| existing == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

/// First three values joined, with an ellipsis marker when more exist.
fn truncated(values: &[String]) -> String {
    let shown = values.iter().take(DISTINCT_LIMIT).cloned().collect::<Vec<_>>().join(", ");
    if values.len() > DISTINCT_LIMIT {
        format!("{shown}...")
    } else {
        shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company_item(rank: usize, industry: &str, hq: &str, revenue: &str) -> Ranked<Company> {
        Ranked {
            rank,
            score: 0.8,
            record: Company {
                company_name: format!("Company {rank}"),
                industry: industry.to_string(),
                headquarters: hq.to_string(),
                revenue: revenue.to_string(),
                employees: 100,
                business_model: "B2B".to_string(),
                strategic_priorities: vec![],
                ideal_op_industry: "Software".to_string(),
                ideal_op_functional: vec![],
                ideal_op_leadership: vec![],
                description: None,
            },
            reasoning: None,
        }
    }

    fn property_item(rank: usize, location: &str, kind: &str, price: i64) -> Ranked<Property> {
        Ranked {
            rank,
            score: 0.7,
            record: Property {
                property_name: format!("{kind} #{rank}"),
                location: location.to_string(),
                bedrooms: 3,
                view: "city view".to_string(),
                price_usd: price,
                size_sqft: 1500,
                description: "desc".to_string(),
                property_type: kind.to_string(),
            },
            reasoning: None,
        }
    }

    #[test]
    fn test_empty_company_summary_exact_string() {
        let summary = company_summary("zzznomatch", &[], &BTreeMap::new());
        assert_eq!(summary, "No companies found matching 'zzznomatch'");
    }

    #[test]
    fn test_empty_property_summary_exact_string() {
        let summary = property_summary("zzznomatch", &[], &BTreeMap::new());
        assert_eq!(summary, "No properties found matching 'zzznomatch'");
    }

    #[test]
    fn test_company_summary_with_filters() {
        let items = vec![
            company_item(1, "EdTech", "Austin, TX", "$100M"),
            company_item(2, "SaaS", "Boston, MA", "$250M"),
        ];
        let mut applied = BTreeMap::new();
        applied.insert(
            "industry".to_string(),
            FilterCondition::In(vec!["EdTech".into(), "SaaS".into()]),
        );
        applied.insert(
            "employees".to_string(),
            FilterCondition::Range { gte: Some(MetadataValue::Integer(50)), lte: None },
        );
        let summary = company_summary("analytics platforms", &items, &applied);
        assert!(summary.starts_with("Found 2 companies matching 'analytics platforms'"));
        assert!(summary.contains("with filters: in EdTech, 50+ employees"));
        assert!(summary.contains("Industries: EdTech, SaaS"));
        assert!(summary.contains("Revenue range: $100M - $250M"));
        assert!(summary.ends_with('.'));
    }

    #[test]
    fn test_property_summary_price_filter_and_ranges() {
        let items = vec![
            property_item(1, "Palm Springs, CA", "Penthouse", 2_206_633),
            property_item(2, "Malibu, CA", "Villa", 980_000),
        ];
        let mut applied = BTreeMap::new();
        applied.insert(
            "price".to_string(),
            FilterCondition::Range { gte: None, lte: Some(MetadataValue::Integer(3_000_000)) },
        );
        let summary = property_summary("luxury homes", &items, &applied);
        assert!(summary.contains("with filters: under $3,000,000"));
        assert!(summary.contains("Price range: $980,000 - $2,206,633"));
        assert!(summary.contains("Types: Penthouse, Villa"));
    }

    #[test]
    fn test_distinct_values_truncate_with_ellipsis() {
        let items = vec![
            company_item(1, "A", "HQ1", "$1M"),
            company_item(2, "B", "HQ2", "$2M"),
            company_item(3, "C", "HQ3", "$3M"),
            company_item(4, "D", "HQ4", "$4M"),
            company_item(5, "A", "HQ1", "$5M"),
        ];
        let summary = company_summary("q", &items, &BTreeMap::new());
        // First three distinct industries in observed order, then the marker.
        assert!(summary.contains("Industries: A, B, C..."));
    }

    #[test]
    fn test_conjunction_range_goes_undescribed() {
        let items = vec![company_item(1, "A", "HQ", "$1M")];
        let mut applied = BTreeMap::new();
        applied.insert(
            "revenue".to_string(),
            FilterCondition::All(vec![
                FilterCondition::Range { gte: Some("$100M".into()), lte: None },
                FilterCondition::Range { gte: None, lte: Some("$500M".into()) },
            ]),
        );
        let summary = company_summary("q", &items, &applied);
        assert!(!summary.contains("with filters"));
    }
}

//! Per-result justification strategies.
//!
//! Two interchangeable implementations of [`ReasoningStrategy`]:
//!
//! - [`GroundedLlm`] asks a chat generator for an explanation, constrained
//!   to the record's own fields ("Not found" over inference);
//! - [`RuleBased`] matches query keywords against property attributes in a
//!   fixed clause order, fully deterministic and offline.
//!
//! A strategy failure never aborts a request; the engine degrades that one
//! record to [`fallback_reasoning`].

use async_trait::async_trait;
use ragx_core::{ChatGenerator, Metadata, MetadataExt, Result};
use std::sync::Arc;

/// Produces a justification string for one (query, record, score) triple.
#[async_trait]
pub trait ReasoningStrategy: Send + Sync {
    async fn explain(&self, query: &str, metadata: &Metadata, score: f64) -> Result<String>;
}

/// One-line explanation used whenever a strategy fails or matches nothing.
pub fn fallback_reasoning(score: f64) -> String {
    format!("Selected based on semantic similarity (score: {score:.3})")
}

const SYSTEM_PROMPT: &str = "You are an expert business analyst. Your task is to explain why a specific company was selected as a match for a search query.

IMPORTANT: Only use the provided company information and query. If something is not explicitly mentioned in the provided documents, say \"Not found\" rather than making assumptions.

Analyze the company's characteristics against the search query and provide a concise, factual explanation (400-600 tokens) of why this company is a good match. Focus on:
1. Industry alignment
2. Location relevance (if applicable)
3. Business model fit
4. Strategic priorities alignment
5. Size/revenue characteristics
6. Semantic similarity score interpretation

Be specific and reference actual data from the company information provided.";

/// Grounded-LLM strategy for company results.
///
/// The prompt carries only the record's fields and the query text, so the
/// generated explanation cannot draw on anything that is not in the index.
pub struct GroundedLlm {
    chat: Arc<dyn ChatGenerator>,
}

impl GroundedLlm {
    pub fn new(chat: Arc<dyn ChatGenerator>) -> Self {
        Self { chat }
    }

    fn company_info(metadata: &Metadata, score: f64) -> Result<String> {
        Ok(format!(
            "Company Information:\n\
             - Name: {}\n\
             - Industry: {}\n\
             - Headquarters: {}\n\
             - Revenue: {}\n\
             - Employees: {}\n\
             - Business Model: {}\n\
             - Strategic Priorities: {}\n\
             - Ideal Operating Partner Industry: {}\n\
             - Ideal Operating Partner Functional Strengths: {}\n\
             - Ideal Operating Partner Leadership Qualities: {}\n\
             - Semantic Similarity Score: {score:.3}",
            metadata.require_text("company_name")?,
            metadata.require_text("industry")?,
            metadata.require_text("headquarters")?,
            metadata.require_text("revenue")?,
            metadata.require_integer("employees")?,
            metadata.require_text("business_model")?,
            metadata.require_list("strategic_priorities")?.join(", "),
            metadata.require_text("ideal_op_industry")?,
            metadata.require_list("ideal_op_functional")?.join(", "),
            metadata.require_list("ideal_op_leadership")?.join(", "),
        ))
    }
}

#[async_trait]
impl ReasoningStrategy for GroundedLlm {
    async fn explain(&self, query: &str, metadata: &Metadata, score: f64) -> Result<String> {
        let company_info = Self::company_info(metadata, score)?;
        let user_prompt = format!(
            "Search Query: \"{query}\"\n\n{company_info}\n\n\
             Explain why this company was selected as a match for the search query. \
             Use only the information provided above."
        );
        self.chat.complete(SYSTEM_PROMPT, &user_prompt).await
    }
}

/// Deterministic keyword-matching strategy for property results.
///
/// Clause evaluation order is fixed (type, view, location, bedrooms, price,
/// score bucket) so identical inputs always yield identical text.
#[derive(Debug, Clone, Default)]
pub struct RuleBased;

fn query_mentions(query: &str, triggers: &[&str]) -> bool {
    triggers.iter().any(|word| query.contains(word))
}

fn contains_any(value: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| value.contains(needle))
}

#[async_trait]
impl ReasoningStrategy for RuleBased {
    async fn explain(&self, query: &str, metadata: &Metadata, score: f64) -> Result<String> {
        let query_lower = query.to_lowercase();
        let property_type = metadata.require_text("property_type")?;
        let location = metadata.require_text("location")?;
        let bedrooms = metadata.require_integer("bedrooms")?;
        let view = metadata.require_text("view")?;
        let price = metadata.require_integer("price_usd")?;

        let type_lower = property_type.to_lowercase();
        let view_lower = view.to_lowercase();
        let location_lower = location.to_lowercase();

        let mut reasons: Vec<String> = Vec::new();

        // Property type
        if query_mentions(&query_lower, &["penthouse", "luxury", "high-end"])
            && matches!(type_lower.as_str(), "penthouse" | "villa")
        {
            reasons.push(format!("matches luxury property type ({property_type})"));
        }
        if query_mentions(&query_lower, &["house", "home", "family"])
            && matches!(type_lower.as_str(), "house" | "townhouse")
        {
            reasons.push(format!("matches family home type ({property_type})"));
        }
        if query_mentions(&query_lower, &["apartment", "condo", "studio"])
            && matches!(type_lower.as_str(), "apartment" | "condo" | "studio")
        {
            reasons.push(format!("matches residential type ({property_type})"));
        }

        // View
        if query_mentions(&query_lower, &["ocean", "water", "beach"])
            && contains_any(&view_lower, &["ocean", "lake", "river"])
        {
            reasons.push(format!("has water view ({view})"));
        }
        if query_mentions(&query_lower, &["mountain", "forest", "nature"])
            && contains_any(&view_lower, &["mountain", "forest", "garden"])
        {
            reasons.push(format!("has nature view ({view})"));
        }
        if query_mentions(&query_lower, &["city", "urban", "skyline"])
            && contains_any(&view_lower, &["city", "skyline"])
        {
            reasons.push(format!("has urban view ({view})"));
        }

        // Location
        if query_mentions(&query_lower, &["california", "ca", "cali"])
            && contains_any(&location_lower, &["california", ", ca"])
        {
            reasons.push(format!("located in California ({location})"));
        }
        if query_mentions(&query_lower, &["new york", "ny", "brooklyn", "manhattan"])
            && contains_any(&location_lower, &["new york", ", ny"])
        {
            reasons.push(format!("located in New York area ({location})"));
        }

        // Bedroom thresholds parsed from the query; first matching tier wins.
        if query_mentions(&query_lower, &["bedroom", "bedrooms", "br"]) {
            if query_mentions(&query_lower, &["3", "three"]) {
                if bedrooms >= 3 {
                    reasons.push(format!("has {bedrooms} bedrooms (meets 3+ requirement)"));
                }
            } else if query_mentions(&query_lower, &["2", "two"]) {
                if bedrooms >= 2 {
                    reasons.push(format!("has {bedrooms} bedrooms (meets 2+ requirement)"));
                }
            } else if query_mentions(&query_lower, &["4", "four"]) && bedrooms >= 4 {
                reasons.push(format!("has {bedrooms} bedrooms (meets 4+ requirement)"));
            }
        }

        // Price tiers
        if query_mentions(&query_lower, &["affordable", "budget", "cheap", "low price"])
            && price <= 1_000_000
        {
            reasons.push(format!("affordable price (${})", ragx_core::format_thousands(price)));
        }
        if query_mentions(&query_lower, &["luxury", "expensive", "high-end", "premium"])
            && price >= 2_000_000
        {
            reasons.push(format!("luxury price point (${})", ragx_core::format_thousands(price)));
        }

        // Mandatory score bucket closes the clause list.
        if score >= 0.6 {
            reasons.push("high semantic similarity to query".to_string());
        } else if score >= 0.5 {
            reasons.push("good semantic similarity to query".to_string());
        } else {
            reasons.push("moderate semantic similarity to query".to_string());
        }

        if reasons.is_empty() {
            Ok(fallback_reasoning(score))
        } else {
            Ok(format!("Selected because: {}", reasons.join(", ")))
        }
    }
}

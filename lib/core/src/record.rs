//! Domain records: companies and real-estate properties.
//!
//! Each record has a fixed attribute schema. At ingestion a record is turned
//! into a prose description (the embedding input) and a flat [`Metadata`]
//! mapping; at query time a returned match's metadata is read back into the
//! record type, failing loudly on any missing or ill-typed field.

use crate::error::Result;
use crate::metadata::{Metadata, MetadataExt};
use serde::{Deserialize, Serialize};

/// A company record with the fixed index schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub company_name: String,
    pub industry: String,
    pub headquarters: String,
    /// Opaque currency string, e.g. `"$100M"`.
    pub revenue: String,
    pub employees: i64,
    pub business_model: String,
    pub strategic_priorities: Vec<String>,
    pub ideal_op_industry: String,
    pub ideal_op_functional: Vec<String>,
    pub ideal_op_leadership: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The nested JSON shape company records are ingested in.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyIngest {
    pub company_name: String,
    pub basic_info: BasicInfo,
    pub deal_analysis: DealAnalysis,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BasicInfo {
    pub industry: String,
    pub headquarters: String,
    pub revenue: String,
    pub employees: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DealAnalysis {
    pub business_model: String,
    pub strategic_priorities: Vec<String>,
    pub ideal_op_profile: IdealOpProfile,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdealOpProfile {
    pub industry: String,
    pub functional: Vec<String>,
    pub leadership: Vec<String>,
}

impl From<CompanyIngest> for Company {
    fn from(ingest: CompanyIngest) -> Self {
        Company {
            company_name: ingest.company_name,
            industry: ingest.basic_info.industry,
            headquarters: ingest.basic_info.headquarters,
            revenue: ingest.basic_info.revenue,
            employees: ingest.basic_info.employees,
            business_model: ingest.deal_analysis.business_model,
            strategic_priorities: ingest.deal_analysis.strategic_priorities,
            ideal_op_industry: ingest.deal_analysis.ideal_op_profile.industry,
            ideal_op_functional: ingest.deal_analysis.ideal_op_profile.functional,
            ideal_op_leadership: ingest.deal_analysis.ideal_op_profile.leadership,
            description: ingest.description,
        }
    }
}

impl Company {
    /// Build the prose description used as embedding input.
    pub fn generate_description(&self) -> String {
        format!(
            "Company: {}\n\
             Industry: {}\n\
             Headquarters: {}\n\
             Revenue: {}\n\
             Employees: {}\n\
             Business Model: {}\n\
             Strategic Priorities: {}\n\
             Ideal Operating Partner Profile:\n\
             - Industry: {}\n\
             - Functional Strengths: {}\n\
             - Leadership Qualities: {}",
            self.company_name,
            self.industry,
            self.headquarters,
            self.revenue,
            self.employees,
            self.business_model,
            self.strategic_priorities.join(", "),
            self.ideal_op_industry,
            self.ideal_op_functional.join(", "),
            self.ideal_op_leadership.join(", "),
        )
    }

    /// Description if present, otherwise a freshly generated one.
    pub fn description_or_generated(&self) -> String {
        match &self.description {
            Some(text) if !text.is_empty() => text.clone(),
            _ => self.generate_description(),
        }
    }

    pub fn to_metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert("company_name".to_string(), self.company_name.clone().into());
        meta.insert("industry".to_string(), self.industry.clone().into());
        meta.insert("headquarters".to_string(), self.headquarters.clone().into());
        meta.insert("revenue".to_string(), self.revenue.clone().into());
        meta.insert("employees".to_string(), self.employees.into());
        meta.insert("business_model".to_string(), self.business_model.clone().into());
        meta.insert("strategic_priorities".to_string(), self.strategic_priorities.clone().into());
        meta.insert("ideal_op_industry".to_string(), self.ideal_op_industry.clone().into());
        meta.insert("ideal_op_functional".to_string(), self.ideal_op_functional.clone().into());
        meta.insert("ideal_op_leadership".to_string(), self.ideal_op_leadership.clone().into());
        meta.insert("description".to_string(), self.description_or_generated().into());
        meta
    }

    /// Read a company back from a returned match's metadata.
    ///
    /// The description is deliberately not required here: the search result
    /// schema copies only the analytic fields, matching the response the
    /// callers consume.
    pub fn from_metadata(meta: &Metadata) -> Result<Self> {
        Ok(Company {
            company_name: meta.require_text("company_name")?,
            industry: meta.require_text("industry")?,
            headquarters: meta.require_text("headquarters")?,
            revenue: meta.require_text("revenue")?,
            employees: meta.require_integer("employees")?,
            business_model: meta.require_text("business_model")?,
            strategic_priorities: meta.require_list("strategic_priorities")?,
            ideal_op_industry: meta.require_text("ideal_op_industry")?,
            ideal_op_functional: meta.require_list("ideal_op_functional")?,
            ideal_op_leadership: meta.require_list("ideal_op_leadership")?,
            description: None,
        })
    }
}

/// A real-estate property record with the fixed index schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub property_name: String,
    pub location: String,
    pub bedrooms: i64,
    pub view: String,
    pub price_usd: i64,
    pub size_sqft: i64,
    pub description: String,
    pub property_type: String,
}

impl Property {
    /// First word of the listing name, e.g. "Penthouse #23" -> "Penthouse".
    pub fn type_from_name(name: &str) -> String {
        name.split_whitespace().next().unwrap_or_default().to_string()
    }

    pub fn generate_description(&self) -> String {
        format!(
            "Property: {}\n\
             Type: {}\n\
             Bedrooms: {}\n\
             View: {}\n\
             Location: {}\n\
             Size: {} square feet\n\
             Price: ${}\n\
             Description: {}",
            self.property_name,
            self.property_type,
            self.bedrooms,
            self.view,
            self.location,
            self.size_sqft,
            format_thousands(self.price_usd),
            self.description,
        )
    }

    pub fn to_metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert("property_name".to_string(), self.property_name.clone().into());
        meta.insert("location".to_string(), self.location.clone().into());
        meta.insert("bedrooms".to_string(), self.bedrooms.into());
        meta.insert("view".to_string(), self.view.clone().into());
        meta.insert("price_usd".to_string(), self.price_usd.into());
        meta.insert("size_sqft".to_string(), self.size_sqft.into());
        meta.insert("description".to_string(), self.description.clone().into());
        meta.insert("property_type".to_string(), self.property_type.clone().into());
        meta
    }

    pub fn from_metadata(meta: &Metadata) -> Result<Self> {
        Ok(Property {
            property_name: meta.require_text("property_name")?,
            location: meta.require_text("location")?,
            bedrooms: meta.require_integer("bedrooms")?,
            view: meta.require_text("view")?,
            price_usd: meta.require_integer("price_usd")?,
            size_sqft: meta.require_integer("size_sqft")?,
            description: meta.require_text("description")?,
            property_type: meta.require_text("property_type")?,
        })
    }
}

/// Format an integer with thousands separators, e.g. 2206633 -> "2,206,633".
pub fn format_thousands(value: i64) -> String {
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

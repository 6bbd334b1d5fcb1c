//! Ingestion pipeline: records in, vectors out.
//!
//! Each record gets a prose description (generated when absent), the
//! description is embedded, and the resulting vectors are upserted in one
//! batch. A record whose embedding fails is skipped and reported, not fatal;
//! an upsert failure fails the whole batch.

use ragx_core::{
    Company, CompanyIngest, Embedder, Metadata, Property, Result, VectorEntry, VectorIndex,
};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of one ingestion batch.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub index_name: String,
    pub upserted_count: usize,
    /// Names of records skipped because their embedding failed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch ingestor over injected embedding and index clients.
#[derive(Clone)]
pub struct Ingestor {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    index_name: String,
}

impl Ingestor {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        index_name: impl Into<String>,
    ) -> Self {
        Self { embedder, index, index_name: index_name.into() }
    }

    /// Ingest company records (the nested JSON shape or CSV-parsed rows).
    pub async fn ingest_companies(&self, records: Vec<CompanyIngest>) -> IngestReport {
        let mut prepared = Vec::with_capacity(records.len());
        for ingest in records {
            let mut company = Company::from(ingest);
            company.description = Some(company.description_or_generated());
            prepared.push(company);
        }
        let items: Vec<(String, String, Metadata)> = prepared
            .into_iter()
            .map(|company| {
                (company.company_name.clone(), company.description_or_generated(), company.to_metadata())
            })
            .collect();
        self.run(items).await
    }

    /// Ingest property records. Missing types are derived from the listing
    /// name before embedding.
    pub async fn ingest_properties(&self, records: Vec<Property>) -> IngestReport {
        let items: Vec<(String, String, Metadata)> = records
            .into_iter()
            .map(|mut property| {
                if property.property_type.is_empty() {
                    property.property_type = Property::type_from_name(&property.property_name);
                }
                (property.property_name.clone(), property.generate_description(), property.to_metadata())
            })
            .collect();
        self.run(items).await
    }

    /// Embed each description sequentially, then upsert the surviving
    /// vectors as one batch. Vector ids are batch positions.
    async fn run(&self, items: Vec<(String, String, Metadata)>) -> IngestReport {
        let total = items.len();
        let mut entries = Vec::with_capacity(total);
        let mut skipped = Vec::new();

        for (position, (name, description, metadata)) in items.into_iter().enumerate() {
            match self.embedder.embed(&description).await {
                Ok(values) => {
                    entries.push(VectorEntry { id: position.to_string(), values, metadata });
                }
                Err(e) => {
                    warn!(record = %name, error = %e, "embedding failed, skipping record");
                    skipped.push(name);
                }
            }
        }

        match self.index.upsert(&entries).await {
            Ok(count) => {
                info!(index = %self.index_name, upserted = count, total, "ingestion batch stored");
                IngestReport {
                    index_name: self.index_name.clone(),
                    upserted_count: count,
                    skipped,
                    error: None,
                }
            }
            Err(e) => {
                warn!(index = %self.index_name, error = %e, "upsert failed");
                IngestReport {
                    index_name: self.index_name.clone(),
                    upserted_count: 0,
                    skipped,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

const COMPANY_CSV_COLUMNS: [&str; 10] = [
    "company_name",
    "industry",
    "headquarters",
    "revenue",
    "employees",
    "business_model",
    "strategic_priorities",
    "ideal_op_industry",
    "ideal_op_functional",
    "ideal_op_leadership",
];

/// Parse company rows from CSV. Comma-separated cells become lists.
pub fn parse_companies_from_csv(input: impl Read) -> Result<Vec<CompanyIngest>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader
        .headers()
        .map_err(|e| ragx_core::Error::Ingestion(format!("Failed to read CSV header: {e}")))?
        .clone();
    let missing: Vec<&str> = COMPANY_CSV_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ragx_core::Error::Ingestion(format!(
            "Missing required CSV columns: {missing:?}"
        )));
    }

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let mut companies = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ragx_core::Error::Ingestion(format!("Invalid CSV row: {e}")))?;
        let cell = |name: &str| row.get(column(name)).unwrap_or_default().to_string();
        let json = serde_json::json!({
            "company_name": cell("company_name"),
            "basic_info": {
                "industry": cell("industry"),
                "headquarters": cell("headquarters"),
                "revenue": cell("revenue"),
                "employees": cell("employees").trim().parse::<i64>().unwrap_or(0),
            },
            "deal_analysis": {
                "business_model": cell("business_model"),
                "strategic_priorities": split_list(&cell("strategic_priorities")),
                "ideal_op_profile": {
                    "industry": cell("ideal_op_industry"),
                    "functional": split_list(&cell("ideal_op_functional")),
                    "leadership": split_list(&cell("ideal_op_leadership")),
                }
            }
        });
        companies.push(serde_json::from_value(json)?);
    }
    Ok(companies)
}

const PROPERTY_CSV_COLUMNS: [&str; 7] = [
    "Property Name",
    "Bedrooms",
    "View",
    "Location",
    "Size (sqft)",
    "Price (USD)",
    "Description",
];

/// Parse property rows from the listing CSV layout. Locations may carry
/// surrounding quotes in the source data; they are stripped here.
pub fn parse_properties_from_csv(input: impl Read) -> Result<Vec<Property>> {
    let mut reader = csv::Reader::from_reader(input);
    let headers = reader
        .headers()
        .map_err(|e| ragx_core::Error::Ingestion(format!("Failed to read CSV header: {e}")))?
        .clone();
    let missing: Vec<&str> = PROPERTY_CSV_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(ragx_core::Error::Ingestion(format!(
            "Missing required CSV columns: {missing:?}"
        )));
    }

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap_or_default();
    let mut properties = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| ragx_core::Error::Ingestion(format!("Invalid CSV row: {e}")))?;
        let cell = |name: &str| row.get(column(name)).unwrap_or_default().to_string();
        let name = cell("Property Name");
        let integer = |field: &str| -> Result<i64> {
            cell(field).trim().parse::<i64>().map_err(|_| {
                ragx_core::Error::InvalidRecord(format!(
                    "Non-numeric {field} for property '{name}'"
                ))
            })
        };
        properties.push(Property {
            property_type: Property::type_from_name(&name),
            location: cell("Location").trim_matches('"').to_string(),
            bedrooms: integer("Bedrooms")?,
            view: cell("View"),
            price_usd: integer("Price (USD)")?,
            size_sqft: integer("Size (sqft)")?,
            description: cell("Description"),
            property_name: name,
        });
    }
    Ok(properties)
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

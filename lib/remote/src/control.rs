//! Pinecone control-plane client: index lifecycle.
//!
//! Used by ingestion and administration only - the query path never touches
//! the control plane.

use ragx_core::{Error, Result, EMBEDDING_DIM};
use serde::{Deserialize, Serialize};
use tracing::info;

const API_KEY_HEADER: &str = "Api-Key";

pub const DEFAULT_CONTROL_PLANE_URL: &str = "https://api.pinecone.io";

/// Client for the Pinecone control plane (`/indexes`).
#[derive(Debug, Clone)]
pub struct PineconeControl {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Description of one index as reported by the control plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDescription {
    pub name: String,
    pub dimension: usize,
    pub metric: String,
    /// Data-plane host for this index.
    pub host: String,
    #[serde(default)]
    pub status: Option<IndexStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStatus {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Deserialize)]
struct ListIndexesResponse {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

impl PineconeControl {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_CONTROL_PLANE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Create a serverless cosine index sized for the embedding model, if it
    /// does not already exist. Returns its description either way.
    pub async fn ensure_index(&self, name: &str) -> Result<IndexDescription> {
        if let Ok(existing) = self.describe_index(name).await {
            info!(index = name, "index already exists");
            return Ok(existing);
        }

        let request = CreateIndexRequest {
            name,
            dimension: EMBEDDING_DIM,
            metric: "cosine",
            spec: IndexSpec {
                serverless: ServerlessSpec { cloud: "aws", region: "us-east-1" },
            },
        };
        let url = format!("{}/indexes", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Index(e.to_string()))?;
        let created: IndexDescription = Self::decode(response).await?;
        info!(index = name, host = %created.host, "created index");
        Ok(created)
    }

    pub async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let url = format!("{}/indexes/{}", self.base_url, name);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Index(e.to_string()))?;
        Self::decode(response).await
    }

    pub async fn delete_index(&self, name: &str) -> Result<()> {
        let url = format!("{}/indexes/{}", self.base_url, name);
        let response = self
            .http
            .delete(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Index(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Index(format!("{status}: {body}")));
        }
        Ok(())
    }

    pub async fn list_indexes(&self) -> Result<Vec<IndexDescription>> {
        let url = format!("{}/indexes", self.base_url);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| Error::Index(e.to_string()))?;
        let parsed: ListIndexesResponse = Self::decode(response).await?;
        Ok(parsed.indexes)
    }

    async fn decode<Resp: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<Resp> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Index(format!("{status}: {body}")));
        }
        response.json().await.map_err(|e| Error::Index(e.to_string()))
    }
}

//! Pinecone data-plane client.
//!
//! Talks to one index host. Query and upsert are the load-bearing calls;
//! list/fetch are best-effort (older backends reject them, callers treat
//! that as "unsupported" rather than fatal).

use async_trait::async_trait;
use ragx_core::{
    Error, FilterCondition, IndexMatch, IndexStats, Metadata, Result, VectorEntry, VectorIndex,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

const API_KEY_HEADER: &str = "Api-Key";

/// Client for one Pinecone index (data plane).
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    http: reqwest::Client,
    host: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    /// Omitted entirely when no predicates were compiled: some backends
    /// treat an empty filter object as "match nothing".
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a BTreeMap<String, FilterCondition>>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<RawMatch>,
}

#[derive(Deserialize)]
struct RawMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [VectorEntry],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    upserted_count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(default)]
    total_vector_count: u64,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    index_fullness: Option<f64>,
    #[serde(default)]
    namespaces: BTreeMap<String, NamespaceStats>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamespaceStats {
    #[serde(default)]
    vector_count: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest {
    delete_all: bool,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    vectors: Vec<ListedId>,
}

#[derive(Deserialize)]
struct ListedId {
    id: String,
}

#[derive(Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: BTreeMap<String, VectorEntry>,
}

impl PineconeIndex {
    /// `host` is the index's data-plane URL, e.g.
    /// `https://my-index-abc123.svc.us-east-1-aws.pinecone.io`.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            host: host.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    async fn post_json<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{}", self.host, path);
        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Index(e.to_string()))?;
        Self::decode(response).await
    }

    async fn get_json<Resp: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Resp> {
        let url = format!("{}{}", self.host, path);
        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Index(e.to_string()))?;
        Self::decode(response).await
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

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&BTreeMap<String, FilterCondition>>,
    ) -> Result<Vec<IndexMatch>> {
        let request = QueryRequest { vector, top_k, include_metadata: true, filter };
        let response: QueryResponse = self.post_json("/query", &request).await?;
        debug!(matches = response.matches.len(), top_k, "index query");
        Ok(response
            .matches
            .into_iter()
            .map(|m| IndexMatch {
                id: m.id,
                score: m.score,
                metadata: m.metadata.unwrap_or_default(),
            })
            .collect())
    }

    async fn upsert(&self, entries: &[VectorEntry]) -> Result<usize> {
        let response: UpsertResponse = self
            .post_json("/vectors/upsert", &UpsertRequest { vectors: entries })
            .await?;
        Ok(response.upserted_count)
    }

    async fn describe_stats(&self) -> Result<IndexStats> {
        let response: StatsResponse = self
            .post_json("/describe_index_stats", &serde_json::json!({}))
            .await?;
        Ok(IndexStats {
            total_vector_count: response.total_vector_count,
            dimension: response.dimension,
            index_fullness: response.index_fullness,
            namespaces: response
                .namespaces
                .into_iter()
                .map(|(name, ns)| (name, ns.vector_count))
                .collect(),
        })
    }

    async fn clear(&self) -> Result<()> {
        let _: serde_json::Value = self
            .post_json("/vectors/delete", &DeleteRequest { delete_all: true })
            .await?;
        Ok(())
    }

    async fn list_ids(&self, limit: usize) -> Result<Vec<String>> {
        let response: ListResponse = self
            .get_json("/vectors/list", &[("limit", limit.to_string())])
            .await?;
        Ok(response.vectors.into_iter().map(|v| v.id).collect())
    }

    async fn fetch(&self, ids: &[String]) -> Result<Vec<VectorEntry>> {
        let query: Vec<(&str, String)> = ids.iter().map(|id| ("ids", id.clone())).collect();
        let response: FetchResponse = self.get_json("/vectors/fetch", &query).await?;
        Ok(response.vectors.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragx_core::MetadataValue;

    #[tokio::test]
    async fn test_query_without_filters_sends_no_filter_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/query")
            .match_header(API_KEY_HEADER, "pc-key")
            // Exact body match: a "filter" key anywhere would fail this.
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "vector": [1.0, 0.0],
                "topK": 5,
                "includeMetadata": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"matches":[]}"#)
            .create_async()
            .await;

        let index = PineconeIndex::new(server.url(), "pc-key");
        let matches = index.query(&[1.0, 0.0], 5, None).await.unwrap();
        assert!(matches.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_parses_matches_with_metadata() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/query")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"matches":[{"id":"0","score":0.91,"metadata":{"company_name":"Acme","employees":450}}]}"#,
            )
            .create_async()
            .await;

        let index = PineconeIndex::new(server.url(), "pc-key");
        let matches = index.query(&[0.5], 1, None).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "0");
        assert_eq!(
            matches[0].metadata.get("employees"),
            Some(&MetadataValue::Integer(450))
        );
    }

    #[tokio::test]
    async fn test_describe_stats_maps_namespaces() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/describe_index_stats")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"totalVectorCount":25,"dimension":3072,"indexFullness":0.0,"namespaces":{"":{"vectorCount":25}}}"#,
            )
            .create_async()
            .await;

        let index = PineconeIndex::new(server.url(), "pc-key");
        let stats = index.describe_stats().await.unwrap();
        assert_eq!(stats.total_vector_count, 25);
        assert_eq!(stats.dimension, Some(3072));
        assert_eq!(stats.namespaces.get(""), Some(&25));
    }

    #[tokio::test]
    async fn test_transport_error_maps_to_index_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/query")
            .with_status(400)
            .with_body("malformed filter")
            .create_async()
            .await;

        let index = PineconeIndex::new(server.url(), "pc-key");
        let result = index.query(&[0.1], 5, None).await;
        assert!(matches!(result, Err(Error::Index(_))));
    }
}

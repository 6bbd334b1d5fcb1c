// Integration tests for ragx: full pipeline over in-memory collaborators.
use async_trait::async_trait;
use ragx_core::{
    Company, CompanyFilterParams, CompanyIngest, Embedder, Error, FilterCondition, IndexMatch,
    IndexStats, Metadata, Property, PropertyFilterParams, Result, VectorEntry, VectorIndex,
};
use ragx_search::{
    fallback_reasoning, Ingestor, ReasoningStrategy, RuleBased, SearchEngine, SearchRequest,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Deterministic embedder: vector derived from text length.
struct FakeEmbedder {
    fail: bool,
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(Error::Embedding("offline".to_string()));
        }
        Ok(vec![text.len() as f32; 8])
    }
}

/// In-memory index: stores upserts, answers queries with canned scores in
/// insertion order.
struct MemoryIndex {
    entries: Mutex<Vec<VectorEntry>>,
    scores: Vec<f32>,
    fail_query: bool,
    last_filter: Mutex<Option<serde_json::Value>>,
}

impl MemoryIndex {
    fn new(scores: Vec<f32>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            scores,
            fail_query: false,
            last_filter: Mutex::new(None),
        }
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn query(
        &self,
        _vector: &[f32],
        top_k: usize,
        filter: Option<&BTreeMap<String, FilterCondition>>,
    ) -> Result<Vec<IndexMatch>> {
        *self.last_filter.lock().unwrap() =
            filter.map(|f| serde_json::to_value(f).expect("filter serializes"));
        if self.fail_query {
            return Err(Error::Index("connection reset".to_string()));
        }
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .zip(self.scores.iter())
            .take(top_k)
            .map(|(entry, &score)| IndexMatch {
                id: entry.id.clone(),
                score,
                metadata: entry.metadata.clone(),
            })
            .collect())
    }

    async fn upsert(&self, entries: &[VectorEntry]) -> Result<usize> {
        self.entries.lock().unwrap().extend_from_slice(entries);
        Ok(entries.len())
    }

    async fn describe_stats(&self) -> Result<IndexStats> {
        Ok(IndexStats {
            total_vector_count: self.entries.lock().unwrap().len() as u64,
            dimension: Some(8),
            ..Default::default()
        })
    }

    async fn clear(&self) -> Result<()> {
        self.entries.lock().unwrap().clear();
        Ok(())
    }

    async fn list_ids(&self, limit: usize) -> Result<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .take(limit)
            .map(|e| e.id.clone())
            .collect())
    }

    async fn fetch(&self, ids: &[String]) -> Result<Vec<VectorEntry>> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }
}

/// Strategy that fails on one configured record.
struct FlakyReasoner {
    fail_for: String,
}

#[async_trait]
impl ReasoningStrategy for FlakyReasoner {
    async fn explain(&self, _query: &str, metadata: &Metadata, _score: f64) -> Result<String> {
        let name = metadata
            .get("company_name")
            .and_then(|v| v.as_text())
            .unwrap_or_default();
        if name == self.fail_for {
            Err(Error::Reasoning("model overloaded".to_string()))
        } else {
            Ok(format!("{name} fits the mandate"))
        }
    }
}

fn company_ingest(name: &str, industry: &str, employees: i64) -> CompanyIngest {
    serde_json::from_value(serde_json::json!({
        "company_name": name,
        "basic_info": {
            "industry": industry,
            "headquarters": "Columbus, OH",
            "revenue": "$45M",
            "employees": employees
        },
        "deal_analysis": {
            "business_model": "Brokerage",
            "strategic_priorities": ["Automation", "M&A"],
            "ideal_op_profile": {
                "industry": "Transportation",
                "functional": ["Ops"],
                "leadership": ["Hands-on"]
            }
        }
    }))
    .expect("valid ingest record")
}

fn property(name: &str, price: i64) -> Property {
    Property {
        property_type: Property::type_from_name(name),
        property_name: name.to_string(),
        location: "Lake Tahoe, CA".to_string(),
        bedrooms: 3,
        view: "lake view".to_string(),
        price_usd: price,
        size_sqft: 2400,
        description: "Waterfront home".to_string(),
    }
}

#[tokio::test]
async fn test_ingest_then_search_companies() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex::new(vec![0.91, 0.77]));

    let ingestor = Ingestor::new(Arc::clone(&embedder), Arc::clone(&index) as _, "companies");
    let report = ingestor
        .ingest_companies(vec![
            company_ingest("Alpha Freight", "Logistics", 210),
            company_ingest("Beta Labs", "Biotech", 95),
        ])
        .await;
    assert_eq!(report.upserted_count, 2);
    assert!(report.error.is_none());

    let engine = SearchEngine::new(embedder, index);
    let request: SearchRequest<_> = SearchRequest::new("freight brokers", 5);
    let results = engine.search::<Company>(&request).await.unwrap();

    assert_eq!(results.total_found, 2);
    assert_eq!(results.items[0].record.company_name, "Alpha Freight");
    assert_eq!(results.items[1].record.company_name, "Beta Labs");
    assert!(results.search_summary.starts_with("Found 2 companies matching 'freight brokers'"));
}

#[tokio::test]
async fn test_ranks_follow_upstream_order() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex::new(vec![0.42, 0.91, 0.77]));
    let ingestor = Ingestor::new(Arc::clone(&embedder), Arc::clone(&index) as _, "properties");
    ingestor
        .ingest_properties(vec![
            property("Cabin #1", 500_000),
            property("Villa #2", 2_500_000),
            property("Penthouse #3", 1_800_000),
        ])
        .await;

    let engine = SearchEngine::new(embedder, index);
    let request: SearchRequest<_> = SearchRequest::new("lakefront", 5);
    let results = engine.search::<Property>(&request).await.unwrap();

    let ranked: Vec<(usize, f64)> =
        results.items.iter().map(|item| (item.rank, item.score)).collect();
    assert_eq!(ranked, vec![(1, 0.42), (2, 0.91), (3, 0.77)]);
}

#[tokio::test]
async fn test_embedding_failure_yields_error_shape() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: true });
    let index = Arc::new(MemoryIndex::new(vec![]));
    let engine = SearchEngine::new(embedder, index);
    let request: SearchRequest<_> = SearchRequest::new("anything", 5);
    let results = engine.search::<Company>(&request).await.unwrap();

    assert_eq!(results.error.as_deref(), Some("Failed to generate query embedding"));
    assert_eq!(results.search_summary, "Unable to process query");
    assert_eq!(results.total_found, 0);
    assert!(results.filters_applied.is_empty());

    let json = serde_json::to_value(&results).unwrap();
    assert_eq!(json["companies"], serde_json::json!([]));
    assert_eq!(json["error"], "Failed to generate query embedding");
}

#[tokio::test]
async fn test_index_failure_yields_error_shape() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex { fail_query: true, ..MemoryIndex::new(vec![]) });
    let engine = SearchEngine::new(embedder, index);
    let request: SearchRequest<_> = SearchRequest::new("anything", 5);
    let results = engine.search::<Company>(&request).await.unwrap();

    assert_eq!(results.error.as_deref(), Some("Search error: Index error: connection reset"));
    assert_eq!(results.search_summary, "Search encountered an error");
}

#[tokio::test]
async fn test_reasoning_fallback_covers_one_failure() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex::new(vec![0.8, 0.65, 0.5]));
    let ingestor = Ingestor::new(Arc::clone(&embedder), Arc::clone(&index) as _, "companies");
    ingestor
        .ingest_companies(vec![
            company_ingest("Alpha Freight", "Logistics", 210),
            company_ingest("Beta Labs", "Biotech", 95),
            company_ingest("Gamma Goods", "Retail", 400),
        ])
        .await;

    let engine = SearchEngine::new(embedder, index)
        .with_reasoner(Arc::new(FlakyReasoner { fail_for: "Beta Labs".to_string() }));
    let mut request: SearchRequest<_> = SearchRequest::new("operators", 5);
    request.with_reasoning = true;
    let results = engine.search::<Company>(&request).await.unwrap();

    assert_eq!(
        results.items[0].reasoning.as_deref(),
        Some("Alpha Freight fits the mandate")
    );
    assert_eq!(results.items[1].reasoning.as_deref(), Some(fallback_reasoning(0.65).as_str()));
    assert_eq!(
        results.items[1].reasoning.as_deref(),
        Some("Selected based on semantic similarity (score: 0.650)")
    );
    assert_eq!(
        results.items[2].reasoning.as_deref(),
        Some("Gamma Goods fits the mandate")
    );
}

#[tokio::test]
async fn test_empty_filters_are_omitted_from_index_query() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex::new(vec![]));
    let engine = SearchEngine::new(embedder, Arc::clone(&index) as _);

    let request: SearchRequest<_> = SearchRequest::new("anything", 5);
    engine.search::<Company>(&request).await.unwrap();
    assert!(index.last_filter.lock().unwrap().is_none());

    let mut filtered: SearchRequest<CompanyFilterParams> = SearchRequest::new("anything", 5);
    filtered.filters.industry_list = Some("Logistics".to_string());
    filtered.filters.employees_min = Some("100".to_string());
    engine.search::<Company>(&filtered).await.unwrap();

    let sent = index.last_filter.lock().unwrap().clone().unwrap();
    assert_eq!(sent["industry"], serde_json::json!({"$in": ["Logistics"]}));
    assert_eq!(sent["employees"], serde_json::json!({"$gte": 100}));
}

#[tokio::test]
async fn test_schema_violation_propagates() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex::new(vec![0.9]));
    // A company record in an index queried as properties.
    let ingestor = Ingestor::new(Arc::clone(&embedder), Arc::clone(&index) as _, "companies");
    ingestor.ingest_companies(vec![company_ingest("Alpha Freight", "Logistics", 210)]).await;

    let engine = SearchEngine::new(embedder, index);
    let request: SearchRequest<_> = SearchRequest::new("lakefront", 5);
    let result = engine.search::<Property>(&request).await;
    assert!(matches!(result, Err(Error::MissingField(_))));
}

#[tokio::test]
async fn test_zero_match_summary_is_exact() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex::new(vec![]));
    let engine = SearchEngine::new(embedder, index);
    let request: SearchRequest<_> = SearchRequest::new("zzznomatch", 5);

    let companies = engine.search::<Company>(&request).await.unwrap();
    assert_eq!(companies.search_summary, "No companies found matching 'zzznomatch'");

    let property_request: SearchRequest<PropertyFilterParams> =
        SearchRequest::new("zzznomatch", 5);
    let properties = engine.search::<Property>(&property_request).await.unwrap();
    assert_eq!(properties.search_summary, "No properties found matching 'zzznomatch'");
}

#[tokio::test]
async fn test_repeated_request_is_idempotent() {
    let embedder: Arc<dyn Embedder> = Arc::new(FakeEmbedder { fail: false });
    let index = Arc::new(MemoryIndex::new(vec![0.8, 0.65]));
    let ingestor = Ingestor::new(Arc::clone(&embedder), Arc::clone(&index) as _, "properties");
    ingestor
        .ingest_properties(vec![property("Cabin #1", 500_000), property("Villa #2", 2_500_000)])
        .await;

    let engine = SearchEngine::new(embedder, index).with_reasoner(Arc::new(RuleBased));
    let mut request: SearchRequest<PropertyFilterParams> =
        SearchRequest::new("affordable lake house", 5);
    request.with_reasoning = true;
    request.filters.price_max = Some("3000000".to_string());

    let first = engine.search::<Property>(&request).await.unwrap();
    let second = engine.search::<Property>(&request).await.unwrap();
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

use actix_cors::Cors;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Result as ActixResult};
use ragx_core::{Company, CompanyFilterParams, Property, PropertyFilterParams};
use ragx_search::{
    parse_companies_from_csv, parse_properties_from_csv, IndexAdmin, Ingestor, SearchEngine,
    SearchRequest,
};
use serde::Deserialize;
use tracing::info;

/// Everything one record domain needs to serve requests.
#[derive(Clone)]
pub struct DomainState {
    pub engine: SearchEngine,
    pub ingestor: Ingestor,
    pub admin: IndexAdmin,
}

/// Shared server state: the two configured domains.
#[derive(Clone)]
pub struct AppState {
    pub companies: DomainState,
    pub properties: DomainState,
}

#[derive(Deserialize)]
struct CompanySearchQuery {
    query: Option<String>,
    top_k: Option<String>,
    with_reasoning: Option<String>,
    industry_list: Option<String>,
    location_list: Option<String>,
    revenue_min: Option<String>,
    revenue_max: Option<String>,
    employees_min: Option<String>,
    employees_max: Option<String>,
}

#[derive(Deserialize)]
struct PropertySearchQuery {
    query: Option<String>,
    top_k: Option<String>,
    with_reasoning: Option<String>,
    location_list: Option<String>,
    price_min: Option<String>,
    price_max: Option<String>,
    bedrooms_min: Option<String>,
    bedrooms_max: Option<String>,
}

#[derive(Deserialize)]
struct IndexDetailsQuery {
    sample_limit: Option<String>,
    target: Option<String>,
}

#[derive(Deserialize)]
struct ClearIndexQuery {
    delete_index: Option<String>,
    target: Option<String>,
}

#[derive(Deserialize, Default)]
struct ClearIndexBody {
    #[serde(default)]
    delete_index: Option<serde_json::Value>,
}

const DEFAULT_TOP_K: usize = 5;

fn parse_bool(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn parse_top_k(value: Option<&str>) -> usize {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(DEFAULT_TOP_K)
}

/// Pick a domain by the optional `target` query parameter. Companies is the
/// default; anything starting with "propert" selects properties.
fn select_domain<'a>(state: &'a AppState, target: Option<&str>) -> &'a DomainState {
    match target {
        Some(t) if t.to_ascii_lowercase().starts_with("propert") => &state.properties,
        _ => &state.companies,
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, port: u16) -> std::io::Result<()> {
        info!(port, "starting REST API");
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(state.clone()))
                .configure(configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }
}

/// Route table, split out so tests can mount it on a test service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/search", web::get().to(search_companies))
        .route("/properties/search", web::get().to(search_properties))
        .route("/ingest", web::post().to(ingest_companies))
        .route("/properties/ingest", web::post().to(ingest_properties))
        .route("/index-details", web::get().to(index_details))
        .route("/clear-index", web::post().to(clear_index))
        .route("/clear-index", web::delete().to(clear_index));
}

async fn root() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "running",
        "endpoints": {
            "search": "/search (GET)",
            "properties_search": "/properties/search (GET)",
            "ingest": "/ingest (POST)",
            "properties_ingest": "/properties/ingest (POST)",
            "index_details": "/index-details (GET)",
            "clear_index": "/clear-index (POST/DELETE)"
        }
    })))
}

async fn search_companies(
    state: web::Data<AppState>,
    params: web::Query<CompanySearchQuery>,
) -> ActixResult<HttpResponse> {
    let Some(query) = params.query.clone().filter(|q| !q.is_empty()) else {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"error": "query parameter is required"})));
    };
    let request = SearchRequest {
        query,
        top_k: parse_top_k(params.top_k.as_deref()),
        with_reasoning: params.with_reasoning.as_deref().map(parse_bool).unwrap_or(false),
        filters: CompanyFilterParams {
            industry_list: params.industry_list.clone(),
            location_list: params.location_list.clone(),
            revenue_min: params.revenue_min.clone(),
            revenue_max: params.revenue_max.clone(),
            employees_min: params.employees_min.clone(),
            employees_max: params.employees_max.clone(),
        },
    };
    match state.companies.engine.search::<Company>(&request).await {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => Ok(HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": e.to_string()}))),
    }
}

async fn search_properties(
    state: web::Data<AppState>,
    params: web::Query<PropertySearchQuery>,
) -> ActixResult<HttpResponse> {
    let Some(query) = params.query.clone().filter(|q| !q.is_empty()) else {
        return Ok(HttpResponse::BadRequest()
            .json(serde_json::json!({"error": "query parameter is required"})));
    };
    let request = SearchRequest {
        query,
        top_k: parse_top_k(params.top_k.as_deref()),
        with_reasoning: params.with_reasoning.as_deref().map(parse_bool).unwrap_or(false),
        filters: PropertyFilterParams {
            location_list: params.location_list.clone(),
            price_min: params.price_min.clone(),
            price_max: params.price_max.clone(),
            bedrooms_min: params.bedrooms_min.clone(),
            bedrooms_max: params.bedrooms_max.clone(),
        },
    };
    match state.properties.engine.search::<Property>(&request).await {
        Ok(results) => Ok(HttpResponse::Ok().json(results)),
        Err(e) => Ok(HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": e.to_string()}))),
    }
}

/// Accepts `{"companies": [...]}`, a bare JSON list, or raw CSV (by
/// content type).
async fn ingest_companies(
    state: web::Data<AppState>,
    request: HttpRequest,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let records = if is_csv(&request) {
        match parse_companies_from_csv(body.as_ref()) {
            Ok(records) => records,
            Err(e) => {
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Failed to parse uploaded file: {e}")
                })));
            }
        }
    } else {
        match parse_json_records(&body, "companies") {
            Ok(records) => records,
            Err(message) => {
                return Ok(
                    HttpResponse::BadRequest().json(serde_json::json!({"error": message}))
                );
            }
        }
    };
    let report = state.companies.ingestor.ingest_companies(records).await;
    Ok(HttpResponse::Ok().json(report))
}

async fn ingest_properties(
    state: web::Data<AppState>,
    request: HttpRequest,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let records = if is_csv(&request) {
        match parse_properties_from_csv(body.as_ref()) {
            Ok(records) => records,
            Err(e) => {
                return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Failed to parse uploaded file: {e}")
                })));
            }
        }
    } else {
        match parse_json_records(&body, "properties") {
            Ok(records) => records,
            Err(message) => {
                return Ok(
                    HttpResponse::BadRequest().json(serde_json::json!({"error": message}))
                );
            }
        }
    };
    let report = state.properties.ingestor.ingest_properties(records).await;
    Ok(HttpResponse::Ok().json(report))
}

async fn index_details(
    state: web::Data<AppState>,
    params: web::Query<IndexDetailsQuery>,
) -> ActixResult<HttpResponse> {
    let sample_limit = params.sample_limit.as_deref().and_then(|v| v.parse().ok()).unwrap_or(1);
    let domain = select_domain(&state, params.target.as_deref());
    Ok(HttpResponse::Ok().json(domain.admin.details(sample_limit).await))
}

async fn clear_index(
    state: web::Data<AppState>,
    params: web::Query<ClearIndexQuery>,
    body: web::Bytes,
) -> ActixResult<HttpResponse> {
    let parsed_body: ClearIndexBody = serde_json::from_slice(&body).unwrap_or_default();
    let delete_index = match parsed_body.delete_index {
        Some(serde_json::Value::Bool(flag)) => flag,
        Some(serde_json::Value::String(s)) => parse_bool(&s),
        _ => params.delete_index.as_deref().map(parse_bool).unwrap_or(false),
    };
    let domain = select_domain(&state, params.target.as_deref());
    Ok(HttpResponse::Ok().json(domain.admin.clear(delete_index).await))
}

fn is_csv(request: &HttpRequest) -> bool {
    request
        .headers()
        .get(actix_web::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("csv"))
        .unwrap_or(false)
}

/// Parse a JSON ingestion body: either `{"<key>": [...]}` or a bare list.
fn parse_json_records<T: serde::de::DeserializeOwned>(
    body: &[u8],
    key: &str,
) -> std::result::Result<Vec<T>, String> {
    let payload: serde_json::Value = serde_json::from_slice(body)
        .map_err(|_| "No file uploaded and no JSON body provided".to_string())?;
    let list = match &payload {
        serde_json::Value::Array(items) => items.clone(),
        serde_json::Value::Object(map) => match map.get(key) {
            Some(serde_json::Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    if list.is_empty() {
        return Err(format!("No {key} found in JSON body"));
    }
    list.into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| format!("Invalid record: {e}"))
        })
        .collect()
}

use clap::Parser;
use ragx_api::{AppState, DomainState, RestApi};
use ragx_remote::{OpenAiChat, OpenAiEmbedder, PineconeControl, PineconeIndex};
use ragx_search::{GroundedLlm, IndexAdmin, Ingestor, ReasoningStrategy, RuleBased, SearchEngine};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Semantic search over company and property records
#[derive(Parser, Debug)]
#[command(name = "ragx")]
#[command(about = "Ingestion and retrieval over a managed vector index", long_about = None)]
struct Args {
    /// HTTP API port
    #[arg(long, default_value_t = 5000, env = "PORT")]
    http_port: u16,

    /// OpenAI API key (embeddings and reasoning)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    /// Pinecone API key
    #[arg(long, env = "PINECONE_API_KEY", hide_env_values = true)]
    pinecone_api_key: String,

    /// Company index name
    #[arg(long, default_value = "company-information-dummy")]
    company_index: String,

    /// Property index name
    #[arg(long, default_value = "property-listings")]
    property_index: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ragx v{}", env!("CARGO_PKG_VERSION"));
    info!("Company index: {}", args.company_index);
    info!("Property index: {}", args.property_index);

    let embedder = Arc::new(OpenAiEmbedder::new(&args.openai_api_key));
    let chat = Arc::new(OpenAiChat::new(&args.openai_api_key));
    let control = Arc::new(PineconeControl::new(&args.pinecone_api_key));

    let state = AppState {
        companies: domain_state(
            &args.pinecone_api_key,
            &args.company_index,
            embedder.clone(),
            control.clone(),
            Arc::new(GroundedLlm::new(chat)),
        )
        .await?,
        properties: domain_state(
            &args.pinecone_api_key,
            &args.property_index,
            embedder,
            control,
            Arc::new(RuleBased),
        )
        .await?,
    };

    info!("HTTP API: http://localhost:{}/", args.http_port);
    RestApi::start(state, args.http_port).await?;

    info!("Shutting down...");
    Ok(())
}

/// Resolve the index host, then wire one domain's engine, ingestor and admin
/// around it.
async fn domain_state(
    pinecone_api_key: &str,
    index_name: &str,
    embedder: Arc<OpenAiEmbedder>,
    control: Arc<PineconeControl>,
    reasoner: Arc<dyn ReasoningStrategy>,
) -> anyhow::Result<DomainState> {
    let description = control.ensure_index(index_name).await?;
    info!("Index {} at {}", index_name, description.host);
    // The control plane reports the host without a scheme.
    let index = Arc::new(PineconeIndex::new(
        format!("https://{}", description.host),
        pinecone_api_key,
    ));
    Ok(DomainState {
        engine: SearchEngine::new(embedder.clone(), index.clone()).with_reasoner(reasoner),
        ingestor: Ingestor::new(embedder, index.clone(), index_name),
        admin: IndexAdmin::new(index, control, index_name),
    })
}

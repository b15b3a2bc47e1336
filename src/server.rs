use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    engine::{ListingStore, PriceSuggestor},
    handlers::{self, AppState},
    metrics,
    providers::{LlmClient, MarketSource, OfflineProvider, ReasoningProvider},
    signals::setup_signal_handlers,
};

/// Start the pricing server
///
/// This function:
/// 1. Initializes metrics
/// 2. Sets up signal handlers for graceful shutdown
/// 3. Loads the listings pool and builds the engine
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize metrics
    info!("Initializing Prometheus metrics...");
    let metrics_handle = Arc::new(metrics::init_metrics());

    // Setup signal handlers (SIGTERM, SIGINT)
    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    // Load the listings pool once; it is immutable for the process lifetime
    let store = Arc::new(ListingStore::from_csv(&config.dataset.path)?);
    info!(
        "Loaded {} listings from {}",
        store.len(),
        config.dataset.path
    );

    let (market, reasoning) = build_providers(&config);

    let suggestor = Arc::new(PriceSuggestor::new(
        store,
        config.scoring.clone(),
        market,
        reasoning,
        &config.engine,
    ));

    let app_state = AppState { suggestor };

    // Build the Axum router
    let app = create_router(app_state, metrics_handle);

    // Create socket address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting resale pricer on {}", addr);
    info!(
        "Configuration: {} comparables per query, {}s market timeout, LLM {}",
        config.engine.comparables_k,
        config.engine.market_timeout_seconds,
        if config.llm.enabled {
            "enabled"
        } else {
            "disabled"
        }
    );

    // Bind to address
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Wait for shutdown signal
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    // Wait for signal handler task to complete
    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(
    app_state: AppState,
    metrics_handle: Arc<metrics_exporter_prometheus::PrometheusHandle>,
) -> Router {
    // Pricing and moderation routes share the engine state
    let api_routes = Router::new()
        .route("/v1/negotiate", post(handlers::suggest::handle_negotiate))
        .route("/v1/moderate", post(handlers::moderate::handle_moderate))
        .with_state(app_state);

    Router::new()
        // Public endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::metrics_handler::metrics))
        .with_state(metrics_handle)
        .merge(api_routes)
        // Price queries are small JSON documents; cap bodies well below that
        .layer(DefaultBodyLimit::max(256 * 1024))
        .layer(TraceLayer::new_for_http())
}

/// Select market and reasoning providers based on configuration
///
/// With the LLM disabled the engine still answers every request: the offline
/// provider returns no market samples and a deterministic reasoning string.
fn build_providers(config: &Config) -> (Arc<dyn MarketSource>, Arc<dyn ReasoningProvider>) {
    if config.llm.enabled {
        info!("LLM provider enabled, model: {}", config.llm.model);
        let client = Arc::new(LlmClient::new(reqwest::Client::new(), config.llm.clone()));
        let market: Arc<dyn MarketSource> = client.clone();
        let reasoning: Arc<dyn ReasoningProvider> = client;
        (market, reasoning)
    } else {
        info!("LLM provider disabled, using offline fallbacks");
        let offline = Arc::new(OfflineProvider);
        let market: Arc<dyn MarketSource> = offline.clone();
        let reasoning: Arc<dyn ReasoningProvider> = offline;
        (market, reasoning)
    }
}

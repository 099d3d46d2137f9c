//! AuthorMaps HTTP Gateway
//!
//! Serves co-author maps built from PubMed.
//! Handles:
//! - Name parsing and validation
//! - Co-author map, shared publication and image endpoints
//! - Observability (logging, metrics, tracing)

mod handlers;

use authormaps_common::{
    config::AppConfig,
    metrics::{self, METRICS_PREFIX, PIPELINE_BUCKETS},
    telemetry, PubMedSource, PublicationSource,
};
use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<dyn PublicationSource>,
    pub metrics: PrometheusHandle,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Gateway logs are always structured
    let mut observability = config.observability.clone();
    observability.json_logging = true;
    let _telemetry = telemetry::init(&observability)?;

    info!("Starting AuthorMaps Gateway v{}", authormaps_common::VERSION);

    // Install the Prometheus recorder before describing metrics
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_pipeline_duration_seconds", METRICS_PREFIX)),
            PIPELINE_BUCKETS,
        )?
        .install_recorder()?;
    metrics::register_metrics();

    let source = PubMedSource::from_config(&config)?;
    info!(cache_dir = %source.cache().dir().display(), "Publication cache ready");

    let config = Arc::new(config);
    let state = AppState {
        config: config.clone(),
        source: Arc::new(source),
        metrics: handle,
    };

    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let api_routes = Router::new()
        .route("/authormaps", post(handlers::authormaps::create_map))
        .route("/authormaps/image", get(handlers::authormaps::map_image))
        .route("/shared-publications", get(handlers::authormaps::shared_publications));

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(state.config.request_timeout()))
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}

//! RangeGraph API Server implementation
//!
//! HTTP REST API server using Axum. Workbooks are uploaded as raw bytes and
//! analyzed in memory; nothing is written to disk.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::core::{AnalysisCache, RuleAnnotator, DEFAULT_CACHE_CAPACITY};
use crate::error::RangeGraphResult;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted workbook upload
    pub max_upload_bytes: usize,
    /// Analyses kept in memory; zero disables the cache
    pub max_cached_analyses: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 20 * 1024 * 1024,
            max_cached_analyses: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub version: String,
    /// Analyses of previously uploaded workbooks, keyed by content hash
    pub cache: Mutex<AnalysisCache>,
    pub annotator: RuleAnnotator,
}

impl AppState {
    pub fn new(config: &ApiConfig) -> RangeGraphResult<Self> {
        Ok(Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache: Mutex::new(AnalysisCache::with_capacity(config.max_cached_analyses)),
            annotator: RuleAnnotator::new()?,
        })
    }
}

/// Build the router with all endpoints and middleware
pub fn router(state: Arc<AppState>, config: &ApiConfig) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Core API endpoints
        .route("/api/v1/analyze", post(handlers::analyze))
        .route("/api/v1/translate", post(handlers::translate))
        // State and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rangegraph=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::new(&config)?);
    let app = router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📊 RangeGraph API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/analyze, /api/v1/translate");
    info!("   Health: /health, Version: /version");
    info!("   Cache: {} analyses", config.max_cached_analyses);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("RangeGraph API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

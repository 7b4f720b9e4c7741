//! Optical Retail Reporting - Backend Server
//!
//! Derives GST, profit/loss, incentive and sales reports for an eyewear
//! retail chain from the order records served by the ERP API.

use axum::{routing::get, Router};
use shared::{is_standard_gst_slab, validate_gst_rate, DerivationConfig};
use std::{net::SocketAddr, sync::Arc};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;

use crate::external::ErpClient;
use crate::services::ReportingService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub reporting: ReportingService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reports_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Optical Retail Reporting Server");
    tracing::info!("Environment: {}", config.environment);

    validate_gst_rate(config.reports.default_gst_rate)
        .map_err(|msg| anyhow::anyhow!("reports.default_gst_rate: {}", msg))?;
    if !is_standard_gst_slab(config.reports.default_gst_rate) {
        tracing::warn!(
            rate = %config.reports.default_gst_rate,
            "Default GST rate is not a standard slab"
        );
    }

    // Upstream ERP client
    let erp = ErpClient::new(&config.erp)?;
    tracing::info!("ERP API at {}", config.erp.base_url);

    let reporting = ReportingService::new(
        erp,
        DerivationConfig {
            default_gst_rate: config.reports.default_gst_rate,
        },
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        reporting,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Optical Retail Reporting API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

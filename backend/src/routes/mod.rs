//! Route definitions for the Optical Retail Reporting service

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Report derivation and export
        .nest("/reports", report_routes())
}

/// Report routes; the session token is forwarded to the ERP per request
fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_reports))
        .route("/:kind", get(handlers::get_report))
}

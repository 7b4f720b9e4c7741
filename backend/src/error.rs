//! Error handling for the Optical Retail Reporting service
//!
//! Provides consistent JSON error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::ReportError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Unknown report: {0}")]
    UnknownReport(String),

    // Upstream ERP errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("ERP request rejected: {0}")]
    UpstreamRejected(String),

    #[error("ERP unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("ERP returned an unreadable response: {0}")]
    UpstreamMalformed(String),

    // Internal errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ReportError> for AppError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidJson(e) => AppError::UpstreamMalformed(e.to_string()),
            ReportError::UnknownReportKind(kind) => AppError::UnknownReport(kind),
            ReportError::InvalidDateRange(msg) => AppError::Validation {
                field: "date_range".to_string(),
                message: msg.to_string(),
            },
            ReportError::Unsuccessful(msg) => AppError::UpstreamRejected(msg),
            ReportError::NoSession => {
                AppError::Unauthorized("No active session".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::Validation {
            field,
            message: errors.to_string(),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        let detail = |code: &str, message: String, field: Option<String>| ErrorDetail {
            code: code.to_string(),
            message,
            field,
        };

        match self {
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                detail("VALIDATION_ERROR", message.clone(), Some(field.clone())),
            ),
            AppError::UnknownReport(kind) => (
                StatusCode::NOT_FOUND,
                detail("UNKNOWN_REPORT", format!("Report '{}' does not exist", kind), None),
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                detail("UNAUTHORIZED", msg.clone(), None),
            ),
            AppError::UpstreamRejected(msg) => (
                StatusCode::BAD_GATEWAY,
                detail("UPSTREAM_REJECTED", msg.clone(), None),
            ),
            AppError::UpstreamUnavailable(msg) => (
                StatusCode::BAD_GATEWAY,
                detail("UPSTREAM_UNAVAILABLE", format!("ERP service error: {}", msg), None),
            ),
            AppError::UpstreamMalformed(_) => (
                StatusCode::BAD_GATEWAY,
                detail(
                    "UPSTREAM_MALFORMED",
                    "ERP service returned an unreadable response".to_string(),
                    None,
                ),
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail("CONFIGURATION_ERROR", format!("Configuration error: {}", msg), None),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                detail("INTERNAL_ERROR", msg.clone(), None),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Error: {:?}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::Validation {
                    field: "page".into(),
                    message: "x".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (AppError::UnknownReport("cashbook".into()), StatusCode::NOT_FOUND),
            (AppError::Unauthorized("expired".into()), StatusCode::UNAUTHORIZED),
            (AppError::UpstreamRejected("no".into()), StatusCode::BAD_GATEWAY),
            (AppError::UpstreamUnavailable("down".into()), StatusCode::BAD_GATEWAY),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            assert_eq!(error.status_and_detail().0, expected);
        }
    }

    #[test]
    fn test_report_error_conversion() {
        let err: AppError = ReportError::Unsuccessful("Store not found".into()).into();
        assert!(matches!(err, AppError::UpstreamRejected(ref m) if m == "Store not found"));

        let err: AppError = ReportError::InvalidDateRange("reversed").into();
        let (status, detail) = err.status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail.field.as_deref(), Some("date_range"));
    }
}

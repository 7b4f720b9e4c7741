//! Errors raised at the derivation boundary

use thiserror::Error;

/// Errors from parsing API documents and preparing reports
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid JSON document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unknown report kind: {0}")]
    UnknownReportKind(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(&'static str),

    #[error("API request unsuccessful: {0}")]
    Unsuccessful(String),

    #[error("No active session")]
    NoSession,
}

pub type ReportResult<T> = Result<T, ReportError>;

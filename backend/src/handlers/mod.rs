//! HTTP handlers

pub mod health;
pub mod reporting;

pub use health::health_check;
pub use reporting::{get_report, list_reports};

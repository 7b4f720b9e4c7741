//! Business logic services for the Optical Retail Reporting service

pub mod reporting;

pub use reporting::ReportingService;

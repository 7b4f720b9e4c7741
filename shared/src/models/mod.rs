//! Domain models for the Optical Retail Reporting platform

mod order;
mod report;

pub use order::*;
pub use report::*;

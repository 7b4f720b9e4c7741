//! Shared types and report derivation for the Optical Retail Reporting platform
//!
//! This crate contains the order models, the report derivation engine and the
//! client-state helpers shared between the backend, the dashboard (via WASM),
//! and other components of the system.

pub mod error;
pub mod models;
pub mod numeric;
pub mod report;
pub mod request;
pub mod session;
pub mod types;
pub mod validation;

pub use error::*;
pub use models::*;
pub use report::*;
pub use request::*;
pub use session::*;
pub use types::*;
pub use validation::*;

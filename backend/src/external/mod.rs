//! External API integrations

pub mod erp;

pub use erp::ErpClient;

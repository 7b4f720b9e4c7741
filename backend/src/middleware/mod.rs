//! Request middleware and extractors

pub mod session;

pub use session::SessionToken;

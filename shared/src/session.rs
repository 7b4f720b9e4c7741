//! Session context: set at login, read everywhere, cleared at logout or on 401

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::models::StoreRef;

/// HTTP status that ends a session
pub const UNAUTHORIZED_STATUS: u16 = 401;

/// The signed-in user and their default store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    pub token: String,
    #[serde(default)]
    pub default_store: Option<StoreRef>,
}

/// Single owner of the current session
#[derive(Debug, Default)]
pub struct SessionStore {
    current: Option<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session after login, replacing any previous one
    pub fn begin(&mut self, session: Session) {
        self.current = Some(session);
    }

    /// Clear the session (logout)
    pub fn end(&mut self) -> Option<Session> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn require(&self) -> ReportResult<&Session> {
        self.current.as_ref().ok_or(ReportError::NoSession)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn default_store(&self) -> Option<&StoreRef> {
        self.current.as_ref().and_then(|s| s.default_store.as_ref())
    }

    /// Feed an API response status; a 401 ends the session. Returns true if it did.
    pub fn observe_status(&mut self, status: u16) -> bool {
        if status == UNAUTHORIZED_STATUS && self.current.is_some() {
            self.current = None;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user_id: "u1".to_string(),
            user_name: Some("Meera".to_string()),
            token: "jwt".to_string(),
            default_store: Some(StoreRef {
                id: Some("s1".to_string()),
                name: Some("Andheri".to_string()),
            }),
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut store = SessionStore::new();
        assert!(store.require().is_err());

        store.begin(session());
        assert_eq!(store.token(), Some("jwt"));
        assert_eq!(
            store.default_store().and_then(|s| s.id.as_deref()),
            Some("s1")
        );

        assert!(store.end().is_some());
        assert!(store.current().is_none());
    }

    #[test]
    fn test_unauthorized_clears() {
        let mut store = SessionStore::new();
        store.begin(session());
        assert!(!store.observe_status(200));
        assert!(store.current().is_some());
        assert!(store.observe_status(401));
        assert!(store.current().is_none());
        assert!(!store.observe_status(401));
    }
}

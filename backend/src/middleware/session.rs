//! Session token extraction
//!
//! The reporting service does not authenticate users itself. It forwards the
//! caller's bearer token to the ERP, which decides whether the session is valid.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};

use crate::error::{ErrorDetail, ErrorResponse};

/// Bearer token of the calling dashboard session, if one was sent
#[derive(Clone, Debug, Default)]
pub struct SessionToken(pub Option<String>);

impl SessionToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Pull the token out of an `Authorization: Bearer ...` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(SessionToken(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(bearer_token)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "UNAUTHORIZED".to_string(),
                        message: "Malformed Authorization header".to_string(),
                        field: None,
                    },
                };
                (StatusCode::UNAUTHORIZED, Json(error))
            })?;

        Ok(SessionToken(Some(token.to_string())))
    }
}

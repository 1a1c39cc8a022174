//! Session extractor
//!
//! Every authenticated endpoint takes the opaque session id as a
//! `?session_id=…` query parameter; this extractor pulls it out of the
//! request so handlers can stay declarative.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::Deserialize;

use crate::response::ApiError;

/// The session id from the request's query string.
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

#[derive(Deserialize)]
struct SessionQuery {
    session_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = axum::extract::Query::<SessionQuery>::try_from_uri(&parts.uri)
            .map_err(|_| ApiError::MissingSession)?;
        if query.session_id.is_empty() {
            return Err(ApiError::MissingSession);
        }
        Ok(SessionId(query.0.session_id))
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl SessionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

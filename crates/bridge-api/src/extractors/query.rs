//! Validated query extractors
//!
//! Query-string counterparts of [`super::ValidatedJson`], plus the two
//! pagination parameter sets the API uses.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use crate::response::ApiError;

/// Query extractor that runs `validator` rules after deserialization.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = axum::extract::Query::<T>::try_from_uri(&parts.uri)
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;
        query.0.validate()?;
        Ok(ValidatedQuery(query.0))
    }
}

/// Query parameters for the dialog listing.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DialogsQuery {
    /// Number of dialogs to fetch.
    #[serde(default = "default_dialogs_limit")]
    #[validate(range(min = 1, max = 500))]
    pub limit: i32,
}

/// Query parameters for message history.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HistoryQuery {
    /// Number of messages to fetch.
    #[serde(default = "default_history_limit")]
    #[validate(range(min = 1, max = 200))]
    pub limit: i32,
    /// Only messages older than this id are returned; 0 starts at the top.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset_id: i32,
}

fn default_dialogs_limit() -> i32 {
    100
}

fn default_history_limit() -> i32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialogs_query_defaults() {
        let query: DialogsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 100);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_history_query_defaults() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 50);
        assert_eq!(query.offset_id, 0);
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_limits_are_bounded() {
        let query = DialogsQuery { limit: 501 };
        assert!(query.validate().is_err());

        let query = HistoryQuery {
            limit: 0,
            offset_id: 0,
        };
        assert!(query.validate().is_err());
    }
}

//! Application error types
//!
//! Unified error handling for the entire application.

use serde::Serialize;
use std::fmt;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Session errors
    #[error("Session not found")]
    SessionNotFound,

    #[error("Session is not authorized: {0}")]
    NotAuthorized(String),

    #[error("No login code was requested for this session")]
    NoPendingLogin,

    #[error("No pending two-factor challenge for this session")]
    NoPendingPassword,

    // Sign-in errors
    #[error("Invalid or expired login code")]
    InvalidCode,

    #[error("Phone number is not registered with Telegram")]
    SignUpRequired,

    // Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Resource errors
    #[error("Resource not found: {0}")]
    NotFound(String),

    // Telegram upstream errors
    #[error("Telegram asked to wait {0} seconds")]
    FloodWait(u64),

    #[error("Telegram error {code}: {message}")]
    Telegram { code: i32, message: String },

    #[error("Upstream failure: {0}")]
    Upstream(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Internal errors
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Get HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::Validation(_)
            | Self::InvalidInput(_)
            | Self::InvalidCode
            | Self::SignUpRequired
            | Self::NoPendingLogin
            | Self::NoPendingPassword => 400,

            // 401 Unauthorized
            Self::SessionNotFound | Self::NotAuthorized(_) => 401,

            // 404 Not Found
            Self::NotFound(_) => 404,

            // 429 Too Many Requests
            Self::FloodWait(_) => 429,

            // Telegram keeps its own HTTP-like client codes; anything else
            // is reported as an upstream failure
            Self::Telegram { code, .. } => {
                if (400..=499).contains(code) {
                    *code as u16
                } else {
                    502
                }
            }
            Self::Upstream(_) => 502,

            // 500 Internal Server Error
            Self::Io(_) | Self::Config(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::NotAuthorized(_) => "NOT_AUTHORIZED",
            Self::NoPendingLogin => "NO_PENDING_LOGIN",
            Self::NoPendingPassword => "NO_PENDING_2FA",
            Self::InvalidCode => "INVALID_CODE",
            Self::SignUpRequired => "SIGN_UP_REQUIRED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::FloodWait(_) => "FLOOD_WAIT",
            Self::Telegram { .. } => "TELEGRAM_ERROR",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        let status = self.status_code();
        (400..500).contains(&status)
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        let status = self.status_code();
        (500..600).contains(&status)
    }

    /// Create a not found error for a resource type
    #[must_use]
    pub fn not_found(resource: impl fmt::Display) -> Self {
        Self::NotFound(resource.to_string())
    }

    /// Create a validation error
    #[must_use]
    pub fn validation(msg: impl fmt::Display) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create an upstream error from any error
    #[must_use]
    pub fn upstream(err: impl fmt::Display) -> Self {
        Self::Upstream(err.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Error response structure for API responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            details: None,
        }
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from(&err)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::SessionNotFound.status_code(), 401);
        assert_eq!(AppError::InvalidCode.status_code(), 400);
        assert_eq!(AppError::NotFound("chat".to_string()).status_code(), 404);
        assert_eq!(AppError::FloodWait(30).status_code(), 429);
        assert_eq!(AppError::Upstream("net down".to_string()).status_code(), 502);
        assert_eq!(AppError::Config("bad".to_string()).status_code(), 500);
    }

    #[test]
    fn test_telegram_status_passthrough() {
        let forbidden = AppError::Telegram {
            code: 403,
            message: "CHAT_WRITE_FORBIDDEN".to_string(),
        };
        assert_eq!(forbidden.status_code(), 403);

        let server_side = AppError::Telegram {
            code: 500,
            message: "INTERNAL".to_string(),
        };
        assert_eq!(server_side.status_code(), 502);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::SessionNotFound.error_code(), "SESSION_NOT_FOUND");
        assert_eq!(AppError::InvalidCode.error_code(), "INVALID_CODE");
        assert_eq!(AppError::FloodWait(5).error_code(), "FLOOD_WAIT");
    }

    #[test]
    fn test_is_client_error() {
        assert!(AppError::SessionNotFound.is_client_error());
        assert!(AppError::NotFound("test".to_string()).is_client_error());
        assert!(!AppError::Upstream("test".to_string()).is_client_error());
    }

    #[test]
    fn test_is_server_error() {
        assert!(!AppError::InvalidCode.is_server_error());
        assert!(AppError::Config("test".to_string()).is_server_error());
    }

    #[test]
    fn test_error_response() {
        let err = AppError::NotFound("chat".to_string());
        let response = ErrorResponse::from(&err);

        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found: chat");
        assert!(response.details.is_none());
    }

    #[test]
    fn test_helper_methods() {
        let err = AppError::not_found("chat 123");
        assert_eq!(err.to_string(), "Resource not found: chat 123");

        let err = AppError::validation("phone is required");
        assert_eq!(err.to_string(), "Validation error: phone is required");
    }
}

//! Auth handlers
//!
//! Phone login, 2FA, session restore, logout, and the current-user lookup.

use axum::{extract::State, Json};
use bridge_telegram::{AuthService, SignInOutcome, UserProfile};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::extractors::{SessionId, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SendCodeRequest {
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct SendCodeResponse {
    pub session_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(length(min = 1, message = "session_id is required"))]
    pub session_id: String,
    #[validate(length(min = 1, message = "code is required"))]
    pub code: String,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TwoFactorRequest {
    #[validate(length(min = 1, message = "session_id is required"))]
    pub session_id: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInResponse {
    pub success: bool,
    pub needs_2fa: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

impl From<SignInOutcome> for SignInResponse {
    fn from(outcome: SignInOutcome) -> Self {
        match outcome {
            SignInOutcome::Complete {
                session_string,
                user,
            } => Self {
                success: true,
                needs_2fa: false,
                session_string: Some(session_string),
                user: Some(user),
            },
            SignInOutcome::TwoFactorRequired => Self {
                success: false,
                needs_2fa: true,
                session_string: None,
                user: None,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RestoreSessionRequest {
    #[validate(length(min = 1, message = "session_string is required"))]
    pub session_string: String,
}

#[derive(Debug, Serialize)]
pub struct RestoreSessionResponse {
    pub success: bool,
    pub session_id: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Request a login code
///
/// POST /api/auth/send-code
pub async fn send_code(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendCodeRequest>,
) -> ApiResult<Json<SendCodeResponse>> {
    let service = AuthService::new(state.context());
    let session_id = service.send_code(request.phone.trim()).await?;
    Ok(Json(SendCodeResponse { session_id }))
}

/// Sign in with the received code (and optionally the 2FA password)
///
/// POST /api/auth/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignInRequest>,
) -> ApiResult<Json<SignInResponse>> {
    let service = AuthService::new(state.context());
    let outcome = service
        .sign_in(
            &request.session_id,
            request.code.trim(),
            request.password.as_deref(),
        )
        .await?;
    Ok(Json(outcome.into()))
}

/// Complete a pending 2FA challenge
///
/// POST /api/auth/sign-in-2fa
pub async fn sign_in_2fa(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<TwoFactorRequest>,
) -> ApiResult<Json<SignInResponse>> {
    let service = AuthService::new(state.context());
    let outcome = service
        .sign_in_2fa(&request.session_id, &request.password)
        .await?;
    Ok(Json(outcome.into()))
}

/// Restore a session from a saved session string
///
/// POST /api/auth/restore-session
pub async fn restore_session(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RestoreSessionRequest>,
) -> ApiResult<Json<RestoreSessionResponse>> {
    let service = AuthService::new(state.context());
    let (session_id, user) = service.restore_session(&request.session_string).await?;
    Ok(Json(RestoreSessionResponse {
        success: true,
        session_id,
        user,
    }))
}

/// Logout and erase the session
///
/// POST /api/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    session_id: SessionId,
) -> ApiResult<Json<SuccessResponse>> {
    let service = AuthService::new(state.context());
    service.logout(session_id.as_str()).await?;
    Ok(Json(SuccessResponse { success: true }))
}

/// Current user info
///
/// GET /api/auth/me
pub async fn get_me(
    State(state): State<AppState>,
    session_id: SessionId,
) -> ApiResult<Json<UserProfile>> {
    let service = AuthService::new(state.context());
    let user = service.me(session_id.as_str()).await?;
    Ok(Json(user))
}

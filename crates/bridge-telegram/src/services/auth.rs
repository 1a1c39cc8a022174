//! Auth service
//!
//! Phone login (code + optional 2FA), session restore, logout, and the
//! current-user lookup. The wrapped library's challenge tokens are opaque,
//! so both challenges live server-side in the registry, keyed by session id.

use bridge_common::{AppError, AppResult};
use layer_client::SignInError;
use tracing::{info, instrument};

use crate::context::BridgeContext;
use crate::error::{map_invocation, map_sign_in};
use crate::format;
use crate::types::UserProfile;

/// Result of a sign-in attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    /// Fully signed in; the session is persisted.
    Complete {
        session_string: String,
        user: UserProfile,
    },
    /// The account has 2FA enabled and no password was supplied.
    TwoFactorRequired,
}

/// Auth service
pub struct AuthService<'a> {
    ctx: &'a BridgeContext,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a BridgeContext) -> Self {
        Self { ctx }
    }

    /// Start a login: connect a fresh client and request a login code.
    ///
    /// Returns the new session id; the code challenge stays server-side.
    #[instrument(skip(self, phone))]
    pub async fn send_code(&self, phone: &str) -> AppResult<String> {
        let (session_id, client) = self.ctx.registry().create_session().await?;

        match client.request_login_code(phone).await {
            Ok(token) => {
                self.ctx
                    .registry()
                    .stash_login(&session_id, phone.to_string(), token);
                info!(session_id = %session_id, "Login code requested");
                Ok(session_id)
            }
            Err(e) => {
                // The half-created session is useless without a pending code.
                self.ctx.registry().disconnect(&session_id);
                Err(map_invocation(e))
            }
        }
    }

    /// Complete the code challenge, optionally finishing 2FA in one call.
    #[instrument(skip(self, code, password))]
    pub async fn sign_in(
        &self,
        session_id: &str,
        code: &str,
        password: Option<&str>,
    ) -> AppResult<SignInOutcome> {
        let client = self.ctx.registry().require(session_id)?;
        let (phone, token) = self
            .ctx
            .registry()
            .take_login(session_id)
            .ok_or(AppError::NoPendingLogin)?;

        match client.sign_in(&token, code).await {
            Ok(_) => self.finalize(session_id, Some(phone)).await,
            Err(SignInError::PasswordRequired(password_token)) => match password {
                Some(password) => {
                    client
                        .check_password(*password_token, password)
                        .await
                        .map_err(map_invocation)?;
                    self.finalize(session_id, Some(phone)).await
                }
                None => {
                    self.ctx
                        .registry()
                        .stash_password(session_id, Some(phone), *password_token);
                    Ok(SignInOutcome::TwoFactorRequired)
                }
            },
            Err(SignInError::InvalidCode) => {
                // The code challenge survives a wrong code; let the user retry.
                self.ctx.registry().stash_login(session_id, phone, token);
                Err(AppError::InvalidCode)
            }
            Err(e) => Err(map_sign_in(e)),
        }
    }

    /// Complete a previously-stashed 2FA challenge.
    #[instrument(skip(self, password))]
    pub async fn sign_in_2fa(&self, session_id: &str, password: &str) -> AppResult<SignInOutcome> {
        let client = self.ctx.registry().require(session_id)?;
        let (phone, token) = self
            .ctx
            .registry()
            .take_password(session_id)
            .ok_or(AppError::NoPendingPassword)?;

        client
            .check_password(token, password)
            .await
            .map_err(map_invocation)?;
        self.finalize(session_id, phone).await
    }

    /// Materialize a new session from a saved session string.
    #[instrument(skip(self, session_string))]
    pub async fn restore_session(
        &self,
        session_string: &str,
    ) -> AppResult<(String, UserProfile)> {
        let session_id = crate::registry::ClientRegistry::generate_session_id();
        self.ctx.store().import_string(&session_id, session_string)?;

        let client = match self.ctx.registry().connect(&session_id).await {
            Ok(client) => client,
            Err(e) => {
                self.ctx.store().remove(&session_id).ok();
                return Err(e);
            }
        };

        let authorized = client.is_authorized().await.unwrap_or(false);
        if !authorized {
            self.ctx.registry().remove(&session_id).ok();
            return Err(AppError::NotAuthorized(
                "session expired or invalid".to_string(),
            ));
        }

        self.ctx.store().insert(&session_id, None)?;
        let me = client.get_me().await.map_err(map_invocation)?;
        let profile = format::user_profile(&me);
        self.ctx.directory().insert_user(&me);
        info!(session_id = %session_id, "Session restored");
        Ok((session_id, profile))
    }

    /// Sign out and erase every trace of the session.
    #[instrument(skip(self))]
    pub async fn logout(&self, session_id: &str) -> AppResult<()> {
        let client = self.ctx.registry().get_or_restore(session_id).await?;
        client.sign_out().await.map_err(map_invocation)?;
        self.ctx.registry().remove(session_id)?;
        info!(session_id = %session_id, "Logged out");
        Ok(())
    }

    /// Profile of the logged-in account.
    #[instrument(skip(self))]
    pub async fn me(&self, session_id: &str) -> AppResult<UserProfile> {
        let client = self.ctx.registry().require(session_id)?;
        let me = client.get_me().await.map_err(map_invocation)?;
        self.ctx.directory().insert_user(&me);
        Ok(format::user_profile(&me))
    }

    /// Persist the authorized session and produce the sign-in response.
    async fn finalize(
        &self,
        session_id: &str,
        phone: Option<String>,
    ) -> AppResult<SignInOutcome> {
        let client = self.ctx.registry().require(session_id)?;
        client.save_session().await.map_err(map_invocation)?;
        self.ctx.store().insert(session_id, phone)?;

        let me = client.get_me().await.map_err(map_invocation)?;
        let user = format::user_profile(&me);
        self.ctx.directory().insert_user(&me);

        let session_string = self.ctx.store().export_string(session_id)?;
        info!(session_id = %session_id, user_id = me.id, "Signed in");
        Ok(SignInOutcome::Complete {
            session_string,
            user,
        })
    }
}

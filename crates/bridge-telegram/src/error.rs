//! Mapping from `layer-client` errors into the application error type.

use bridge_common::AppError;
use layer_client::{InvocationError, SignInError};

/// Convert a library invocation error into an `AppError`.
///
/// FLOOD_WAIT becomes a 429 with the wait time; RPC errors keep their
/// HTTP-like code; transport/deserialize failures become upstream errors.
pub fn map_invocation(err: InvocationError) -> AppError {
    if let Some(seconds) = err.flood_wait_seconds() {
        return AppError::FloodWait(seconds);
    }
    match err {
        InvocationError::Rpc(rpc) => AppError::Telegram {
            code: rpc.code,
            message: rpc.name,
        },
        other => AppError::upstream(other),
    }
}

/// Convert a sign-in error into an `AppError`.
///
/// `PasswordRequired` is intentionally not handled here: the auth service
/// intercepts it before this mapping to stash the 2FA challenge token.
pub fn map_sign_in(err: SignInError) -> AppError {
    match err {
        SignInError::InvalidCode => AppError::InvalidCode,
        SignInError::SignUpRequired => AppError::SignUpRequired,
        SignInError::Other(e) => map_invocation(e),
        SignInError::PasswordRequired(_) => AppError::upstream("unhandled two-factor challenge"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_client::RpcError;

    #[test]
    fn test_flood_wait_maps_to_429() {
        let err = InvocationError::Rpc(RpcError::from_telegram(420, "FLOOD_WAIT_30"));
        match map_invocation(err) {
            AppError::FloodWait(seconds) => assert_eq!(seconds, 30),
            other => panic!("expected FloodWait, got {other:?}"),
        }
    }

    #[test]
    fn test_rpc_keeps_code_and_name() {
        let err = InvocationError::Rpc(RpcError::from_telegram(403, "CHAT_WRITE_FORBIDDEN"));
        match map_invocation(err) {
            AppError::Telegram { code, message } => {
                assert_eq!(code, 403);
                assert_eq!(message, "CHAT_WRITE_FORBIDDEN");
            }
            other => panic!("expected Telegram, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_errors_are_upstream() {
        let err = InvocationError::Dropped;
        assert!(matches!(map_invocation(err), AppError::Upstream(_)));
    }

    #[test]
    fn test_sign_in_mappings() {
        assert!(matches!(map_sign_in(SignInError::InvalidCode), AppError::InvalidCode));
        assert!(matches!(map_sign_in(SignInError::SignUpRequired), AppError::SignUpRequired));
    }
}

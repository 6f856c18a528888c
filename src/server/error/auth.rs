use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{config::ConfigError, provider::ProviderError},
};

const MESSAGE_NOT_CONFIGURED: &str =
    "Discord login is not configured properly. Contact site administrator.";
const MESSAGE_CANCELLED: &str = "You could not be authenticated.";
const MESSAGE_CSRF: &str = "Discord login failed. Invalid OAuth2 state.";
const MESSAGE_PROVIDER: &str =
    "Discord login failed, could not load Discord profile. Contact site administrator.";

#[derive(Error, Debug)]
pub enum AuthError {
    /// Client credentials are missing from the settings store.
    ///
    /// Ends the login flow before any redirect URL is built or any provider call is
    /// made.
    #[error("Discord login is not configured: {0}")]
    NotConfigured(#[source] ConfigError),

    /// User declined consent on Discord (`error=access_denied` on the callback).
    #[error("User declined Discord authorization")]
    UserCancelled,

    /// CSRF state validation failed during OAuth callback.
    ///
    /// The state in the callback URL is missing or does not match the value stored in
    /// the session when the flow was initiated, indicating a potential CSRF attack or a
    /// stale callback.
    #[error("Failed to login user due to CSRF state mismatch")]
    CsrfValidationFailed,

    /// Authorization code could not be exchanged for an access token.
    #[error("Failed to exchange authorization code: {0}")]
    TokenExchange(#[source] ProviderError),

    /// Discord profile could not be fetched or parsed.
    #[error("Failed to fetch Discord profile: {0}")]
    ProfileFetch(#[source] ProviderError),

    /// Admin code supplied at login is wrong or expired.
    #[error("Invalid or expired admin code")]
    InvalidAdminCode,

    /// No user ID stored in the session.
    #[error("User not found in session")]
    UserNotInSession,

    /// Session references a user that no longer exists.
    #[error("User {0} from session not found in database")]
    UserNotInDatabase(i32),

    /// User lacks a required permission.
    #[error("Access denied for user {0}: {1}")]
    AccessDenied(i32, String),
}

impl AuthError {
    /// Whether this error ends a login flow.
    ///
    /// Login failures are answered with a redirect to the login page and a queued
    /// message instead of an error response.
    pub fn is_login_failure(&self) -> bool {
        matches!(
            self,
            Self::NotConfigured(_)
                | Self::UserCancelled
                | Self::CsrfValidationFailed
                | Self::TokenExchange(_)
                | Self::ProfileFetch(_)
                | Self::InvalidAdminCode
        )
    }

    /// Message safe to show to the end user.
    ///
    /// Never includes provider error text.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotConfigured(_) => MESSAGE_NOT_CONFIGURED,
            Self::UserCancelled => MESSAGE_CANCELLED,
            Self::CsrfValidationFailed => MESSAGE_CSRF,
            Self::TokenExchange(_) | Self::ProfileFetch(_) => MESSAGE_PROVIDER,
            Self::InvalidAdminCode => "The admin code is invalid or has expired.",
            Self::UserNotInSession | Self::UserNotInDatabase(_) => "You are not logged in.",
            Self::AccessDenied(_, _) => "You do not have permission to access this page.",
        }
    }
}

/// Converts authentication errors into HTTP responses.
///
/// - `UserNotInSession` / `UserNotInDatabase` → 401 Unauthorized
/// - `AccessDenied` → 403 Forbidden
/// - Login failures → 400 Bad Request with the generic user message
///
/// Client-facing messages come from `user_message` so provider detail never leaks.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => StatusCode::UNAUTHORIZED,
            Self::AccessDenied(_, _) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        };

        (
            status,
            Json(ErrorDto {
                error: self.user_message().to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_detail_never_reaches_user_message() {
        let err = AuthError::TokenExchange(ProviderError::TokenRequest(
            "invalid_grant: code expired".to_string(),
        ));

        assert!(err.is_login_failure());
        assert!(!err.user_message().contains("invalid_grant"));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[test]
    fn access_errors_are_not_login_failures() {
        assert!(!AuthError::UserNotInSession.is_login_failure());
        assert!(!AuthError::AccessDenied(1, "admin".to_string()).is_login_failure());
    }
}

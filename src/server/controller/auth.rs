use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::server::{
    data::user::UserRepository,
    error::{auth::AuthError, AppError},
    middleware::session::{AuthSession, FlowSession, MessageSession},
    service::{
        auth::{AuthFlowService, CallbackParam, InitiateParam},
        identity::IdentityService,
        settings::SettingsService,
    },
    state::AppState,
};

/// Query parameters for `GET /login/initiate`.
#[derive(Deserialize)]
pub struct InitiateQuery {
    /// Local path to return to after login.
    pub destination: Option<String>,
    /// One-time code granting admin to the account that logs in.
    pub admin_code: Option<String>,
}

/// Query parameters Discord sends to `GET /login/callback`.
#[derive(Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set when authorization did not succeed, e.g. `access_denied`.
    pub error: Option<String>,
}

/// GET /login/initiate - Start a Discord login
///
/// An admin code is only checked here; it is consumed once the callback succeeds.
///
/// # Returns
/// - `307 Temporary Redirect`: To the Discord consent screen
/// - `307 Temporary Redirect`: To the login page with a queued message when Discord
///   login is not configured or the admin code is invalid
pub async fn initiate(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<InitiateQuery>,
) -> Result<Response, AppError> {
    if let Some(code) = query.admin_code.as_deref() {
        if !state.admin_code_service.is_valid(code).await {
            tracing::warn!("Login initiated with an invalid or expired admin code");
            FlowSession::new(&session).clear().await?;
            return login_failure(&state, &session, AuthError::InvalidAdminCode.into()).await;
        }
    }

    let settings = SettingsService::new(&state.db);
    let binder = IdentityService::new(&state.db);
    let flow = AuthFlowService::new(
        &settings,
        state.provider.as_ref(),
        &binder,
        FlowSession::new(&session),
        &state.redirect_uri,
    );

    let result = flow
        .initiate(InitiateParam {
            destination: query.destination.filter(|d| is_local_path(d)),
            admin_code: query.admin_code,
        })
        .await;

    match result {
        Ok(url) => Ok(Redirect::temporary(url.as_str()).into_response()),
        Err(e) => login_failure(&state, &session, e).await,
    }
}

/// GET /login/callback - Complete a Discord login
///
/// # Returns
/// - `307 Temporary Redirect`: To the pending destination (default `/`) once logged in
/// - `307 Temporary Redirect`: To the login page with a queued message on any login
///   failure
/// - `500 Internal Server Error`: Database or session failure
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let settings = SettingsService::new(&state.db);
    let binder = IdentityService::new(&state.db);
    let flow = AuthFlowService::new(
        &settings,
        state.provider.as_ref(),
        &binder,
        FlowSession::new(&session),
        &state.redirect_uri,
    );

    let result = flow
        .callback(CallbackParam {
            code: query.code,
            state: query.state,
            error: query.error,
        })
        .await;

    let login = match result {
        Ok(login) => login,
        Err(e) => return login_failure(&state, &session, e).await,
    };

    if let Some(code) = login.admin_code.as_deref() {
        if state.admin_code_service.validate_and_consume(code).await {
            UserRepository::new(&state.db)
                .set_admin(login.user.id, true)
                .await?;
            tracing::info!("User {} has been set as admin", login.user.id);
        } else {
            tracing::warn!(
                "Admin code expired or was used before user {} finished logging in",
                login.user.id
            );
        }
    }

    AuthSession::new(&session).login(login.user.id).await?;

    let destination = login.destination.unwrap_or_else(|| "/".to_string());
    Ok(Redirect::temporary(&destination).into_response())
}

/// GET /login - Login page
///
/// Shows and drains the messages queued by failed logins.
pub async fn login_page(session: Session) -> Result<Html<String>, AppError> {
    let messages = MessageSession::new(&session).take_all().await?;

    Ok(Html(render_login_page(&messages)))
}

/// GET /logout - Log out
///
/// Clears the session, including any unfinished login flow.
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await;

    Ok(Redirect::temporary(&state.login_path))
}

/// Queues the user-facing message of a login failure and redirects to the login page.
///
/// Errors that are not login failures are returned unchanged.
async fn login_failure(
    state: &AppState,
    session: &Session,
    error: AppError,
) -> Result<Response, AppError> {
    match error {
        AppError::AuthErr(auth) if auth.is_login_failure() => {
            MessageSession::new(session)
                .push(auth.user_message())
                .await?;
            Ok(Redirect::temporary(&state.login_path).into_response())
        }
        other => Err(other),
    }
}

/// Accepts only same-site absolute paths as post-login destinations.
fn is_local_path(destination: &str) -> bool {
    destination.starts_with('/') && !destination.starts_with("//") && !destination.contains('\\')
}

fn render_login_page(messages: &[String]) -> String {
    let items: String = messages
        .iter()
        .map(|message| format!("<li>{}</li>", html_escape::encode_text(message)))
        .collect();
    let message_list = if items.is_empty() {
        String::new()
    } else {
        format!("<ul class=\"messages\">{}</ul>", items)
    };

    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Log in</title></head>\n<body>\n{}<a href=\"/login/initiate\">Log in with Discord</a>\n</body>\n</html>\n",
        message_list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_local_destinations_are_kept() {
        assert!(is_local_path("/"));
        assert!(is_local_path("/node/1?tab=2"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path("//evil.example/path"));
        assert!(!is_local_path("/\\evil.example"));
        assert!(!is_local_path("node/1"));
        assert!(!is_local_path(""));
    }

    #[test]
    fn login_page_escapes_messages() {
        let page = render_login_page(&["<script>alert(1)</script> & more".to_string()]);

        assert!(page.contains("<li>&lt;script&gt;alert(1)&lt;/script&gt; &amp; more</li>"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn login_page_without_messages_has_no_list() {
        let page = render_login_page(&[]);

        assert!(!page.contains("<ul"));
        assert!(page.contains("href=\"/login/initiate\""));
    }
}

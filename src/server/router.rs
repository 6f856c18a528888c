use axum::{routing::get, Router};

use crate::server::{
    config::CALLBACK_PATH,
    controller::{
        auth::{callback, initiate, login_page, logout},
        settings::{get_settings, update_settings},
        user::get_user,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/login/initiate", get(initiate))
        .route(CALLBACK_PATH, get(callback))
        .route("/logout", get(logout))
        .route("/api/auth/user", get(get_user))
        .route("/api/admin/settings", get(get_settings).put(update_settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use test_utils::{builder::TestBuilder, factory};
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};
    use url::Url;

    use crate::server::{
        error::{auth::AuthError, config::ConfigError},
        service::{admin_code::AdminCodeService, oauth::discord::DiscordProvider},
    };

    fn app(db: DatabaseConnection, admin_code_service: AdminCodeService) -> Router {
        let provider = DiscordProvider::new(
            reqwest::Client::new(),
            "https://discord.com/oauth2/authorize".to_string(),
            "https://discord.com/api/oauth2/token".to_string(),
            Url::parse("https://discord.com/api/v10/").unwrap(),
        );

        router()
            .with_state(AppState::new(
                db,
                Arc::new(provider),
                admin_code_service,
                "http://localhost:8080/login/callback".to_string(),
                "/login".to_string(),
            ))
            .layer(SessionManagerLayer::new(MemoryStore::default()))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    /// Session cookie pair from a response, without its attributes.
    fn session_cookie(response: &axum::response::Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn location(response: &axum::response::Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn initiate_redirects_to_discord() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();
        factory::settings::create_settings(&db, "client", "secret")
            .await
            .unwrap();

        let response = app(db, AdminCodeService::new())
            .oneshot(get("/login/initiate?destination=/node/1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        let url = Url::parse(location(&response)).unwrap();
        assert_eq!(url.host_str(), Some("discord.com"));
        assert!(url
            .query_pairs()
            .any(|(key, value)| key == "client_id" && value == "client"));
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn initiate_without_settings_redirects_to_login() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();

        let response = app(db, AdminCodeService::new())
            .oneshot(get("/login/initiate"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn invalid_admin_code_redirects_to_login() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();
        factory::settings::create_settings(&db, "client", "secret")
            .await
            .unwrap();

        let admin_code_service = AdminCodeService::new();
        admin_code_service.generate().await;

        let response = app(db, admin_code_service)
            .oneshot(get("/login/initiate?admin_code=wrong"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn valid_admin_code_is_kept_until_login_completes() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();
        factory::settings::create_settings(&db, "client", "secret")
            .await
            .unwrap();

        let admin_code_service = AdminCodeService::new();
        let code = admin_code_service.generate().await;

        let response = app(db, admin_code_service.clone())
            .oneshot(get(&format!("/login/initiate?admin_code={}", code)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert!(location(&response).starts_with("https://discord.com/"));
        assert!(admin_code_service.is_valid(&code).await);
    }

    #[tokio::test]
    async fn unconfigured_login_does_not_burn_admin_code() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();

        let admin_code_service = AdminCodeService::new();
        let code = admin_code_service.generate().await;

        let response = app(db, admin_code_service.clone())
            .oneshot(get(&format!("/login/initiate?admin_code={}", code)))
            .await
            .unwrap();

        assert_eq!(location(&response), "/login");
        assert!(admin_code_service.is_valid(&code).await);
    }

    #[tokio::test]
    async fn invalid_admin_code_clears_pending_flow() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();
        factory::settings::create_settings(&db, "client", "secret")
            .await
            .unwrap();

        let admin_code_service = AdminCodeService::new();
        admin_code_service.generate().await;
        let app = app(db, admin_code_service);

        let started = app.clone().oneshot(get("/login/initiate")).await.unwrap();
        let cookie = session_cookie(&started);
        let consent = Url::parse(location(&started)).unwrap();
        let (_, csrf_state) = consent
            .query_pairs()
            .find(|(key, _)| key == "state")
            .unwrap();

        let rejected = app
            .clone()
            .oneshot(get_with_cookie("/login/initiate?admin_code=wrong", &cookie))
            .await
            .unwrap();
        assert_eq!(location(&rejected), "/login");

        let callback = app
            .clone()
            .oneshot(get_with_cookie(
                &format!("/login/callback?code=abc&state={}", csrf_state),
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(location(&callback), "/login");

        let page = body_text(app.oneshot(get_with_cookie("/login", &cookie)).await.unwrap()).await;
        assert!(page.contains(
            html_escape::encode_text(AuthError::CsrfValidationFailed.user_message()).as_ref()
        ));
    }

    #[tokio::test]
    async fn callback_without_flow_redirects_to_login() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();
        factory::settings::create_settings(&db, "client", "secret")
            .await
            .unwrap();

        let response = app(db, AdminCodeService::new())
            .oneshot(get("/login/callback?code=abc&state=forged"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn anonymous_user_is_unauthorized() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();
        let app = app(db, AdminCodeService::new());

        let user = app.clone().oneshot(get("/api/auth/user")).await.unwrap();
        let settings = app.oneshot(get("/api/admin/settings")).await.unwrap();

        assert_eq!(user.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(settings.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_page_renders() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();

        let response = app(db, AdminCodeService::new())
            .oneshot(get("/login"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn login_page_shows_queued_message_once() {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.clone().unwrap();
        let app = app(db, AdminCodeService::new());

        let failed = app.clone().oneshot(get("/login/initiate")).await.unwrap();
        let cookie = session_cookie(&failed);
        let message = html_escape::encode_text(
            AuthError::NotConfigured(ConfigError::MissingCredentials).user_message(),
        )
        .to_string();

        let first = body_text(
            app.clone()
                .oneshot(get_with_cookie("/login", &cookie))
                .await
                .unwrap(),
        )
        .await;
        let second = body_text(app.oneshot(get_with_cookie("/login", &cookie)).await.unwrap()).await;

        assert!(first.contains(&message));
        assert!(!second.contains(&message));
    }
}

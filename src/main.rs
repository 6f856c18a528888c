mod model;
mod server;

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config,
    error::AppError,
    router,
    service::{admin_code::AdminCodeService, oauth::discord::DiscordProvider},
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db, &config).await?;
    let http_client = startup::setup_reqwest_client(&config)?;
    let provider = DiscordProvider::from_config(http_client, &config);

    let admin_code_service = AdminCodeService::new();

    startup::seed_settings(&db, &config).await?;
    startup::check_for_admin(&db, &config, &admin_code_service).await?;

    let app = router::router()
        .with_state(AppState::new(
            db,
            Arc::new(provider),
            admin_code_service,
            config.redirect_uri(),
            config.login_path.clone(),
        ))
        .layer(session)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("Starting server on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

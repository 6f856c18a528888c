use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::settings::UpdateSettingsDto,
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::settings::SettingsService,
        state::AppState,
    },
};

/// GET /api/admin/settings - Get the Discord client settings
///
/// # Authentication
/// Requires admin permission
///
/// # Returns
/// - `200 OK`: JSON SettingsDto including the redirect URL to register with Discord
/// - `401 Unauthorized`: Not logged in
/// - `403 Forbidden`: Not an admin
pub async fn get_settings(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let settings = SettingsService::new(&state.db)
        .get_dto(state.redirect_uri.clone())
        .await?;

    Ok((StatusCode::OK, Json(settings)))
}

/// PUT /api/admin/settings - Update the Discord client settings
///
/// # Authentication
/// Requires admin permission
///
/// # Returns
/// - `200 OK`: JSON SettingsDto as stored
/// - `400 Bad Request`: Missing credentials, scope outside the allow-list or invalid
///   API call line; nothing is stored
/// - `401 Unauthorized`: Not logged in
/// - `403 Forbidden`: Not an admin
pub async fn update_settings(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpdateSettingsDto>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthGuard::new(&state.db, &session)
        .require(&[Permission::Admin])
        .await?;

    let record = SettingsService::new(&state.db).update(payload).await?;

    tracing::info!("Discord settings updated by user {}", user.id);

    Ok((
        StatusCode::OK,
        Json(record.into_dto(state.redirect_uri.clone())),
    ))
}

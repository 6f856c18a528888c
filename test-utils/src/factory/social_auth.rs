//! Social auth factory for linking Discord identities to users.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Plugin identifier stored on every Discord identity row.
pub const DISCORD_PLUGIN_ID: &str = "social_auth_discord";

/// Creates a Discord identity for an existing user.
///
/// The token defaults to `"token_{provider_user_id}"` and the additional data to an
/// empty JSON array.
///
/// # Arguments
/// - `db` - Database connection
/// - `user_id` - Local user the identity belongs to
/// - `provider_user_id` - Discord user ID
///
/// # Returns
/// - `Ok(Model)` - The created identity entity
/// - `Err(DbErr)` - Database error during insertion
pub async fn create_social_auth(
    db: &DatabaseConnection,
    user_id: i32,
    provider_user_id: &str,
) -> Result<entity::social_auth::Model, DbErr> {
    let now = Utc::now();

    entity::social_auth::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        plugin_id: ActiveValue::Set(DISCORD_PLUGIN_ID.to_string()),
        provider_user_id: ActiveValue::Set(provider_user_id.to_string()),
        token: ActiveValue::Set(format!("token_{}", provider_user_id)),
        avatar: ActiveValue::Set(None),
        additional_data: ActiveValue::Set("[]".to_string()),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

//! Settings factory for the single Discord settings row.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Inserts the Discord settings row with the given credentials.
///
/// Scopes and API calls are left empty.
pub async fn create_settings(
    db: &DatabaseConnection,
    client_id: &str,
    client_secret: &str,
) -> Result<entity::discord_auth_settings::Model, DbErr> {
    entity::discord_auth_settings::ActiveModel {
        id: ActiveValue::Set(1),
        client_id: ActiveValue::Set(client_id.to_string()),
        client_secret: ActiveValue::Set(client_secret.to_string()),
        scopes: ActiveValue::Set(String::new()),
        api_calls: ActiveValue::Set(String::new()),
        updated_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}

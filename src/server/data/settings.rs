//! Repository for the single Discord settings row.

use chrono::Utc;
use migration::OnConflict;
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait};

use crate::server::model::settings::SettingsRecord;

/// Settings are stored as one row with a fixed primary key.
const SETTINGS_ROW_ID: i32 = 1;

pub struct SettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reads the stored settings.
    ///
    /// # Returns
    /// - `Ok(Some(SettingsRecord))` - Settings have been saved
    /// - `Ok(None)` - Nothing saved yet
    /// - `Err(DbErr)` - Database error during query
    pub async fn get(&self) -> Result<Option<SettingsRecord>, DbErr> {
        let entity = entity::prelude::DiscordAuthSettings::find_by_id(SETTINGS_ROW_ID)
            .one(self.db)
            .await?;

        Ok(entity.map(SettingsRecord::from_entity))
    }

    /// Saves the settings, replacing any stored values.
    pub async fn upsert(&self, record: SettingsRecord) -> Result<SettingsRecord, DbErr> {
        let entity = entity::prelude::DiscordAuthSettings::insert(Self::active_model(record))
            .on_conflict(
                OnConflict::column(entity::discord_auth_settings::Column::Id)
                    .update_columns([
                        entity::discord_auth_settings::Column::ClientId,
                        entity::discord_auth_settings::Column::ClientSecret,
                        entity::discord_auth_settings::Column::Scopes,
                        entity::discord_auth_settings::Column::ApiCalls,
                        entity::discord_auth_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(self.db)
            .await?;

        Ok(SettingsRecord::from_entity(entity))
    }

    /// Saves the settings only if none are stored yet.
    ///
    /// # Returns
    /// - `Ok(true)` - Settings inserted
    /// - `Ok(false)` - Settings already existed and were left untouched
    pub async fn insert_if_absent(&self, record: SettingsRecord) -> Result<bool, DbErr> {
        let inserted = entity::prelude::DiscordAuthSettings::insert(Self::active_model(record))
            .on_conflict(
                OnConflict::column(entity::discord_auth_settings::Column::Id)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db)
            .await?;

        Ok(inserted > 0)
    }

    fn active_model(record: SettingsRecord) -> entity::discord_auth_settings::ActiveModel {
        entity::discord_auth_settings::ActiveModel {
            id: ActiveValue::Set(SETTINGS_ROW_ID),
            client_id: ActiveValue::Set(record.client_id),
            client_secret: ActiveValue::Set(record.client_secret),
            scopes: ActiveValue::Set(record.scopes),
            api_calls: ActiveValue::Set(record.api_calls),
            updated_at: ActiveValue::Set(Utc::now()),
        }
    }
}

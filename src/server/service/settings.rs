use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::{
    model::settings::{SettingsDto, UpdateSettingsDto},
    server::{
        data::settings::SettingsRepository,
        error::AppError,
        model::settings::{Settings, SettingsRecord},
    },
};

/// Source of the Discord client settings used by a login flow.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Loads the current settings.
    ///
    /// # Returns
    /// - `Ok(Settings)` - Settings with both client credentials present
    /// - `Err(AppError::ConfigErr(ConfigError::MissingCredentials))` - Client ID or
    ///   secret is missing
    /// - `Err(AppError::DbErr(_))` - Failed to read the settings
    async fn get(&self) -> Result<Settings, AppError>;
}

/// Settings persisted in the `discord_auth_settings` table.
pub struct SettingsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SettingsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the stored settings for the admin settings page.
    ///
    /// Returns empty values when nothing has been saved yet.
    ///
    /// # Arguments
    /// - `authorized_redirect_url` - Callback URL the admin must register with Discord
    pub async fn get_dto(&self, authorized_redirect_url: String) -> Result<SettingsDto, AppError> {
        let record = SettingsRepository::new(self.db)
            .get()
            .await?
            .unwrap_or_default();

        Ok(record.into_dto(authorized_redirect_url))
    }

    /// Validates and stores an admin update.
    ///
    /// # Returns
    /// - `Ok(SettingsRecord)` - Settings as stored
    /// - `Err(AppError::BadRequest)` - Update failed validation; nothing stored
    /// - `Err(AppError::DbErr(_))` - Failed to write the settings
    pub async fn update(&self, dto: UpdateSettingsDto) -> Result<SettingsRecord, AppError> {
        let record = SettingsRecord::from_update(dto)?;

        Ok(SettingsRepository::new(self.db).upsert(record).await?)
    }

    /// Stores seed settings from the environment unless settings already exist.
    ///
    /// Seeds without credentials are skipped. Other seeds go through the same
    /// validation as an admin update and are skipped with a warning when rejected.
    ///
    /// # Returns
    /// - `Ok(true)` - Seed stored
    /// - `Ok(false)` - Settings already existed, the seed has no credentials or it
    ///   failed validation
    pub async fn seed(&self, record: SettingsRecord) -> Result<bool, AppError> {
        if record.client_id.trim().is_empty() || record.client_secret.trim().is_empty() {
            return Ok(false);
        }

        let record = match SettingsRecord::from_update(UpdateSettingsDto {
            client_id: record.client_id,
            client_secret: record.client_secret,
            scopes: record.scopes,
            extra_api_calls: record.api_calls,
        }) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Ignoring Discord settings from environment: {}", e);
                return Ok(false);
            }
        };

        Ok(SettingsRepository::new(self.db)
            .insert_if_absent(record)
            .await?)
    }
}

#[async_trait]
impl SettingsStore for SettingsService<'_> {
    async fn get(&self) -> Result<Settings, AppError> {
        let record = SettingsRepository::new(self.db)
            .get()
            .await?
            .unwrap_or_default();

        Ok(Settings::from_record(&record).require_credentials()?)
    }
}

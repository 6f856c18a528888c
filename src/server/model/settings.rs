//! Discord client settings.
//!
//! `SettingsRecord` is the raw form kept in the database and edited on the admin
//! settings page (space-delimited scopes, newline-delimited API calls). `Settings` is
//! the parsed, immutable value a login flow works with.

use crate::{
    model::settings::{SettingsDto, UpdateSettingsDto},
    server::{
        error::{config::ConfigError, AppError},
        model::endpoint::EndpointSpec,
    },
};

/// Scopes Discord always receives; the admin cannot configure them.
pub const DEFAULT_SCOPES: [&str; 2] = ["identify", "email"];

/// Additional scopes an admin may request.
pub const ALLOWED_SCOPES: [&str; 11] = [
    "bot",
    "connections",
    "gdm.join",
    "guilds",
    "guilds.join",
    "guilds.members.read",
    "messages.read",
    "rpc",
    "rpc.api",
    "rpc.notifications.read",
    "webhook.incoming",
];

/// Settings consumed by a login flow.
///
/// Loaded once per request and never mutated while the flow runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub client_id: String,
    pub client_secret: String,
    /// Scopes to request: the defaults followed by the configured ones, without
    /// duplicates.
    pub scopes: Vec<String>,
    /// Extra API call specifiers in the order the admin listed them.
    pub extra_api_calls: Vec<String>,
}

impl Settings {
    /// Parses the stored record.
    pub fn from_record(record: &SettingsRecord) -> Self {
        let mut scopes: Vec<String> = DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect();
        for scope in parse_scopes(&record.scopes) {
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }

        Self {
            client_id: record.client_id.clone(),
            client_secret: record.client_secret.clone(),
            scopes,
            extra_api_calls: parse_api_calls(&record.api_calls),
        }
    }

    /// Ensures both client credentials are present.
    ///
    /// # Returns
    /// - `Ok(Settings)` - Credentials set
    /// - `Err(ConfigError::MissingCredentials)` - Client ID or secret is blank
    pub fn require_credentials(self) -> Result<Self, ConfigError> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        Ok(self)
    }
}

/// Raw settings as persisted in `discord_auth_settings`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsRecord {
    pub client_id: String,
    pub client_secret: String,
    pub scopes: String,
    pub api_calls: String,
}

impl SettingsRecord {
    /// Converts an entity model to a settings record at the repository boundary.
    pub fn from_entity(entity: entity::discord_auth_settings::Model) -> Self {
        Self {
            client_id: entity.client_id,
            client_secret: entity.client_secret,
            scopes: entity.scopes,
            api_calls: entity.api_calls,
        }
    }

    /// Converts the record to the admin DTO.
    ///
    /// # Arguments
    /// - `authorized_redirect_url` - Callback URL to register with Discord
    pub fn into_dto(self, authorized_redirect_url: String) -> SettingsDto {
        SettingsDto {
            client_id: self.client_id,
            client_secret: self.client_secret,
            scopes: self.scopes,
            extra_api_calls: self.api_calls,
            authorized_redirect_url,
        }
    }

    /// Validates an admin update and normalizes it into a record.
    ///
    /// Credentials are trimmed and required. Every scope must be in
    /// [`ALLOWED_SCOPES`]; the default scopes are rejected because they are always
    /// requested. Every non-blank API call line must parse as an [`EndpointSpec`].
    ///
    /// # Returns
    /// - `Ok(SettingsRecord)` - Normalized record ready to store
    /// - `Err(AppError::BadRequest)` - Describes the first violation found
    pub fn from_update(dto: UpdateSettingsDto) -> Result<Self, AppError> {
        let client_id = dto.client_id.trim().to_string();
        let client_secret = dto.client_secret.trim().to_string();

        if client_id.is_empty() {
            return Err(AppError::BadRequest("Client ID is required".to_string()));
        }
        if client_secret.is_empty() {
            return Err(AppError::BadRequest("Client Secret is required".to_string()));
        }

        let invalid: Vec<String> = parse_scopes(&dto.scopes)
            .into_iter()
            .filter(|scope| !ALLOWED_SCOPES.contains(&scope.as_str()))
            .collect();
        if !invalid.is_empty() {
            return Err(AppError::BadRequest(format!(
                "You have entered an invalid scope, or the scope entered may already have been set by default: {}",
                invalid.join(", ")
            )));
        }

        for call in parse_api_calls(&dto.extra_api_calls) {
            call.parse::<EndpointSpec>()
                .map_err(|e| AppError::BadRequest(format!("Invalid API call: {}", e)))?;
        }

        Ok(Self {
            client_id,
            client_secret,
            scopes: parse_scopes(&dto.scopes).join(" "),
            api_calls: parse_api_calls(&dto.extra_api_calls).join("\n"),
        })
    }
}

/// Splits a space-delimited scope string.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_string).collect()
}

/// Splits a newline-delimited API call list, dropping blank lines.
pub fn parse_api_calls(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

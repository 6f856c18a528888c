use serde::{Deserialize, Serialize};

/// Discord client settings as shown on the admin settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDto {
    pub client_id: String,
    pub client_secret: String,
    /// Space-delimited additional scopes.
    pub scopes: String,
    /// Newline-delimited extra API call specifiers.
    pub extra_api_calls: String,
    /// Redirect URL to register with the Discord application. Read-only.
    pub authorized_redirect_url: String,
}

/// Payload for `PUT /api/admin/settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSettingsDto {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: String,
    #[serde(default)]
    pub extra_api_calls: String,
}

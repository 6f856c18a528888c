use std::time::Duration;

use url::Url;

use crate::server::{
    error::{config::ConfigError, AppError},
    model::settings::SettingsRecord,
};

const DISCORD_AUTH_URL: &str = "https://discord.com/oauth2/authorize";
const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_API_URL: &str = "https://discord.com/api/v10/";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_LOGIN_PATH: &str = "/login";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Path Discord redirects back to after consent.
pub const CALLBACK_PATH: &str = "/login/callback";

pub struct Config {
    pub database_url: String,
    pub listen_addr: String,

    /// Public base URL of this service, without trailing slash.
    pub app_url: String,
    /// Login entry point that failed flows redirect to.
    pub login_path: String,
    /// Bounded wait for every request to Discord.
    pub http_timeout: Duration,

    pub discord_auth_url: String,
    pub discord_token_url: String,
    /// Discord API base, always ending with `/`.
    pub discord_api_url: Url,

    /// Initial client settings, stored only if no settings exist yet.
    pub seed_settings: SettingsRecord,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let app_url = required("APP_URL")?.trim_end_matches('/').to_string();

        let http_timeout = match optional("HTTP_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let mut api_url =
            optional("DISCORD_API_URL").unwrap_or_else(|| DISCORD_API_URL.to_string());
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        let discord_api_url = Url::parse(&api_url).map_err(|e| ConfigError::InvalidEnvVar {
            name: "DISCORD_API_URL".to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            listen_addr: optional("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string()),
            app_url,
            login_path: optional("LOGIN_PATH").unwrap_or_else(|| DEFAULT_LOGIN_PATH.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
            discord_auth_url: optional("DISCORD_AUTH_URL")
                .unwrap_or_else(|| DISCORD_AUTH_URL.to_string()),
            discord_token_url: optional("DISCORD_TOKEN_URL")
                .unwrap_or_else(|| DISCORD_TOKEN_URL.to_string()),
            discord_api_url,
            seed_settings: SettingsRecord {
                client_id: optional("DISCORD_CLIENT_ID").unwrap_or_default(),
                client_secret: optional("DISCORD_CLIENT_SECRET").unwrap_or_default(),
                scopes: optional("DISCORD_SCOPES").unwrap_or_default(),
                api_calls: optional("DISCORD_API_CALLS")
                    .map(|calls| calls.replace("\\n", "\n"))
                    .unwrap_or_default(),
            },
        })
    }

    /// Redirect URI registered with Discord.
    pub fn redirect_uri(&self) -> String {
        format!("{}{}", self.app_url, CALLBACK_PATH)
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

use async_trait::async_trait;
use oauth2::{
    basic::BasicClient, AccessToken, AuthUrl, AuthorizationCode, ClientId, ClientSecret,
    CsrfToken, EndpointNotSet, EndpointSet, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use reqwest::Response;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::server::{
    config::Config,
    error::provider::ProviderError,
    model::{
        endpoint::{EndpointMethod, EndpointSpec},
        profile::ExternalProfile,
        settings::Settings,
    },
    service::oauth::{AuthorizationRequest, ProviderClient},
};

/// OAuth2 client with the authorization and token endpoints set.
pub(crate) type OAuth2Client =
    BasicClient<EndpointSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// Profile path relative to the Discord API base URL.
const PROFILE_PATH: &str = "users/@me";

/// Subset of the Discord user object returned by `GET /users/@me`.
#[derive(Debug, Deserialize)]
struct DiscordUser {
    id: String,
    username: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    avatar: Option<String>,
}

impl DiscordUser {
    fn into_profile(self) -> Result<ExternalProfile, ProviderError> {
        if self.id.is_empty() {
            return Err(ProviderError::IncompleteProfile("id"));
        }
        if self.username.is_empty() {
            return Err(ProviderError::IncompleteProfile("username"));
        }

        Ok(ExternalProfile {
            external_id: self.id,
            display_name: self.username,
            email: self.email.filter(|email| !email.is_empty()),
            avatar_ref: self.avatar.filter(|avatar| !avatar.is_empty()),
        })
    }
}

/// Discord implementation of [`ProviderClient`].
///
/// The OAuth2 client is built per call from the settings of the running flow, so
/// credential changes take effect on the next login without a restart.
#[derive(Clone)]
pub struct DiscordProvider {
    /// Shared client with redirects disabled and a request timeout.
    http_client: reqwest::Client,
    auth_url: String,
    token_url: String,
    /// API base URL ending with `/`.
    api_url: Url,
}

impl DiscordProvider {
    pub fn new(http_client: reqwest::Client, auth_url: String, token_url: String, api_url: Url) -> Self {
        Self {
            http_client,
            auth_url,
            token_url,
            api_url,
        }
    }

    pub fn from_config(http_client: reqwest::Client, config: &Config) -> Self {
        Self::new(
            http_client,
            config.discord_auth_url.clone(),
            config.discord_token_url.clone(),
            config.discord_api_url.clone(),
        )
    }

    fn oauth_client(
        &self,
        settings: &Settings,
        redirect_uri: &str,
    ) -> Result<OAuth2Client, ProviderError> {
        Ok(BasicClient::new(ClientId::new(settings.client_id.clone()))
            .set_client_secret(ClientSecret::new(settings.client_secret.clone()))
            .set_auth_uri(AuthUrl::new(self.auth_url.clone())?)
            .set_token_uri(TokenUrl::new(self.token_url.clone())?)
            .set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?))
    }

    /// Passes successful responses through and turns any other status into an error.
    async fn check_status(response: Response) -> Result<Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProviderError::Status { status, body })
    }
}

#[async_trait]
impl ProviderClient for DiscordProvider {
    fn build_authorization_request(
        &self,
        settings: &Settings,
        redirect_uri: &str,
    ) -> Result<AuthorizationRequest, ProviderError> {
        let (url, csrf_state) = self
            .oauth_client(settings, redirect_uri)?
            .authorize_url(CsrfToken::new_random)
            .add_scopes(settings.scopes.iter().cloned().map(Scope::new))
            .url();

        Ok(AuthorizationRequest {
            url,
            csrf_state: csrf_state.secret().to_string(),
        })
    }

    async fn exchange_code_for_token(
        &self,
        settings: &Settings,
        redirect_uri: &str,
        code: &str,
    ) -> Result<AccessToken, ProviderError> {
        let token = self
            .oauth_client(settings, redirect_uri)?
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| ProviderError::TokenRequest(e.to_string()))?;

        Ok(token.access_token().clone())
    }

    async fn fetch_profile(
        &self,
        access_token: &AccessToken,
    ) -> Result<ExternalProfile, ProviderError> {
        let response = self
            .http_client
            .get(self.api_url.join(PROFILE_PATH)?)
            .bearer_auth(access_token.secret())
            .send()
            .await?;

        let body = Self::check_status(response).await?.bytes().await?;
        let user: DiscordUser = serde_json::from_slice(&body)?;

        user.into_profile()
    }

    async fn call_extra_endpoint(
        &self,
        access_token: &AccessToken,
        endpoint: &EndpointSpec,
    ) -> Result<Value, ProviderError> {
        let url = endpoint.resolve(&self.api_url)?;

        let request = match endpoint.method {
            EndpointMethod::Get => self.http_client.get(url),
            EndpointMethod::Post => self.http_client.post(url),
        };

        let response = request.bearer_auth(access_token.secret()).send().await?;
        let body = Self::check_status(response).await?.bytes().await?;

        if body.is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

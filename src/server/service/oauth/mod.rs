//! OAuth2 login with Discord.
//!
//! `ProviderClient` is the narrow contract the login flow relies on; `DiscordProvider`
//! implements it on top of the `oauth2` crate and the shared `reqwest` client.

pub mod discord;

use async_trait::async_trait;
use oauth2::AccessToken;
use serde_json::Value;
use url::Url;

use crate::server::{
    error::provider::ProviderError,
    model::{endpoint::EndpointSpec, profile::ExternalProfile, settings::Settings},
};

/// Authorization URL together with the CSRF state encoded in it.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: Url,
    pub csrf_state: String,
}

#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Builds the consent URL with a fresh random CSRF state.
    ///
    /// The URL carries the client ID, redirect URI, requested scopes and the state.
    fn build_authorization_request(
        &self,
        settings: &Settings,
        redirect_uri: &str,
    ) -> Result<AuthorizationRequest, ProviderError>;

    /// Exchanges an authorization code for an access token. Single attempt.
    async fn exchange_code_for_token(
        &self,
        settings: &Settings,
        redirect_uri: &str,
        code: &str,
    ) -> Result<AccessToken, ProviderError>;

    /// Fetches the profile of the user the token belongs to.
    async fn fetch_profile(&self, access_token: &AccessToken)
        -> Result<ExternalProfile, ProviderError>;

    /// Performs one configured extra API call and returns its JSON body.
    async fn call_extra_endpoint(
        &self,
        access_token: &AccessToken,
        endpoint: &EndpointSpec,
    ) -> Result<Value, ProviderError>;
}

//! Login flow tests against stub collaborators.


use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use oauth2::AccessToken;
use serde_json::Value;
use url::Url;

use crate::server::{
    error::{config::ConfigError, provider::ProviderError, AppError},
    model::{
        endpoint::EndpointSpec,
        profile::ExternalProfile,
        settings::Settings,
        user::{BindIdentityParam, User},
    },
    service::{
        identity::IdentityBinder,
        oauth::{AuthorizationRequest, ProviderClient},
        settings::SettingsStore,
    },
};

const REDIRECT_URI: &str = "http://localhost:8080/login/callback";
const EXTERNAL_ID: &str = "80351110224678912";

fn settings(extra_api_calls: &[&str]) -> Settings {
    Settings {
        client_id: "client".to_string(),
        client_secret: "secret".to_string(),
        scopes: vec!["identify".to_string(), "email".to_string()],
        extra_api_calls: extra_api_calls.iter().map(|call| call.to_string()).collect(),
    }
}

struct StubSettings(Option<Settings>);

#[async_trait]
impl SettingsStore for StubSettings {
    async fn get(&self) -> Result<Settings, AppError> {
        self.0
            .clone()
            .ok_or(AppError::ConfigErr(ConfigError::MissingCredentials))
    }
}

/// Provider that records every call it receives.
#[derive(Default)]
struct StubProvider {
    calls: Mutex<Vec<String>>,
    states_issued: Mutex<u32>,
    reject_code: bool,
    fail_profile: bool,
    /// Extra call responses by target; targets missing here fail.
    extra_responses: HashMap<String, Value>,
}

impl StubProvider {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn extra_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with("extra "))
            .collect()
    }

    fn exchanged(&self) -> bool {
        self.calls().iter().any(|call| call.starts_with("exchange "))
    }
}

#[async_trait]
impl ProviderClient for StubProvider {
    fn build_authorization_request(
        &self,
        settings: &Settings,
        redirect_uri: &str,
    ) -> Result<AuthorizationRequest, ProviderError> {
        let mut issued = self.states_issued.lock().unwrap();
        *issued += 1;
        let csrf_state = format!("state-{}", issued);

        let mut url = Url::parse("https://discord.test/oauth2/authorize")?;
        url.query_pairs_mut()
            .append_pair("client_id", &settings.client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", &csrf_state);

        self.record(format!("authorize {}", csrf_state));

        Ok(AuthorizationRequest { url, csrf_state })
    }

    async fn exchange_code_for_token(
        &self,
        _settings: &Settings,
        _redirect_uri: &str,
        code: &str,
    ) -> Result<AccessToken, ProviderError> {
        self.record(format!("exchange {}", code));

        if self.reject_code {
            return Err(ProviderError::TokenRequest("invalid_grant".to_string()));
        }

        Ok(AccessToken::new(format!("token-for-{}", code)))
    }

    async fn fetch_profile(
        &self,
        access_token: &AccessToken,
    ) -> Result<ExternalProfile, ProviderError> {
        self.record(format!("profile {}", access_token.secret()));

        if self.fail_profile {
            return Err(ProviderError::IncompleteProfile("id"));
        }

        Ok(ExternalProfile {
            external_id: EXTERNAL_ID.to_string(),
            display_name: "nelly".to_string(),
            email: Some("nelly@example.com".to_string()),
            avatar_ref: Some("avatar-hash".to_string()),
        })
    }

    async fn call_extra_endpoint(
        &self,
        _access_token: &AccessToken,
        endpoint: &EndpointSpec,
    ) -> Result<Value, ProviderError> {
        self.record(format!("extra {}", endpoint.target));

        self.extra_responses
            .get(&endpoint.target)
            .cloned()
            .ok_or(ProviderError::InvalidEndpoint(endpoint.target.clone()))
    }
}

/// Binder keeping identities in memory; binding a known identity returns its user.
#[derive(Default)]
struct StubBinder {
    identities: Mutex<HashSet<String>>,
    binds: Mutex<Vec<BindIdentityParam>>,
}

impl StubBinder {
    fn with_identity(external_id: &str) -> Self {
        let binder = Self::default();
        binder
            .identities
            .lock()
            .unwrap()
            .insert(external_id.to_string());
        binder
    }

    fn binds(&self) -> Vec<BindIdentityParam> {
        self.binds.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityBinder for StubBinder {
    async fn account_exists(&self, external_id: &str) -> Result<bool, AppError> {
        Ok(self.identities.lock().unwrap().contains(external_id))
    }

    async fn authenticate_or_create(&self, param: BindIdentityParam) -> Result<User, AppError> {
        self.identities
            .lock()
            .unwrap()
            .insert(param.external_id.clone());

        let user = User {
            id: 1,
            name: param.display_name.clone(),
            email: param.email.clone(),
            admin: false,
        };
        self.binds.lock().unwrap().push(param);

        Ok(user)
    }
}

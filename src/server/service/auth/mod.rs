//! Discord login flow.
//!
//! A flow has two steps. `initiate` stores a fresh CSRF state in the session and
//! returns the Discord consent URL. `callback` verifies the state Discord sends back,
//! exchanges the code, fetches the profile and binds it to a local account. Whatever
//! the outcome of the callback, the flow state is removed from the session before it
//! returns.

use oauth2::AccessToken;
use url::Url;

use crate::server::{
    error::{auth::AuthError, provider::ProviderError, AppError},
    middleware::session::FlowSession,
    model::{
        endpoint::EndpointSpec,
        flow::{ExtraData, FlowState},
        settings::Settings,
        user::{BindIdentityParam, User},
    },
    service::{identity::IdentityBinder, oauth::ProviderClient, settings::SettingsStore},
};

#[cfg(test)]
mod test;

/// Consent denial reported by Discord in the callback `error` parameter.
const ERROR_ACCESS_DENIED: &str = "access_denied";

pub struct InitiateParam {
    /// Local path to return to after login.
    pub destination: Option<String>,
    /// Admin code that accompanied the request, already checked as valid.
    pub admin_code: Option<String>,
}

/// Query parameters Discord redirects back with.
pub struct CallbackParam {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Successful end of a login flow.
#[derive(Debug)]
pub struct AuthenticatedLogin {
    pub user: User,
    pub destination: Option<String>,
    /// Admin code to consume for this login, if the flow carried one.
    pub admin_code: Option<String>,
}

pub struct AuthFlowService<'a> {
    settings: &'a dyn SettingsStore,
    provider: &'a dyn ProviderClient,
    binder: &'a dyn IdentityBinder,
    session: FlowSession<'a>,
    /// Callback URL registered with Discord.
    redirect_uri: &'a str,
}

impl<'a> AuthFlowService<'a> {
    pub fn new(
        settings: &'a dyn SettingsStore,
        provider: &'a dyn ProviderClient,
        binder: &'a dyn IdentityBinder,
        session: FlowSession<'a>,
        redirect_uri: &'a str,
    ) -> Self {
        Self {
            settings,
            provider,
            binder,
            session,
            redirect_uri,
        }
    }

    /// Starts a login flow.
    ///
    /// Any flow the session was still waiting on is replaced, or removed when the new
    /// flow cannot be started.
    ///
    /// # Returns
    /// - `Ok(Url)` - Discord consent URL to redirect the user to
    /// - `Err(AuthError::NotConfigured)` - Client credentials missing; no URL built
    /// - `Err(AppError::ProviderErr(_))` - Configured Discord URLs are invalid
    pub async fn initiate(&self, param: InitiateParam) -> Result<Url, AppError> {
        let result = self.begin(param).await;

        if result.is_err() {
            self.session.clear().await?;
        }

        result
    }

    async fn begin(&self, param: InitiateParam) -> Result<Url, AppError> {
        let settings = self.load_settings().await?;

        let request = self
            .provider
            .build_authorization_request(&settings, self.redirect_uri)?;

        self.session
            .start(&FlowState::new(
                request.csrf_state,
                param.destination,
                param.admin_code,
            ))
            .await?;

        Ok(request.url)
    }

    /// Completes a login flow.
    ///
    /// # Returns
    /// - `Ok(AuthenticatedLogin)` - User bound and ready to be logged in
    /// - `Err(AuthError::UserCancelled)` - User declined consent
    /// - `Err(AuthError::NotConfigured)` - Client credentials missing
    /// - `Err(AuthError::CsrfValidationFailed)` - State missing or not matching
    /// - `Err(AuthError::TokenExchange)` - Code missing, rejected or unreachable token
    ///   endpoint
    /// - `Err(AuthError::ProfileFetch)` - Profile could not be loaded
    /// - `Err(AppError::DbErr(_))` / `Err(AppError::SessionErr(_))` - Infrastructure
    ///   failure
    pub async fn callback(&self, param: CallbackParam) -> Result<AuthenticatedLogin, AppError> {
        let result = self.complete(param).await;

        self.session.clear().await?;

        result
    }

    async fn complete(&self, param: CallbackParam) -> Result<AuthenticatedLogin, AppError> {
        if param.error.as_deref() == Some(ERROR_ACCESS_DENIED) {
            tracing::info!("User declined Discord authorization");
            return Err(AuthError::UserCancelled.into());
        }

        let settings = self.load_settings().await?;

        let flow = match self.session.state().await? {
            Some(flow) if flow.matches(param.state.as_deref()) => flow,
            Some(_) => {
                tracing::warn!("Discord login failed: OAuth2 state does not match the session");
                return Err(AuthError::CsrfValidationFailed.into());
            }
            None => {
                tracing::warn!("Discord login failed: no login flow in progress for this session");
                return Err(AuthError::CsrfValidationFailed.into());
            }
        };

        if let Some(error) = param.error {
            tracing::error!("Discord returned authorization error: {}", error);
            return Err(AuthError::TokenExchange(ProviderError::Authorization(error)).into());
        }

        let code = param
            .code
            .filter(|code| !code.is_empty())
            .ok_or(AuthError::TokenExchange(ProviderError::MissingCode))?;

        let access_token = self
            .provider
            .exchange_code_for_token(&settings, self.redirect_uri, &code)
            .await
            .map_err(|e| {
                tracing::error!("Discord token exchange failed: {}", e);
                AuthError::TokenExchange(e)
            })?;

        self.session.set_access_token(access_token.secret()).await?;

        let profile = self
            .provider
            .fetch_profile(&access_token)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch Discord profile: {}", e);
                AuthError::ProfileFetch(e)
            })?;

        let extra_data = if self.binder.account_exists(&profile.external_id).await? {
            ExtraData::default()
        } else {
            self.collect_extra_data(&settings, &access_token).await
        };

        let user = self
            .binder
            .authenticate_or_create(BindIdentityParam {
                display_name: profile.display_name,
                email: profile.email,
                external_id: profile.external_id,
                access_token: access_token.secret().to_string(),
                avatar_ref: profile.avatar_ref,
                extra_data: extra_data.to_blob()?,
            })
            .await?;

        tracing::info!("User {} logged in with Discord", user.id);

        Ok(AuthenticatedLogin {
            user,
            destination: flow.pending_destination,
            admin_code: flow.admin_code,
        })
    }

    async fn load_settings(&self) -> Result<Settings, AppError> {
        match self.settings.get().await {
            Ok(settings) => Ok(settings),
            Err(AppError::ConfigErr(e)) => {
                tracing::error!("{}", e);
                Err(AuthError::NotConfigured(e).into())
            }
            Err(e) => Err(e),
        }
    }

    /// Performs the configured extra API calls in order.
    ///
    /// A failing call is recorded as failed and does not stop the remaining calls.
    async fn collect_extra_data(&self, settings: &Settings, access_token: &AccessToken) -> ExtraData {
        let mut extra_data = ExtraData::default();

        for line in &settings.extra_api_calls {
            let result = match line.parse::<EndpointSpec>() {
                Ok(endpoint) => {
                    self.provider
                        .call_extra_endpoint(access_token, &endpoint)
                        .await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(data) => extra_data.push_fetched(line, data),
                Err(e) => {
                    tracing::warn!("Discord extra API call '{}' failed: {}", line, e);
                    extra_data.push_failed(line);
                }
            }
        }

        extra_data
    }
}

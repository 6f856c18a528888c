use reqwest::StatusCode;
use thiserror::Error;

/// Failures raised by the Discord provider adapter.
///
/// These carry provider detail for operators only. The login flow wraps them in
/// `AuthError::TokenExchange` or `AuthError::ProfileFetch`, whose user-facing message
/// never includes this text.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// A configured provider URL or the redirect URI could not be parsed.
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Extra API call line is not a valid `[METHOD ]PATH_OR_URL` specifier.
    #[error("Invalid endpoint specifier '{0}'")]
    InvalidEndpoint(String),

    /// Extra API call points outside the Discord API base URL.
    ///
    /// Refused so the user's access token is never sent to another host.
    #[error("Endpoint '{0}' is outside the Discord API")]
    ForeignEndpoint(String),

    /// Callback arrived without an authorization code.
    #[error("Callback did not include an authorization code")]
    MissingCode,

    /// Discord redirected back with an error other than a consent denial.
    #[error("Discord returned authorization error '{0}'")]
    Authorization(String),

    /// Token endpoint rejected the code or could not be reached.
    #[error("Token request failed: {0}")]
    TokenRequest(String),

    /// Transport failure talking to the Discord API.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Discord API answered with a non-success status.
    #[error("Discord responded with {status}: {body}")]
    Status {
        /// HTTP status returned by Discord
        status: StatusCode,
        /// Response body, kept for operator logs
        body: String,
    },

    /// Discord API answered with a body that is not the expected JSON.
    #[error("Malformed Discord response: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Profile payload parsed but lacks a required field.
    #[error("Discord profile is missing '{0}'")]
    IncompleteProfile(&'static str),
}

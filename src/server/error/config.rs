use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is not set.
    ///
    /// The application requires this environment variable to be defined. Check the
    /// documentation or `.env.example` file for required configuration variables.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable is set but its value cannot be used.
    #[error("Invalid value for environment variable {name}: {reason}")]
    InvalidEnvVar {
        /// Name of the offending variable
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Discord client ID or client secret is empty.
    ///
    /// Raised by the settings store whenever a login flow starts or completes without
    /// credentials configured on the admin settings page.
    #[error("Define Client ID and Client Secret on the Discord settings page")]
    MissingCredentials,
}

//! Extra API call specifiers.
//!
//! An admin lists one specifier per line: an optional HTTP method followed by a path
//! relative to the Discord API base URL, or an absolute URL under that base.
//!
//! ```text
//! users/@me/guilds
//! GET /users/@me/connections
//! POST https://discord.com/api/v10/users/@me/channels
//! ```

use std::{fmt, str::FromStr};

use url::Url;

use crate::server::error::provider::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMethod {
    Get,
    Post,
}

impl fmt::Display for EndpointMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// Parsed extra API call line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    pub method: EndpointMethod,
    /// Relative path or absolute URL, as written.
    pub target: String,
}

impl EndpointSpec {
    /// Resolves the target against the API base URL.
    ///
    /// `api_base` must end with `/` so relative paths are appended rather than
    /// replacing its last segment.
    ///
    /// # Returns
    /// - `Ok(Url)` - Absolute URL under `api_base`
    /// - `Err(ProviderError::ForeignEndpoint)` - Absolute target outside `api_base`
    /// - `Err(ProviderError::InvalidUrl)` - Target cannot be parsed or joined
    pub fn resolve(&self, api_base: &Url) -> Result<Url, ProviderError> {
        let url = match Url::parse(&self.target) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                api_base.join(self.target.trim_start_matches('/'))?
            }
            Err(e) => return Err(e.into()),
        };

        // Scheme, host and port must all match, whatever form the target was written in.
        if url.origin() != api_base.origin() || !url.path().starts_with(api_base.path()) {
            return Err(ProviderError::ForeignEndpoint(self.target.clone()));
        }

        Ok(url)
    }
}

impl FromStr for EndpointSpec {
    type Err = ProviderError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let invalid = || ProviderError::InvalidEndpoint(line.to_string());

        let (method, target) = match line.split_once(char::is_whitespace) {
            Some((method, rest)) if method.eq_ignore_ascii_case("GET") => {
                (EndpointMethod::Get, rest.trim())
            }
            Some((method, rest)) if method.eq_ignore_ascii_case("POST") => {
                (EndpointMethod::Post, rest.trim())
            }
            _ => (EndpointMethod::Get, line),
        };

        if target.is_empty()
            || target.contains(char::is_whitespace)
            || target.contains("..")
            || target.contains('\\')
            || target.starts_with("//")
        {
            return Err(invalid());
        }

        Ok(Self {
            method,
            target: target.to_string(),
        })
    }
}

impl fmt::Display for EndpointSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.target)
    }
}

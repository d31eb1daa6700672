// Shared transport configuration for building reqwest::Client instances.
//
// Config-override and status requests share timeout, user agent, and the
// optional admin token through this module.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Header carrying the admin token on every admin-service request.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub user_agent: String,
    pub auth_token: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("sidekick/", env!("CARGO_PKG_VERSION")).to_owned(),
            auth_token: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.as_str());

        if let Some(ref token) = self.auth_token {
            let mut value = HeaderValue::from_str(token.expose_secret())
                .map_err(|e| Error::ClientBuild(format!("invalid auth token: {e}")))?;
            value.set_sensitive(true);
            let mut headers = HeaderMap::new();
            headers.insert(AUTH_TOKEN_HEADER, value);
            builder = builder.default_headers(headers);
        }

        builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }

    /// Attach an admin token to every request.
    pub fn with_auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

//! Builder pattern for backend client configuration.
//!
//! # Example
//!
//! ```no_run
//! use frame_auth::AuthClient;
//!
//! # fn example() -> frame_auth::Result<()> {
//! let client = AuthClient::builder()
//!     .project_id("p1")
//!     .project_token("s1")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

use super::client::AuthClient;
use super::config::ApiConfig;

// ============================================================================
// Constants
// ============================================================================

/// Default TCP connect timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default whole-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// AuthClientBuilder
// ============================================================================

/// Builder for configuring an [`AuthClient`].
///
/// Use [`AuthClient::builder()`] to create a new builder.
#[derive(Debug, Clone)]
pub struct AuthClientBuilder {
    config: ApiConfig,
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl Default for AuthClientBuilder {
    fn default() -> Self {
        Self::from_config(ApiConfig::default())
    }
}

// ============================================================================
// AuthClientBuilder Implementation
// ============================================================================

impl AuthClientBuilder {
    /// Creates a builder with no credentials.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder starting from an existing configuration.
    #[inline]
    #[must_use]
    pub fn from_config(config: ApiConfig) -> Self {
        Self {
            config,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Sets the project id.
    #[inline]
    #[must_use]
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.config.project_id = Some(project_id.into());
        self
    }

    /// Sets the project secret.
    #[inline]
    #[must_use]
    pub fn project_token(mut self, project_token: impl Into<String>) -> Self {
        self.config.project_token = Some(project_token.into());
        self
    }

    /// Overrides the base URL.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Points the client at the local test endpoint.
    #[inline]
    #[must_use]
    pub fn test_mode(mut self) -> Self {
        self.config = self.config.with_test_mode();
        self
    }

    /// Sets the TCP connect timeout.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the whole-request timeout.
    #[inline]
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builds the client with validation.
    ///
    /// # Errors
    ///
    /// - [`Error::Url`] if the base URL does not parse
    /// - [`Error::Config`] if the base URL is not http or https
    /// - [`Error::Http`] if the HTTP client cannot be constructed
    pub fn build(self) -> Result<AuthClient> {
        self.validate_base_url()?;

        let http = reqwest::Client::builder()
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout)
            .build()?;

        Ok(AuthClient::from_parts(self.config, http))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl AuthClientBuilder {
    /// Validates the base URL.
    fn validate_base_url(&self) -> Result<()> {
        let url = Url::parse(&self.config.base_url)?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Base URL must use http or https, got {}",
                url.scheme()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_credentials() {
        let client = AuthClientBuilder::new()
            .project_id("p1")
            .project_token("s1")
            .base_url("https://api.example.com")
            .build()
            .expect("build");

        assert_eq!(client.config().project_id.as_deref(), Some("p1"));
        assert_eq!(client.config().project_token.as_deref(), Some("s1"));
        assert_eq!(client.config().base_url, "https://api.example.com");
    }

    #[test]
    fn test_builder_test_mode() {
        let client = AuthClientBuilder::new().test_mode().build().expect("build");
        assert_eq!(client.config().base_url, "http://localhost:3129");
    }

    #[test]
    fn test_builder_rejects_unparseable_url() {
        let result = AuthClientBuilder::new().base_url("not a url").build();
        assert!(matches!(result, Err(Error::Url(_))));
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let result = AuthClientBuilder::new().base_url("ftp://example.com").build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}

//! Backend client configuration.
//!
//! # Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `FRAME_AUTH_TEST` | Any non-empty value points the client at [`LOCAL_BASE_URL`] |
//! | `FRAME_AUTH_PROJECT_ID` | Project id for [`ApiConfig::from_env`] |
//! | `FRAME_AUTH_PROJECT_TOKEN` | Project secret for [`ApiConfig::from_env`] |

// ============================================================================
// Imports
// ============================================================================

use std::env;
use std::fmt;

// ============================================================================
// Constants
// ============================================================================

/// Production REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://rest.api.gokoji.com";

/// Local REST endpoint used in test mode.
pub const LOCAL_BASE_URL: &str = "http://localhost:3129";

/// Environment flag selecting [`LOCAL_BASE_URL`].
pub const TEST_MODE_ENV: &str = "FRAME_AUTH_TEST";

/// Environment variable holding the project id.
pub const PROJECT_ID_ENV: &str = "FRAME_AUTH_PROJECT_ID";

/// Environment variable holding the project secret.
pub const PROJECT_TOKEN_ENV: &str = "FRAME_AUTH_PROJECT_TOKEN";

// ============================================================================
// ApiConfig
// ============================================================================

/// Credentials and endpoint for the backend REST client.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Project identifier, sent as `X-Project-Id`.
    pub project_id: Option<String>,

    /// Project secret, sent as `X-Project-Token`.
    pub project_token: Option<String>,

    /// Base URL every endpoint path is appended to.
    pub base_url: String,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("project_id", &self.project_id)
            .field(
                "project_token",
                &self.project_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            project_token: None,
            base_url: base_url_for(test_mode_enabled()).to_string(),
        }
    }
}

impl ApiConfig {
    /// Creates a configuration for a project.
    ///
    /// The base URL follows the test-mode environment flag.
    #[must_use]
    pub fn new(project_id: impl Into<String>, project_token: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            project_token: Some(project_token.into()),
            ..Self::default()
        }
    }

    /// Reads credentials from the environment.
    ///
    /// Unset or empty variables leave the matching field as `None`.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            project_id: non_empty_var(PROJECT_ID_ENV),
            project_token: non_empty_var(PROJECT_TOKEN_ENV),
            ..Self::default()
        }
    }

    /// Overrides the base URL.
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Points the client at [`LOCAL_BASE_URL`].
    #[inline]
    #[must_use]
    pub fn with_test_mode(self) -> Self {
        self.with_base_url(LOCAL_BASE_URL)
    }

    /// Builds the full URL for an endpoint path.
    ///
    /// Query keys and values are percent-encoded; the `?` is only added
    /// when there is at least one parameter.
    #[must_use]
    pub fn build_uri(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut uri = format!("{}{path}", self.base_url.trim_end_matches('/'));

        let params = query
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(key),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        if !params.is_empty() {
            uri.push('?');
            uri.push_str(&params);
        }

        uri
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns `true` if the test-mode flag is set to a non-empty value.
#[must_use]
pub fn test_mode_enabled() -> bool {
    env::var_os(TEST_MODE_ENV).is_some_and(|value| !value.is_empty())
}

/// Selects the base URL for a mode.
#[inline]
#[must_use]
pub const fn base_url_for(test_mode: bool) -> &'static str {
    if test_mode {
        LOCAL_BASE_URL
    } else {
        DEFAULT_BASE_URL
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use parking_lot::Mutex;
    use proptest::prelude::*;

    /// Serializes tests that mutate process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_var(key: &str, value: &str) {
        // SAFETY: callers hold ENV_LOCK, and no other test touches these keys.
        unsafe { env::set_var(key, value) };
    }

    fn remove_var(key: &str) {
        // SAFETY: see `set_var`.
        unsafe { env::remove_var(key) };
    }

    #[test]
    fn test_environment_selects_endpoint_and_credentials() {
        let _guard = ENV_LOCK.lock();

        set_var(TEST_MODE_ENV, "1");
        set_var(PROJECT_ID_ENV, "env-project");
        set_var(PROJECT_TOKEN_ENV, "env-secret");

        assert!(test_mode_enabled());
        assert_eq!(ApiConfig::default().base_url, LOCAL_BASE_URL);

        let config = ApiConfig::from_env();
        assert_eq!(config.project_id.as_deref(), Some("env-project"));
        assert_eq!(config.project_token.as_deref(), Some("env-secret"));
        assert_eq!(config.base_url, LOCAL_BASE_URL);

        set_var(TEST_MODE_ENV, "");
        set_var(PROJECT_TOKEN_ENV, "");
        remove_var(PROJECT_ID_ENV);

        assert!(!test_mode_enabled());
        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.project_id.is_none());
        assert!(config.project_token.is_none());

        remove_var(TEST_MODE_ENV);
        remove_var(PROJECT_TOKEN_ENV);
    }

    #[test]
    fn test_base_url_for_mode() {
        assert_eq!(base_url_for(false), "https://rest.api.gokoji.com");
        assert_eq!(base_url_for(true), "http://localhost:3129");
    }

    #[test]
    fn test_new_sets_credentials() {
        let config = ApiConfig::new("p1", "s1");
        assert_eq!(config.project_id.as_deref(), Some("p1"));
        assert_eq!(config.project_token.as_deref(), Some("s1"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", ApiConfig::new("p1", "super-secret"));
        assert!(debug.contains("p1"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_build_uri_without_query() {
        let config = ApiConfig::new("p1", "s1").with_base_url("https://api.example.com/");
        assert_eq!(
            config.build_uri("/v1/apps/auth/consumer/getRoleForToken", &[]),
            "https://api.example.com/v1/apps/auth/consumer/getRoleForToken"
        );
    }

    #[test]
    fn test_build_uri_encodes_query() {
        let config = ApiConfig::new("p1", "s1").with_test_mode();
        assert_eq!(
            config.build_uri("/v1/x", &[("a b", "c&d"), ("e", "ü")]),
            "http://localhost:3129/v1/x?a%20b=c%26d&e=%C3%BC"
        );
    }

    proptest! {
        #[test]
        fn prop_query_values_decode_back(key in "[a-z]{1,8}", value in "\\PC{0,24}") {
            let config = ApiConfig::default().with_base_url("http://h");
            let uri = config.build_uri("/p", &[(&key, &value)]);

            let (_, query) = uri.split_once('?').expect("query present");
            let (raw_key, raw_value) = query.split_once('=').expect("pair");

            prop_assert!(!raw_value.contains('&'));
            prop_assert_eq!(urlencoding::decode(raw_key).expect("utf8"), key.as_str());
            prop_assert_eq!(urlencoding::decode(raw_value).expect("utf8"), value.as_str());
        }
    }
}

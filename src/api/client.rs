//! Backend REST client.
//!
//! Every call is a JSON POST authenticated with the project credentials.
//! The plain methods are fail-soft; the `try_*` methods return the
//! underlying error for callers that need to tell failures apart.
//!
//! | Method | Endpoint | On failure |
//! |--------|----------|------------|
//! | [`AuthClient::get_grant`] | `getGrantForToken` | `None` |
//! | [`AuthClient::get_role`] | `getRoleForToken` | [`UserRole::Unknown`] |
//! | [`AuthClient::push_notification`] | `pushNotification` | ignored |
//! | [`AuthClient::push_notification_to_owner`] | `pushNotification` | ignored |

// ============================================================================
// Imports
// ============================================================================

use reqwest::RequestBuilder;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::{UserId, UserToken};
use crate::model::{AuthGrant, Destination, PushNotification, UserRole};

use super::builder::AuthClientBuilder;
use super::config::ApiConfig;

// ============================================================================
// Constants
// ============================================================================

/// Grant lookup endpoint.
pub const GRANT_FOR_TOKEN_PATH: &str = "/v1/apps/auth/consumer/getGrantForToken";

/// Role lookup endpoint.
pub const ROLE_FOR_TOKEN_PATH: &str = "/v1/apps/auth/consumer/getRoleForToken";

/// Push notification endpoint.
pub const PUSH_NOTIFICATION_PATH: &str = "/v1/apps/auth/consumer/pushNotification";

/// Header carrying the project id (`X-Project-Id`).
pub const PROJECT_ID_HEADER: &str = "x-project-id";

/// Header carrying the project secret (`X-Project-Token`).
pub const PROJECT_TOKEN_HEADER: &str = "x-project-token";

/// Header carrying the viewer's token (`X-Auth-Callback-Token`).
pub const CALLBACK_TOKEN_HEADER: &str = "x-auth-callback-token";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Deserialize)]
struct GrantResponse {
    #[serde(default)]
    grant: Option<AuthGrant>,
}

#[derive(Deserialize)]
struct RoleResponse {
    #[serde(default)]
    role: Option<UserRole>,
}

#[derive(Serialize)]
struct PushRequest<'a> {
    destination: &'a Destination,
    notification: &'a PushNotification,
}

// ============================================================================
// AuthClient
// ============================================================================

/// Backend client resolving roles and grants for viewer tokens.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct AuthClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl AuthClient {
    /// Creates a client from a configuration with default timeouts.
    ///
    /// # Errors
    ///
    /// See [`AuthClientBuilder::build`].
    pub fn new(config: ApiConfig) -> Result<Self> {
        AuthClientBuilder::from_config(config).build()
    }

    /// Creates a builder.
    #[inline]
    #[must_use]
    pub fn builder() -> AuthClientBuilder {
        AuthClientBuilder::new()
    }

    pub(crate) fn from_parts(config: ApiConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    /// Returns the configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    // ========================================================================
    // Grants
    // ========================================================================

    /// Looks up the grant issued for a token.
    ///
    /// Returns `None` if there is no grant or if the lookup fails for any
    /// reason.
    pub async fn get_grant(&self, user_token: &UserToken) -> Option<AuthGrant> {
        match self.try_get_grant(user_token).await {
            Ok(grant) => grant,
            Err(e) => {
                debug!(error = %e, "Grant lookup failed");
                None
            }
        }
    }

    /// Looks up the grant issued for a token.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] on network failure
    /// - [`Error::Status`] on a non-2xx response
    /// - [`Error::Json`] on a malformed body
    pub async fn try_get_grant(&self, user_token: &UserToken) -> Result<Option<AuthGrant>> {
        let request = self.request(GRANT_FOR_TOKEN_PATH, Some(user_token))?;
        let body = Self::execute(GRANT_FOR_TOKEN_PATH, request).await?;

        let response: GrantResponse = serde_json::from_str(&body)?;
        Ok(response.grant)
    }

    // ========================================================================
    // Roles
    // ========================================================================

    /// Resolves the role of the viewer behind a token.
    ///
    /// Returns [`UserRole::Unknown`] if the lookup fails for any reason.
    pub async fn get_role(&self, user_token: &UserToken) -> UserRole {
        match self.try_get_role(user_token).await {
            Ok(role) => role,
            Err(e) => {
                debug!(error = %e, "Role lookup failed");
                UserRole::Unknown
            }
        }
    }

    /// Resolves the role of the viewer behind a token.
    ///
    /// A missing or null `role` field resolves to [`UserRole::Unknown`].
    ///
    /// # Errors
    ///
    /// Same as [`AuthClient::try_get_grant`].
    pub async fn try_get_role(&self, user_token: &UserToken) -> Result<UserRole> {
        let request = self.request(ROLE_FOR_TOKEN_PATH, Some(user_token))?;
        let body = Self::execute(ROLE_FOR_TOKEN_PATH, request).await?;

        let response: RoleResponse = serde_json::from_str(&body)?;
        Ok(response.role.unwrap_or_default())
    }

    // ========================================================================
    // Push Notifications
    // ========================================================================

    /// Sends a push notification to a user. Failures are ignored.
    pub async fn push_notification(&self, user_id: &UserId, notification: &PushNotification) {
        self.push_quietly(&Destination::User(user_id.clone()), notification)
            .await;
    }

    /// Sends a push notification to the owner of the app. Failures are
    /// ignored.
    pub async fn push_notification_to_owner(&self, notification: &PushNotification) {
        self.push_quietly(&Destination::Owner, notification).await;
    }

    /// Sends a push notification.
    ///
    /// # Errors
    ///
    /// - [`Error::Http`] on network failure
    /// - [`Error::Status`] on a non-2xx response
    pub async fn try_push_notification(
        &self,
        destination: &Destination,
        notification: &PushNotification,
    ) -> Result<()> {
        let request = self
            .request(PUSH_NOTIFICATION_PATH, None)?
            .json(&PushRequest {
                destination,
                notification,
            });

        Self::execute(PUSH_NOTIFICATION_PATH, request).await?;
        Ok(())
    }

    async fn push_quietly(&self, destination: &Destination, notification: &PushNotification) {
        if let Err(e) = self.try_push_notification(destination, notification).await {
            debug!(error = %e, destination = destination.as_str(), "Push notification failed");
        }
    }

    // ========================================================================
    // Request Plumbing
    // ========================================================================

    /// Builds the authentication headers.
    ///
    /// Credentials that are not configured are omitted, as is an empty
    /// user token.
    pub(crate) fn headers(&self, user_token: Option<&UserToken>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(project_id) = &self.config.project_id {
            headers.insert(
                HeaderName::from_static(PROJECT_ID_HEADER),
                HeaderValue::from_str(project_id)?,
            );
        }

        if let Some(project_token) = &self.config.project_token {
            let mut value = HeaderValue::from_str(project_token)?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(PROJECT_TOKEN_HEADER), value);
        }

        if let Some(user_token) = user_token.filter(|token| !token.is_empty()) {
            let mut value = HeaderValue::from_str(user_token.as_str())?;
            value.set_sensitive(true);
            headers.insert(HeaderName::from_static(CALLBACK_TOKEN_HEADER), value);
        }

        Ok(headers)
    }

    fn request(&self, path: &str, user_token: Option<&UserToken>) -> Result<RequestBuilder> {
        let uri = self.config.build_uri(path, &[]);
        Ok(self.http.post(uri).headers(self.headers(user_token)?))
    }

    /// Sends a request and returns the body of a 2xx response.
    async fn execute(path: &str, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        let status = response.status();
        trace!(path, status = status.as_u16(), "Backend responded");

        if !status.is_success() {
            return Err(Error::status(status.as_u16(), path));
        }

        Ok(response.text().await?)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::Router;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::post;
    use parking_lot::Mutex;
    use serde_json::{Value, json};
    use tokio::net::TcpListener;

    /// A request as seen by the mock backend.
    #[derive(Debug, Clone)]
    struct Seen {
        headers: AxumHeaders,
        body: String,
    }

    type SeenLog = Arc<Mutex<Vec<Seen>>>;

    async fn spawn_backend(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }

    /// Routes `path` to a handler that records the request and answers
    /// with `status` and `body`.
    fn recording(path: &str, status: StatusCode, body: &'static str, log: &SeenLog) -> Router {
        let log = Arc::clone(log);
        Router::new().route(
            path,
            post(move |headers: AxumHeaders, body_in: String| {
                let log = Arc::clone(&log);
                async move {
                    log.lock().push(Seen {
                        headers,
                        body: body_in,
                    });
                    (status, body)
                }
            }),
        )
    }

    fn client(base_url: &str) -> AuthClient {
        AuthClient::builder()
            .project_id("p1")
            .project_token("s1")
            .base_url(base_url)
            .build()
            .expect("build")
    }

    async fn unreachable_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);
        format!("http://{addr}")
    }

    #[test]
    fn test_headers_with_user_token() {
        let client = client("https://api.example.com");
        let headers = client
            .headers(Some(&UserToken::new("usertok")))
            .expect("headers");

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[PROJECT_ID_HEADER], "p1");
        assert_eq!(headers[PROJECT_TOKEN_HEADER], "s1");
        assert_eq!(headers[CALLBACK_TOKEN_HEADER], "usertok");
    }

    #[test]
    fn test_headers_without_credentials() {
        let client = AuthClient::builder()
            .base_url("https://api.example.com")
            .build()
            .expect("build");
        let headers = client.headers(None).expect("headers");

        assert_eq!(headers.len(), 1);
        assert!(headers.get(CALLBACK_TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_headers_skip_empty_user_token() {
        let client = client("https://api.example.com");
        let headers = client
            .headers(Some(&UserToken::new("")))
            .expect("headers");

        assert_eq!(headers[PROJECT_ID_HEADER], "p1");
        assert!(headers.get(CALLBACK_TOKEN_HEADER).is_none());
    }

    #[test]
    fn test_headers_reject_control_characters() {
        let client = client("https://api.example.com");
        let result = client.headers(Some(&UserToken::new("bad\ntoken")));
        assert!(matches!(result, Err(Error::InvalidHeader(_))));
    }

    #[tokio::test]
    async fn test_get_role_admin() {
        let log = SeenLog::default();
        let base = spawn_backend(recording(
            ROLE_FOR_TOKEN_PATH,
            StatusCode::OK,
            r#"{"role":"admin"}"#,
            &log,
        ))
        .await;

        let role = client(&base).get_role(&UserToken::new("usertok")).await;
        assert_eq!(role, UserRole::Admin);

        let seen = log.lock().clone();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].headers["x-project-id"], "p1");
        assert_eq!(seen[0].headers["x-project-token"], "s1");
        assert_eq!(seen[0].headers["x-auth-callback-token"], "usertok");
        assert_eq!(seen[0].headers["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_get_role_server_error_is_unknown() {
        let log = SeenLog::default();
        let base = spawn_backend(recording(
            ROLE_FOR_TOKEN_PATH,
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"role":"admin"}"#,
            &log,
        ))
        .await;
        let client = client(&base);
        let token = UserToken::new("usertok");

        assert_eq!(client.get_role(&token).await, UserRole::Unknown);

        let err = client.try_get_role(&token).await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_get_role_non_json_is_unknown() {
        let log = SeenLog::default();
        let base = spawn_backend(recording(
            ROLE_FOR_TOKEN_PATH,
            StatusCode::OK,
            "<html>oops</html>",
            &log,
        ))
        .await;
        let client = client(&base);
        let token = UserToken::new("usertok");

        assert_eq!(client.get_role(&token).await, UserRole::Unknown);
        assert!(matches!(client.try_get_role(&token).await, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn test_get_role_missing_field_is_unknown() {
        let log = SeenLog::default();
        let base =
            spawn_backend(recording(ROLE_FOR_TOKEN_PATH, StatusCode::OK, "{}", &log)).await;

        let role = client(&base)
            .try_get_role(&UserToken::new("usertok"))
            .await
            .expect("lookup");
        assert_eq!(role, UserRole::Unknown);
    }

    #[tokio::test]
    async fn test_get_role_unreachable_is_unknown() {
        let base = unreachable_base_url().await;
        let client = client(&base);
        let token = UserToken::new("usertok");

        assert_eq!(client.get_role(&token).await, UserRole::Unknown);
        assert!(client.try_get_role(&token).await.unwrap_err().is_transport_error());
    }

    #[tokio::test]
    async fn test_get_grant_present() {
        let log = SeenLog::default();
        let base = spawn_backend(recording(
            GRANT_FOR_TOKEN_PATH,
            StatusCode::OK,
            r#"{"grant":{"userId":"u-1","dateCreated":"2024-01-01","pushNotificationsEnabled":true,"attributes":{"username":"ada"}}}"#,
            &log,
        ))
        .await;

        let grant = client(&base)
            .get_grant(&UserToken::new("usertok"))
            .await
            .expect("grant");

        assert_eq!(grant.user_id.as_str(), "u-1");
        assert!(grant.push_notifications_enabled);
        assert_eq!(grant.attribute_str("username"), Some("ada"));
        assert_eq!(log.lock()[0].headers["x-auth-callback-token"], "usertok");
    }

    #[tokio::test]
    async fn test_get_grant_null_is_none() {
        let log = SeenLog::default();
        let base = spawn_backend(recording(
            GRANT_FOR_TOKEN_PATH,
            StatusCode::OK,
            r#"{"grant":null}"#,
            &log,
        ))
        .await;

        let client = client(&base);
        let token = UserToken::new("usertok");
        assert!(client.get_grant(&token).await.is_none());
        assert!(client.try_get_grant(&token).await.expect("lookup").is_none());
    }

    #[tokio::test]
    async fn test_get_grant_failures_are_none() {
        let log = SeenLog::default();
        let base = spawn_backend(recording(
            GRANT_FOR_TOKEN_PATH,
            StatusCode::FORBIDDEN,
            "{}",
            &log,
        ))
        .await;
        assert!(client(&base).get_grant(&UserToken::new("t")).await.is_none());

        let unreachable = unreachable_base_url().await;
        assert!(client(&unreachable).get_grant(&UserToken::new("t")).await.is_none());
    }

    #[tokio::test]
    async fn test_push_notification_body_and_headers() {
        let log = SeenLog::default();
        let base =
            spawn_backend(recording(PUSH_NOTIFICATION_PATH, StatusCode::OK, "{}", &log)).await;
        let client = client(&base);

        let notification = PushNotification::new("bell", "Quiz", "You won").with_ref("r=1");
        client
            .push_notification(&UserId::new("u-7"), &notification)
            .await;
        client.push_notification_to_owner(&notification).await;

        let seen = log.lock().clone();
        assert_eq!(seen.len(), 2);

        let first: Value = serde_json::from_str(&seen[0].body).expect("json body");
        assert_eq!(
            first,
            json!({
                "destination": "u-7",
                "notification": { "icon": "bell", "appName": "Quiz", "message": "You won", "ref": "r=1" }
            })
        );
        assert!(seen[0].headers.get("x-auth-callback-token").is_none());
        assert_eq!(seen[0].headers["x-project-id"], "p1");

        let second: Value = serde_json::from_str(&seen[1].body).expect("json body");
        assert_eq!(second["destination"], "owner");
    }

    #[tokio::test]
    async fn test_push_notification_swallows_failures() {
        let log = SeenLog::default();
        let base = spawn_backend(recording(
            PUSH_NOTIFICATION_PATH,
            StatusCode::BAD_GATEWAY,
            "",
            &log,
        ))
        .await;
        let notification = PushNotification::new("bell", "Quiz", "hi");

        client(&base).push_notification_to_owner(&notification).await;
        assert_eq!(log.lock().len(), 1);

        let err = client(&base)
            .try_push_notification(&Destination::Owner, &notification)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Status { status: 502, .. }));

        let unreachable = unreachable_base_url().await;
        client(&unreachable)
            .push_notification(&UserId::new("u-1"), &notification)
            .await;
    }
}

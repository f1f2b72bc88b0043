//! Credential verification against the remote login endpoint.
//!
//! The store talks to the endpoint through the [`CredentialClient`] trait so
//! tests and embedders can supply their own transport. [`HttpCredentialClient`]
//! is the reqwest-backed implementation.

use crate::error::CredentialError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Login route variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginRoute {
    /// `/admin/login`
    Admin,
    /// `/user/login`
    User,
}

impl LoginRoute {
    /// Route for a request's admin flag.
    pub fn for_admin(is_admin: bool) -> Self {
        if is_admin {
            LoginRoute::Admin
        } else {
            LoginRoute::User
        }
    }

    /// Path appended to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            LoginRoute::Admin => "/admin/login",
            LoginRoute::User => "/user/login",
        }
    }
}

/// Caller-supplied login form. Not stored by the store.
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Selects the admin route.
    #[serde(default)]
    pub is_admin: bool,
}

impl LoginRequest {
    /// Create a request for the user route.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            is_admin: false,
        }
    }

    /// Set the admin flag.
    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Route this request targets.
    pub fn route(&self) -> LoginRoute {
        LoginRoute::for_admin(self.is_admin)
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// JSON body sent to the login route: `{"user": .., "password": ..}`.
#[derive(Serialize)]
pub struct CredentialRequest<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

/// Transport to the credential endpoint.
#[async_trait]
pub trait CredentialClient: Send + Sync {
    /// POST `body` to `route`, returning the response body.
    ///
    /// Fails on network errors and non-2xx answers.
    async fn post(
        &self,
        route: LoginRoute,
        body: &CredentialRequest<'_>,
    ) -> Result<Value, CredentialError>;
}

#[async_trait]
impl<C: CredentialClient + ?Sized> CredentialClient for Arc<C> {
    async fn post(
        &self,
        route: LoginRoute,
        body: &CredentialRequest<'_>,
    ) -> Result<Value, CredentialError> {
        (**self).post(route, body).await
    }
}

/// reqwest-backed credential client.
#[derive(Clone)]
pub struct HttpCredentialClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpCredentialClient {
    /// Create a client for `base_url` (e.g., `https://example.com/api`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, CredentialError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a client with an optional per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, CredentialError> {
        let base_url = base_url.into();
        Url::parse(&base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of a login route.
    pub fn route_url(&self, route: LoginRoute) -> String {
        format!("{}{}", self.base_url, route.path())
    }
}

#[async_trait]
impl CredentialClient for HttpCredentialClient {
    async fn post(
        &self,
        route: LoginRoute,
        body: &CredentialRequest<'_>,
    ) -> Result<Value, CredentialError> {
        let url = self.route_url(route);

        debug!(url = %url, "Posting credentials");

        let response = self.http_client.post(&url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CredentialError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_body(&text))
    }
}

/// Empty bodies become `null`; bodies that are not JSON are kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Body returned by a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoginPayload(Value);

impl LoginPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Token carried by the payload: a bare string body, or a `token` /
    /// `access_token` field.
    pub fn token(&self) -> Option<&str> {
        let token = match &self.0 {
            Value::String(token) => Some(token.as_str()),
            Value::Object(map) => ["token", "access_token"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str)),
            _ => None,
        };
        token.filter(|token| !token.is_empty())
    }
}

/// Outcome of `SessionStore::login`, always returned as a value.
#[derive(Debug)]
pub enum LoginResult {
    /// Endpoint accepted the credentials.
    Success { payload: LoginPayload },
    /// Any transport or endpoint failure.
    Failure { error: CredentialError },
}

impl LoginResult {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginResult::Success { .. })
    }

    pub fn payload(&self) -> Option<&LoginPayload> {
        match self {
            LoginResult::Success { payload } => Some(payload),
            LoginResult::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&CredentialError> {
        match self {
            LoginResult::Success { .. } => None,
            LoginResult::Failure { error } => Some(error),
        }
    }

    /// Convert into a `Result` for `?`-style callers.
    pub fn into_result(self) -> Result<LoginPayload, CredentialError> {
        match self {
            LoginResult::Success { payload } => Ok(payload),
            LoginResult::Failure { error } => Err(error),
        }
    }
}

impl From<Result<Value, CredentialError>> for LoginResult {
    fn from(result: Result<Value, CredentialError>) -> Self {
        match result {
            Ok(value) => LoginResult::Success {
                payload: LoginPayload::new(value),
            },
            Err(error) => LoginResult::Failure { error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_route_selection() {
        assert_eq!(LoginRoute::for_admin(true), LoginRoute::Admin);
        assert_eq!(LoginRoute::for_admin(false), LoginRoute::User);
        assert_eq!(LoginRoute::Admin.path(), "/admin/login");
        assert_eq!(LoginRoute::User.path(), "/user/login");
    }

    #[test]
    fn test_login_request_builder() {
        let request = LoginRequest::new("bob", "x");
        assert_eq!(request.route(), LoginRoute::User);

        let request = request.with_admin(true);
        assert_eq!(request.route(), LoginRoute::Admin);
    }

    #[test]
    fn test_login_request_deserialize_defaults_admin_flag() {
        let request: LoginRequest =
            serde_json::from_value(json!({"username": "bob", "password": "x"})).unwrap();
        assert!(!request.is_admin);
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let request = LoginRequest::new("bob", "hunter2");
        let rendered = format!("{:?}", request);
        assert!(rendered.contains("bob"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_credential_request_wire_format() {
        let body = CredentialRequest {
            user: "bob",
            password: "x",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"user": "bob", "password": "x"})
        );
    }

    #[test]
    fn test_http_client_rejects_invalid_base_url() {
        let result = HttpCredentialClient::new("not a url");
        assert!(matches!(result, Err(CredentialError::InvalidUrl(_))));
    }

    #[test]
    fn test_http_client_route_url_trims_trailing_slash() {
        let client = HttpCredentialClient::new("https://example.com/api/").unwrap();
        assert_eq!(client.base_url(), "https://example.com/api");
        assert_eq!(
            client.route_url(LoginRoute::Admin),
            "https://example.com/api/admin/login"
        );
        assert_eq!(
            client.route_url(LoginRoute::User),
            "https://example.com/api/user/login"
        );
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
        assert_eq!(parse_body(r#"{"token":"t"}"#), json!({"token": "t"}));
        assert_eq!(parse_body("a.b.c"), Value::String("a.b.c".to_string()));
    }

    #[test]
    fn test_payload_token_extraction() {
        assert_eq!(LoginPayload::new(json!("a.b.c")).token(), Some("a.b.c"));
        assert_eq!(
            LoginPayload::new(json!({"token": "a.b.c"})).token(),
            Some("a.b.c")
        );
        assert_eq!(
            LoginPayload::new(json!({"access_token": "x.y.z"})).token(),
            Some("x.y.z")
        );
        assert_eq!(LoginPayload::new(json!({"token": 5})).token(), None);
        assert_eq!(LoginPayload::new(json!("")).token(), None);
        assert_eq!(LoginPayload::new(Value::Null).token(), None);
    }

    #[test]
    fn test_login_result_accessors() {
        let success = LoginResult::from(Ok::<_, CredentialError>(json!({"token": "t"})));
        assert!(success.is_success());
        assert!(success.error().is_none());
        assert_eq!(
            success.payload().map(LoginPayload::as_value),
            Some(&json!({"token": "t"}))
        );

        let failure = LoginResult::from(Err::<Value, _>(CredentialError::Transport("down".into())));
        assert!(!failure.is_success());
        assert!(failure.payload().is_none());
        assert!(matches!(
            failure.into_result(),
            Err(CredentialError::Transport(message)) if message == "down"
        ));
    }
}

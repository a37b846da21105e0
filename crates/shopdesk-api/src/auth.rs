use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Path of the login endpoint, relative to the API base URL.
pub const LOGIN_PATH: &str = "auth/login";

/// A bearer token attached to a single request.
///
/// There is no process-wide authorization header: every call that needs
/// credentials receives one of these explicitly.
#[derive(Debug, Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    pub fn new(token: SecretString) -> Self {
        Self(token)
    }

    /// The raw token value, for building the `Authorization` header.
    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl From<SecretString> for BearerToken {
    fn from(token: SecretString) -> Self {
        Self(token)
    }
}

/// Body returned by `POST /auth/login`.
///
/// Both fields are optional on the wire: a 2xx response without a token
/// means the backend rejected the credentials without using an error status.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<serde_json::Value>,
}

impl LoginResponse {
    /// The token, if the backend issued a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }
}

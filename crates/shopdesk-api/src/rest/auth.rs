// Token login
//
// `POST /auth/login {email, password}` answers with `{token, user}`.
// The client only performs the call; persisting the session and deciding
// what a missing token means belongs to the auth adapter in shopdesk-core.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::{LOGIN_PATH, LoginResponse};
use crate::error::Error;
use crate::rest::client::RestClient;

impl RestClient {
    /// Exchange email + password for a bearer token.
    ///
    /// Non-2xx responses surface as [`Error::Http`] with the backend's
    /// `message` (if any) preserved for display.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        let url = self.endpoint(LOGIN_PATH, None)?;
        debug!("logging in at {}", url);

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        let resp = self
            .http()
            .request(Method::POST, url)
            .json(&body)
            .send()
            .await?;

        let body = Self::read_body(resp).await?;
        let text = if body.trim().is_empty() { "{}" } else { body.as_str() };
        let login: LoginResponse =
            serde_json::from_str(text).map_err(|e| Error::Deserialization {
                message: format!("login response: {e}"),
                body: body.clone(),
            })?;

        debug!(token_issued = login.token().is_some(), "login response received");
        Ok(login)
    }
}

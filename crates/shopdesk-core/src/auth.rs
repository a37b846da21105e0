// ── Auth adapter ──
//
// Login, logout, session checks, and error triage for the admin console.
// All state lives in the session store; the provider itself is stateless
// and cheap to clone.

use std::sync::Arc;

use secrecy::SecretString;
use serde::Serialize;
use shopdesk_api::RestClient;
use strum::Display;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::session::store::SessionStore;
use crate::session::{Identity, Session, UserRecord};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const LOGIN_FALLBACK: &str = "login failed. verify your credentials";
const AUTH_REQUIRED: &str = "Authentication required";

/// Console routes the adapter redirects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Route {
    #[strum(to_string = "/")]
    #[serde(rename = "/")]
    Home,
    #[strum(to_string = "/login")]
    #[serde(rename = "/login")]
    Login,
}

/// What the login form submits.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub redirect_to: Route,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutOutcome {
    pub redirect_to: Route,
}

/// Result of a session check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub authenticated: bool,
    pub logout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<Route>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "error_text")]
    pub error: Option<CoreError>,
}

/// Verdict on an error raised by some data call.
#[derive(Debug, Serialize)]
pub struct OnErrorResponse {
    /// The session must be dropped.
    pub logout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<Route>,
    #[serde(serialize_with = "error_text_required")]
    pub error: CoreError,
}

// serde's `serialize_with` hands us `&Option<_>`.
#[allow(clippy::ref_option)]
fn error_text<S: serde::Serializer>(err: &Option<CoreError>, s: S) -> Result<S::Ok, S::Error> {
    match err {
        Some(e) => s.serialize_some(&e.to_string()),
        None => s.serialize_none(),
    }
}

fn error_text_required<S: serde::Serializer>(err: &CoreError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&err.to_string())
}

/// Token-based authentication against `POST /auth/login`.
#[derive(Clone)]
pub struct AuthProvider {
    client: Arc<RestClient>,
    store: Arc<dyn SessionStore>,
}

impl AuthProvider {
    pub fn new(client: Arc<RestClient>, store: Arc<dyn SessionStore>) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Exchange credentials for a token and persist the session.
    ///
    /// Every failure comes back as [`CoreError::Login`].
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, CoreError> {
        let response = self
            .client
            .login(&credentials.email, &credentials.password)
            .await
            .map_err(|e| {
                let message = e
                    .backend_message()
                    .map(str::to_owned)
                    .or_else(|| Some(e.to_string()).filter(|m| !m.is_empty()))
                    .unwrap_or_else(|| LOGIN_FALLBACK.to_owned());
                debug!(error = %e, "login request failed");
                CoreError::Login { message }
            })?;

        let Some(token) = response.token() else {
            warn!(email = %credentials.email, "login response carried no token");
            return Err(CoreError::Login {
                message: INVALID_CREDENTIALS.into(),
            });
        };

        let session = Session::new(
            SecretString::from(token.to_owned()),
            UserRecord::from_value(response.user),
        );
        self.store.save(&session).map_err(|e| CoreError::Login {
            message: e.to_string(),
        })?;

        info!(email = %credentials.email, "logged in");
        Ok(LoginOutcome {
            redirect_to: Route::Home,
        })
    }

    /// Drop the session. Never fails.
    pub fn logout(&self) -> LogoutOutcome {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear session");
        }
        info!("logged out");
        LogoutOutcome {
            redirect_to: Route::Login,
        }
    }

    /// Whether a session token is present. The token is not validated
    /// against the backend.
    pub fn check(&self) -> CheckResponse {
        let token = self.store.token().unwrap_or_else(|e| {
            warn!(error = %e, "failed to read session, treating as logged out");
            None
        });
        if token.is_some() {
            CheckResponse {
                authenticated: true,
                logout: false,
                redirect_to: None,
                error: None,
            }
        } else {
            CheckResponse {
                authenticated: false,
                logout: true,
                redirect_to: Some(Route::Login),
                error: Some(CoreError::Unauthorized {
                    message: AUTH_REQUIRED.into(),
                }),
            }
        }
    }

    /// Triage an error from a data call. A 401 or 403 means the session
    /// is dead; anything else is left to the caller.
    pub fn on_error(error: CoreError) -> OnErrorResponse {
        if error.is_session_rejected() {
            OnErrorResponse {
                logout: true,
                redirect_to: Some(Route::Login),
                error,
            }
        } else {
            OnErrorResponse {
                logout: false,
                redirect_to: None,
                error,
            }
        }
    }

    /// [`on_error`](Self::on_error), then log out if the verdict says so.
    pub fn handle_error(&self, error: CoreError) -> OnErrorResponse {
        let verdict = Self::on_error(error);
        if verdict.logout {
            warn!(error = %verdict.error, "backend rejected the session");
            self.logout();
        }
        verdict
    }

    /// The stored user's roles. `None` without a session.
    pub fn permissions(&self) -> Result<Option<Vec<String>>, CoreError> {
        Ok(self.store.user()?.map(|user| user.roles()))
    }

    /// The stored user reshaped for display. `None` without a session.
    pub fn identity(&self) -> Result<Option<Identity>, CoreError> {
        Ok(self.store.user()?.map(|user| user.identity()))
    }
}

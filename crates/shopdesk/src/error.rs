//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shopdesk_config::ConfigError;
use shopdesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to backend at {url}")]
    #[diagnostic(
        code(shopdesk::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Reason: {reason}\n\
             Set the URL with --api-url or: shopdesk config set api_url <url>"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(shopdesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Login failed: {message}")]
    #[diagnostic(
        code(shopdesk::login_failed),
        help(
            "Verify the email and password for profile '{profile}'.\n\
             Store a password with: shopdesk config set-password"
        )
    )]
    LoginFailed { message: String, profile: String },

    #[error("Not logged in")]
    #[diagnostic(code(shopdesk::not_logged_in), help("Run: shopdesk login"))]
    NotLoggedIn,

    #[error("Session rejected by the backend: {message}")]
    #[diagnostic(
        code(shopdesk::session_expired),
        help("The stored session was dropped. Run: shopdesk login")
    )]
    SessionExpired { message: String },

    #[error("No {what} configured for profile '{profile}'")]
    #[diagnostic(
        code(shopdesk::no_credentials),
        help(
            "Configure the profile with: shopdesk config init\n\
             Or set SHOPDESK_EMAIL / SHOPDESK_PASSWORD."
        )
    )]
    NoCredentials { profile: String, what: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Unknown resource '{name}'")]
    #[diagnostic(
        code(shopdesk::unknown_resource),
        help("Available resources: {available}")
    )]
    UnknownResource { name: String, available: String },

    #[error("Resource '{resource}' does not support {operation}")]
    #[diagnostic(
        code(shopdesk::unsupported),
        help("Run: shopdesk resources to see what each resource supports")
    )]
    Unsupported { resource: String, operation: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(shopdesk::api_error))]
    Api { status: u16, message: String },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(code(shopdesk::invalid_response))]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shopdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shopdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shopdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(shopdesk::config))]
    Config { message: String },

    #[error("Session storage error at {path}: {reason}")]
    #[diagnostic(code(shopdesk::storage))]
    Storage { path: String, reason: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shopdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(shopdesk::json), help("Check the JSON contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::LoginFailed { .. }
            | Self::NotLoggedIn
            | Self::SessionExpired { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Api { status, .. } => match status {
                401 | 403 => exit_code::AUTH,
                404 => exit_code::NOT_FOUND,
                409 => exit_code::CONFLICT,
                _ => exit_code::GENERAL,
            },
            Self::Unsupported { .. } => exit_code::PERMISSION,
            Self::Validation { .. }
            | Self::UnknownResource { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Login { message } => CliError::LoginFailed {
                message,
                profile: "current".into(),
            },
            CoreError::Unauthorized { .. } => CliError::NotLoggedIn,
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::Timeout => CliError::Timeout,
            CoreError::Api { status, message } => CliError::Api { status, message },
            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },
            CoreError::UnknownResource { name } => CliError::UnknownResource {
                name,
                available: shopdesk_core::RESOURCES
                    .iter()
                    .map(|r| r.name)
                    .collect::<Vec<_>>()
                    .join(", "),
            },
            CoreError::Unsupported {
                resource,
                operation,
            } => CliError::Unsupported {
                resource,
                operation,
            },
            CoreError::InvalidId { id } => CliError::Validation {
                field: "id".into(),
                reason: format!("{id:?} does not name a single record"),
            },
            CoreError::Storage { path, reason } => CliError::Storage { path, reason },
            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile, what } => CliError::NoCredentials {
                profile,
                what: what.into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

// ── Core error types ──
//
// User-facing errors from shopdesk-core. The `From<shopdesk_api::Error>`
// impl translates transport-layer failures into these variants while
// keeping the HTTP status, which the auth adapter needs for error triage.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    /// Login failed: bad credentials or a transport failure during login.
    #[error("{message}")]
    Login { message: String },

    /// No usable session for a protected operation.
    #[error("{message}")]
    Unauthorized { message: String },

    // ── Connection ───────────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to backend timed out")]
    Timeout,

    // ── API ──────────────────────────────────────────────────────────
    /// Non-2xx answer from the backend, status preserved.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The backend answered 2xx with a body we couldn't interpret.
    #[error("Unexpected response from backend: {message}")]
    InvalidResponse { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Unknown resource '{name}'")]
    UnknownResource { name: String },

    #[error("Resource '{resource}' does not support {operation}")]
    Unsupported { resource: String, operation: String },

    #[error("Invalid record id {id:?}")]
    InvalidId { id: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Session storage error at {path}: {reason}")]
    Storage { path: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// The HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the backend rejected the session (401 / 403).
    pub fn is_session_rejected(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Short machine-friendly name, mirroring the error names the console
    /// shows in notifications.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "LoginError",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::ConnectionFailed { .. } | Self::Timeout => "NetworkError",
            Self::Api { .. } => "HttpError",
            Self::InvalidResponse { .. } => "ResponseError",
            Self::UnknownResource { .. } | Self::Unsupported { .. } | Self::InvalidId { .. } => {
                "ResourceError"
            }
            Self::Storage { .. } => "StorageError",
            Self::Config { .. } => "ConfigError",
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shopdesk_api::Error> for CoreError {
    fn from(err: shopdesk_api::Error) -> Self {
        match err {
            shopdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Api {
                        status: status.as_u16(),
                        message: e.to_string(),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            shopdesk_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            shopdesk_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            shopdesk_api::Error::InvalidId { id } => CoreError::InvalidId { id },
            shopdesk_api::Error::InvalidHeader { name, reason } => CoreError::Config {
                message: format!("Invalid header '{name}': {reason}"),
            },
            shopdesk_api::Error::Http {
                status, message, ..
            } => CoreError::Api { status, message },
            shopdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
            shopdesk_api::Error::UnrecognizedEnvelope { preview } => CoreError::InvalidResponse {
                message: format!("unrecognized list shape: {preview}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_errors_keep_status() {
        let err = CoreError::from(shopdesk_api::Error::Http {
            status: 403,
            message: "Forbidden".into(),
            from_backend: false,
            body: String::new(),
        });
        assert_eq!(err.status(), Some(403));
        assert!(err.is_session_rejected());
    }

    #[test]
    fn other_statuses_are_not_session_fatal() {
        let err = CoreError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert!(!err.is_session_rejected());
        assert!(
            !CoreError::Unauthorized {
                message: "Authentication required".into()
            }
            .is_session_rejected()
        );
    }

    #[test]
    fn envelope_errors_become_invalid_response() {
        let err = CoreError::from(shopdesk_api::Error::UnrecognizedEnvelope {
            preview: "{}".into(),
        });
        assert_eq!(err.name(), "ResponseError");
    }
}

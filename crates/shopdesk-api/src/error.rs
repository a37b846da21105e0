use thiserror::Error;

/// Top-level error type for the `shopdesk-api` crate.
///
/// Every failure of a REST round trip lands here: transport problems,
/// non-2xx responses (status preserved), and bodies that don't decode.
/// `shopdesk-core` maps these into session-aware domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing or construction error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup error (bad CA bundle, client build failure).
    #[error("TLS error: {0}")]
    Tls(String),

    /// A record id that cannot address a single record (empty, `.`, `..`).
    #[error("Invalid record id {id:?}")]
    InvalidId { id: String },

    /// A caller-supplied header could not be encoded.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    // ── HTTP ────────────────────────────────────────────────────────
    /// The backend answered with a non-2xx status.
    ///
    /// `message` is the backend's `message` field when the body is a JSON
    /// object carrying one, otherwise the raw body or the status reason.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        message: String,
        /// `true` when `message` came from the backend's JSON payload.
        from_backend: bool,
        body: String,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A list response matched none of the known envelope shapes.
    #[error("Unrecognized list response shape (body preview: {preview:?})")]
    UnrecognizedEnvelope { preview: String },
}

impl Error {
    /// The HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` for 401 / 403 responses: the session is no longer
    /// accepted by the backend.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client never retries on its own; callers decide.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// The message the backend put in its error payload, if it sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Http {
                message,
                from_backend: true,
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// Truncate a response body for log lines and error previews.
pub(crate) fn preview(body: &str) -> String {
    body.chars().take(200).collect()
}

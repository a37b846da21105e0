// ── Runtime connection configuration ──
//
// These types describe *how* to reach the admin backend. They never touch
// disk: the CLI builds a `ClientConfig` from its config file and flags
// and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use shopdesk_api::{RestClient, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// Default API base URL for a locally running backend.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs on staging backends).
    DangerAcceptInvalid,
}

/// Configuration for talking to one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL (e.g., `http://localhost:8080/api`).
    pub api_url: Url,
    /// Request timeout.
    pub timeout: Duration,
    /// TLS verification strategy.
    pub tls: TlsVerification,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            timeout: DEFAULT_TIMEOUT,
            tls: TlsVerification::default(),
        }
    }

    /// Translate into the api crate's transport settings.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig::default()
            .with_timeout(self.timeout)
            .with_tls(tls)
    }

    /// Build the shared REST client.
    pub fn build_client(&self) -> Result<RestClient, CoreError> {
        Ok(RestClient::new(self.api_url.clone(), &self.transport())?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Url::parse(DEFAULT_API_URL).expect("default API URL is valid"))
    }
}

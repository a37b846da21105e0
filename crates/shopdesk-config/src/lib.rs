//! Shared configuration for the shopdesk CLI.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), session
//! file locations, and translation to `shopdesk_core::ClientConfig`. The CLI
//! layers its flag overrides on top through [`ClientOverrides`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use url::Url;

use shopdesk_core::{ClientConfig, DEFAULT_API_URL, TlsVerification};

/// Keyring service name; entries are keyed `{profile}/password`.
pub const KEYRING_SERVICE: &str = "shopdesk";

/// Environment variable consulted before the keyring.
pub const PASSWORD_ENV: &str = "SHOPDESK_PASSWORD";

/// Environment variable supplying the login email when the profile has none.
pub const EMAIL_ENV: &str = "SHOPDESK_EMAIL";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no {what} configured for profile '{profile}'")]
    NoCredentials { profile: String, what: &'static str },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile name in effect: explicit choice, else the configured
    /// default, else `default`.
    pub fn profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            api_url: default_api_url(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}

/// A named backend profile.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// API base URL (e.g., "https://shop.example.com/api").
    pub api_url: Option<String>,

    /// Login email.
    pub email: Option<String>,

    /// Password (plaintext, prefer keyring).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "shopdesk", "shopdesk")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("shopdesk");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Where a profile's session (token + user record) is persisted.
pub fn session_path(profile_name: &str) -> PathBuf {
    let base = project_dirs().map_or_else(
        || dirs_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    );
    base.join("sessions").join(format!("{profile_name}.json"))
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, still layering `SHOPDESK_*` env vars
/// (nested keys use `__`, e.g. `SHOPDESK_DEFAULTS__TIMEOUT`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SHOPDESK_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config_or_default_from(&config_path())
}

/// Like [`load_config_from`], but a broken file is logged and replaced by
/// the defaults.
pub fn load_config_or_default_from(path: &Path) -> Config {
    load_config_from(path).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring unreadable config, using defaults");
        Config::default()
    })
}

/// Serialize config to TOML at the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// The login email: profile first, then `SHOPDESK_EMAIL`.
pub fn resolve_email(profile: Option<&Profile>, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .and_then(|p| p.email.clone())
        .or_else(|| std::env::var(EMAIL_ENV).ok())
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
            what: "email",
        })
}

/// The login password from the non-interactive chain: env var, system
/// keyring, plaintext in the profile. The CLI prompts when this fails.
pub fn resolve_password(
    profile: Option<&Profile>,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(pw));
    }

    // 2. Keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 3. Plaintext in config
    if let Some(pw) = profile.and_then(|p| p.password.clone()) {
        return Ok(SecretString::from(pw));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
        what: "password",
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?.set_password(password)?;
    Ok(())
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/password")
}

// ── ClientConfig construction ───────────────────────────────────────

/// Flag-level overrides, highest precedence.
#[derive(Debug, Clone, Default)]
pub struct ClientOverrides {
    pub api_url: Option<String>,
    pub timeout: Option<u64>,
    pub insecure: bool,
}

/// Build a `ClientConfig`: flags over profile over `[defaults]`.
pub fn build_client_config(
    cfg: &Config,
    profile: Option<&Profile>,
    overrides: &ClientOverrides,
) -> Result<ClientConfig, ConfigError> {
    let raw_url = overrides
        .api_url
        .clone()
        .or_else(|| profile.and_then(|p| p.api_url.clone()))
        .unwrap_or_else(|| cfg.defaults.api_url.clone());
    let api_url = Url::parse(&raw_url).map_err(|e| ConfigError::Validation {
        field: "api_url".into(),
        reason: format!("'{raw_url}': {e}"),
    })?;

    let insecure = overrides.insecure || profile.and_then(|p| p.insecure).unwrap_or(false);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ca_path) = profile.and_then(|p| p.ca_cert.clone()) {
        TlsVerification::CustomCa(ca_path)
    } else {
        TlsVerification::SystemDefaults
    };

    let timeout_secs = overrides
        .timeout
        .or_else(|| profile.and_then(|p| p.timeout))
        .unwrap_or(cfg.defaults.timeout);

    Ok(ClientConfig {
        api_url,
        timeout: Duration::from_secs(timeout_secs),
        tls,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile(api_url: &str) -> Profile {
        Profile {
            api_url: Some(api_url.into()),
            timeout: Some(5),
            ..Profile::default()
        }
    }

    #[test]
    fn defaults_point_at_local_backend() {
        let cfg = Config::default();
        let client = build_client_config(&cfg, None, &ClientOverrides::default()).unwrap();
        assert_eq!(client.api_url.as_str(), "http://localhost:8080/api");
        assert_eq!(client.timeout, Duration::from_secs(30));
        assert_eq!(client.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn flags_beat_profile() {
        let cfg = Config::default();
        let p = profile("https://shop.example.com/api");

        let client = build_client_config(&cfg, Some(&p), &ClientOverrides::default()).unwrap();
        assert_eq!(client.api_url.as_str(), "https://shop.example.com/api");
        assert_eq!(client.timeout, Duration::from_secs(5));

        let overrides = ClientOverrides {
            api_url: Some("http://127.0.0.1:9000/api".into()),
            timeout: Some(60),
            insecure: true,
        };
        let client = build_client_config(&cfg, Some(&p), &overrides).unwrap();
        assert_eq!(client.api_url.as_str(), "http://127.0.0.1:9000/api");
        assert_eq!(client.timeout, Duration::from_secs(60));
        assert_eq!(client.tls, TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn ca_cert_selects_custom_ca() {
        let p = Profile {
            ca_cert: Some(PathBuf::from("/etc/shop-ca.pem")),
            ..Profile::default()
        };
        let client =
            build_client_config(&Config::default(), Some(&p), &ClientOverrides::default())
                .unwrap();
        assert_eq!(
            client.tls,
            TlsVerification::CustomCa(PathBuf::from("/etc/shop-ca.pem"))
        );
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_profile = [unterminated").unwrap();

        assert!(load_config_from(&path).is_err());
        let cfg = load_config_or_default_from(&path);
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults, Defaults::default());
    }

    #[test]
    fn bad_url_is_a_validation_error() {
        let p = profile("not a url");
        let err = build_client_config(&Config::default(), Some(&p), &ClientOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }

    #[test]
    fn profile_name_resolution() {
        let mut cfg = Config::default();
        assert_eq!(cfg.profile_name(None), "default");
        assert_eq!(cfg.profile_name(Some("staging")), "staging");
        cfg.default_profile = Some("prod".into());
        assert_eq!(cfg.profile_name(None), "prod");
    }

    #[test]
    fn save_then_load_round_trips_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                api_url: Some("https://shop.example.com/api".into()),
                email: Some("admin@shop.io".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let prod = loaded.profile("prod").unwrap();
        assert_eq!(prod.email.as_deref(), Some("admin@shop.io"));
        assert_eq!(loaded.defaults.timeout, 30);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
    }

    #[test]
    fn session_files_are_per_profile() {
        let path = session_path("staging");
        assert!(path.ends_with("sessions/staging.json"));
    }

    #[test]
    fn profile_email_wins() {
        let p = Profile {
            email: Some("admin@shop.io".into()),
            ..Profile::default()
        };
        assert_eq!(resolve_email(Some(&p), "default").unwrap(), "admin@shop.io");
    }
}

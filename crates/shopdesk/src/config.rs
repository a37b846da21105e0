//! CLI configuration: thin wrapper around `shopdesk_config`.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--profile, --api-url, --timeout, ...).

use std::path::PathBuf;

use shopdesk_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use shopdesk_config::{
    ClientOverrides, Config, Profile, config_path, load_config_or_default,
    resolve_email, resolve_password, save_config, session_path, store_password,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

/// Translate config + profile + global flags into a `ClientConfig`.
pub fn resolve_client_config(global: &GlobalOpts, config: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let profile = config.profile(&profile_name);

    // An explicit --profile that doesn't exist is a mistake; the implicit
    // default profile may legitimately be absent.
    if profile.is_none() && global.profile.is_some() {
        return Err(profile_not_found(profile_name, config));
    }

    let overrides = ClientOverrides {
        api_url: global.api_url.clone(),
        timeout: global.timeout,
        insecure: global.insecure,
    };
    Ok(shopdesk_config::build_client_config(config, profile, &overrides)?)
}

/// Session file for the active profile, unless `--session-file` overrides it.
pub fn resolve_session_path(global: &GlobalOpts, config: &Config) -> PathBuf {
    global
        .session_file
        .clone()
        .unwrap_or_else(|| session_path(&active_profile_name(global, config)))
}

pub fn profile_not_found(name: String, config: &Config) -> CliError {
    let mut available: Vec<_> = config.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

//! Session command handlers: login, logout, status, whoami.

use std::io::{self, IsTerminal};

use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;
use shopdesk_core::{CoreError, Identity, LoginCredentials};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::Console;
use super::util::{Spinner, prompt_err};

// ── Login ───────────────────────────────────────────────────────────

pub async fn login(console: &Console, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let profile = console.config.profile(&console.profile);
    let interactive = io::stdin().is_terminal();

    let email = match args.email {
        Some(email) => email,
        None => match config::resolve_email(profile, &console.profile) {
            Ok(email) => email,
            Err(_) if interactive => Input::new()
                .with_prompt("Email")
                .interact_text()
                .map_err(prompt_err)?,
            Err(e) => return Err(e.into()),
        },
    };

    let password = match config::resolve_password(profile, &console.profile) {
        Ok(pw) => pw,
        Err(_) if interactive => {
            SecretString::from(rpassword::prompt_password("Password: ").map_err(prompt_err)?)
        }
        Err(e) => return Err(e.into()),
    };

    let credentials = LoginCredentials::new(email, password);
    let outcome = {
        let _spin = Spinner::start("Logging in", global.quiet);
        console.auth.login(&credentials).await
    };
    match outcome {
        Ok(_) => {
            if !global.quiet {
                let who = console
                    .auth
                    .identity()?
                    .and_then(|i| i.name.or(i.email))
                    .unwrap_or_else(|| credentials.email.clone());
                eprintln!("✓ Logged in as {who} (profile '{}')", console.profile);
            }
            Ok(())
        }
        Err(CoreError::Login { message }) => Err(CliError::LoginFailed {
            message,
            profile: console.profile.clone(),
        }),
        Err(other) => Err(other.into()),
    }
}

// ── Logout ──────────────────────────────────────────────────────────

pub fn logout(console: &Console, global: &GlobalOpts) {
    console.auth.logout();
    if !global.quiet {
        eprintln!("✓ Logged out of profile '{}'", console.profile);
    }
}

// ── Status ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatusView {
    profile: String,
    api_url: String,
    session_file: String,
    authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn status(console: &Console, global: &GlobalOpts) {
    let check = console.auth.check();
    let view = StatusView {
        profile: console.profile.clone(),
        api_url: console.data.api_url().to_string(),
        session_file: console.session_path.display().to_string(),
        authenticated: check.authenticated,
        redirect_to: check.redirect_to.map(|r| r.to_string()),
        error: check.error.map(|e| e.to_string()),
    };

    let color = output::should_color(global.color);
    let out = output::render_single(
        global.output,
        &view,
        |v| {
            let session = if v.authenticated {
                output::status_label("logged in", true, color)
            } else {
                output::status_label("not logged in", false, color)
            };
            format!(
                "Profile:  {}\nAPI:      {}\nSession:  {session}\nFile:     {}",
                v.profile, v.api_url, v.session_file
            )
        },
        |v| v.authenticated.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Whoami ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WhoamiView {
    #[serde(flatten)]
    identity: Identity,
    permissions: Vec<String>,
}

pub fn whoami(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    console.require_session()?;
    let identity = console.auth.identity()?.ok_or(CliError::NotLoggedIn)?;
    let permissions = console.auth.permissions()?.unwrap_or_default();
    let view = WhoamiView {
        identity,
        permissions,
    };

    let out = output::render_single(
        global.output,
        &view,
        |v| {
            let id = v
                .identity
                .id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            format!(
                "Name:   {}\nEmail:  {}\nID:     {id}\nRoles:  {}\nAvatar: {}",
                v.identity.name.as_deref().unwrap_or("-"),
                v.identity.email.as_deref().unwrap_or("-"),
                if v.permissions.is_empty() {
                    "-".to_owned()
                } else {
                    v.permissions.join(", ")
                },
                v.identity.avatar,
            )
        },
        |v| {
            v.identity
                .email
                .clone()
                .or_else(|| v.identity.name.clone())
                .unwrap_or_default()
        },
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

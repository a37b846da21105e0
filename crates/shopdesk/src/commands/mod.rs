//! Command dispatch: bridges CLI args -> core adapters -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod custom;
pub mod dashboard;
pub mod resources;
pub mod util;

use std::path::PathBuf;
use std::sync::Arc;

use shopdesk_core::{AuthProvider, CoreError, DataProvider, FileSessionStore, SessionStore};

use crate::cli::{Command, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;

/// Everything a backend-bound command needs: both adapters sharing one
/// REST client and one session file.
pub struct Console {
    pub auth: AuthProvider,
    pub data: DataProvider,
    pub config: Config,
    pub profile: String,
    pub session_path: PathBuf,
}

impl Console {
    pub fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = config::load_config_or_default();
        let client_config = config::resolve_client_config(global, &config)?;
        let client = Arc::new(client_config.build_client()?);

        let session_path = config::resolve_session_path(global, &config);
        let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(&session_path));

        tracing::debug!(
            api_url = %client_config.api_url,
            session = %session_path.display(),
            "console ready"
        );
        Ok(Self {
            auth: AuthProvider::new(Arc::clone(&client), Arc::clone(&store)),
            data: DataProvider::new(client, store),
            profile: config::active_profile_name(global, &config),
            config,
            session_path,
        })
    }

    /// Refuse to go on without a stored session.
    pub fn require_session(&self) -> Result<(), CliError> {
        let check = self.auth.check();
        match check.error {
            Some(err) if !check.authenticated => Err(err.into()),
            _ => Ok(()),
        }
    }

    /// Route a data-call failure through the auth adapter's triage. A
    /// rejected session is dropped before the error is reported.
    pub fn fail(&self, err: CoreError) -> CliError {
        let verdict = self.auth.handle_error(err);
        if verdict.logout {
            CliError::SessionExpired {
                message: verdict.error.to_string(),
            }
        } else {
            verdict.error.into()
        }
    }
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(console, args, global).await,
        Command::Logout => {
            auth::logout(console, global);
            Ok(())
        }
        Command::Status => {
            auth::status(console, global);
            Ok(())
        }
        Command::Whoami => auth::whoami(console, global),
        Command::List(args) => resources::list(console, args, global).await,
        Command::Get(args) => resources::get(console, args, global).await,
        Command::Create(args) => resources::create(console, args, global).await,
        Command::Update(args) => resources::update(console, args, global).await,
        Command::Delete(args) => resources::delete(console, args, global).await,
        Command::Request(args) => custom::handle(console, args, global).await,
        Command::Dashboard => dashboard::handle(console, global).await,
        // Local commands are handled before a console is opened
        Command::Config(_) | Command::Resources | Command::Completions(_) => unreachable!(),
    }
}

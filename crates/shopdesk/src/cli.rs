//! Clap derive structures for the `shopdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Also compiled by `build.rs` for man pages, so it may only depend on clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// shopdesk -- admin console for e-commerce REST backends
#[derive(Debug, Parser)]
#[command(
    name = "shopdesk",
    version,
    about = "Administer an e-commerce backend from the command line",
    long_about = "Log in to an e-commerce admin backend and manage its products, \
        categories, users, orders, carts, payments and blog posts.\n\n\
        The session token is stored per profile and sent as a bearer token \
        with every request.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SHOPDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "SHOPDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHOPDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SHOPDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SHOPDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Session file (defaults to the per-profile file in the data directory)
    #[arg(long, env = "SHOPDESK_SESSION_FILE", global = true, hide_env = true)]
    pub session_file: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Drop the stored session
    Logout,

    /// Show whether a session is stored
    Status,

    /// Show the logged-in user and their roles
    #[command(alias = "me")]
    Whoami,

    /// List the resources the backend exposes
    #[command(alias = "res")]
    Resources,

    /// List records of a resource
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one or more records by id
    Get(GetArgs),

    /// Create a record
    Create(CreateArgs),

    /// Replace a record
    Update(UpdateArgs),

    /// Delete a record
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Send an arbitrary request to the backend
    Request(RequestArgs),

    /// Show store totals and recent products
    #[command(alias = "dash")]
    Dashboard,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Auth ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login email (defaults to the profile's email)
    #[arg(long, short = 'e')]
    pub email: Option<String>,
}

// ── Data ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Resource name (see `shopdesk resources`)
    pub resource: String,

    /// Page number, starting at 1
    #[arg(long)]
    pub page: Option<u32>,

    /// Records per page
    #[arg(long, short = 'l')]
    pub page_size: Option<u32>,

    /// Equality filter, repeatable (e.g. --filter status=PAID)
    #[arg(long, short = 'f', value_name = "FIELD=VALUE")]
    pub filter: Vec<String>,

    /// Sort order, repeatable (e.g. --sort price:desc)
    #[arg(long, short = 's', value_name = "FIELD[:asc|desc]")]
    pub sort: Vec<String>,
}

#[derive(Debug, Args)]
pub struct GetArgs {
    /// Resource name
    pub resource: String,

    /// Record id(s); several ids are fetched concurrently
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// JSON body source shared by create and update.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Inline JSON body
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Read the JSON body from a file
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Resource name
    pub resource: String,

    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Resource name
    pub resource: String,

    /// Record id
    pub id: String,

    #[command(flatten)]
    pub payload: PayloadArgs,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Resource name
    pub resource: String,

    /// Record id
    pub id: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    /// HTTP method
    pub method: HttpMethod,

    /// Absolute URL, or a path relative to the API base URL
    pub url: String,

    /// JSON body
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Query parameter, repeatable
    #[arg(long, value_name = "KEY=VALUE")]
    pub query: Vec<String>,

    /// Extra header, repeatable
    #[arg(long, short = 'H', value_name = "NAME:VALUE")]
    pub header: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the current configuration (passwords redacted)
    Show,

    /// Set a value on the active profile
    Set {
        /// Key: api_url, email, timeout, insecure, ca_cert
        key: String,
        /// Value
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },

    /// Store the profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}

//! Auth and data adapters between `shopdesk-api` and the console front ends.
//!
//! - **[`AuthProvider`]**: login against `POST /auth/login`, logout, session
//!   checks, permissions, identity, and error triage. A 401 or 403 from any
//!   call forces a logout through [`AuthProvider::handle_error`].
//!
//! - **[`DataProvider`]**: resource CRUD plus custom requests. The bearer
//!   token is read from the [`SessionStore`] on every call and attached to
//!   that request only.
//!
//! - **[`SessionStore`]**: where the token and user record live.
//!   [`FileSessionStore`] persists them between CLI invocations,
//!   [`MemorySessionStore`] keeps them in-process.
//!
//! - **Resource registry** ([`resource`]): the backend resources and the
//!   operations each one supports.

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod resource;
pub mod session;

pub use auth::{
    AuthProvider, CheckResponse, LoginCredentials, LoginOutcome, LogoutOutcome, OnErrorResponse,
    Route,
};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT, TlsVerification};
pub use dashboard::DashboardSummary;
pub use data::{DataProvider, DataResponse};
pub use error::CoreError;
pub use resource::{Capability, RESOURCES, ResourceDef};
pub use session::store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use session::{Identity, Session, UserRecord};

// Query and page types callers need to drive the data adapter.
pub use shopdesk_api::{
    CrudFilter, CustomRequest, DEFAULT_PAGE_SIZE, FilterOperator, ListPage, ListQuery, Method,
    SortOrder,
};

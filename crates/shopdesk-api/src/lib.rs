// shopdesk-api: Async Rust client for e-commerce admin REST backends

pub mod auth;
pub mod error;
pub mod rest;
pub mod transport;

pub use auth::{BearerToken, LOGIN_PATH, LoginResponse};
pub use error::Error;
pub use rest::client::{CustomRequest, RestClient};
pub use rest::envelope::{ListPage, ListShape, decode_list};
pub use rest::query::{
    CrudFilter, DEFAULT_PAGE_SIZE, FilterOperator, ListQuery, LogicalOperator, Pagination,
    SortOrder, Sorter,
};
pub use transport::{TlsMode, TransportConfig};

// Re-exported so callers can build custom requests without a direct reqwest dependency.
pub use reqwest::Method;

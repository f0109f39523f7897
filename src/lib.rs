//! Devportal: admin and contributor account API with database diagnostics.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{AppConfig, Environment, StoreBackend};
pub use error::{AppError, ConfigError};
pub use response::{paginated, success, Envelope, FieldError, Pagination};
pub use routes::{api_routes, app, common_routes};
pub use state::AppState;
pub use store::{
    connect_pool, ensure_account_tables, ensure_database_exists, AccountStore, MemoryAccountStore,
    PgAccountStore,
};

//! HTTP handlers: account auth, admin views and database diagnostics.

pub mod admin;
pub mod auth;
pub mod diagnostics;
pub use admin::list_contributors;
pub use auth::{admin_login, admin_signin, contributor_login, contributor_signin};
pub use diagnostics::{test_connection, test_db};

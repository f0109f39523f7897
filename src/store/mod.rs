//! Account persistence: one trait, a PostgreSQL implementation and an in-memory one.

mod memory;
mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::{connect_pool, ensure_account_tables, ensure_database_exists, PgAccountStore};

use crate::error::AppError;
use crate::models::{Admin, Developer, NewAdmin, NewDeveloper};
use async_trait::async_trait;

/// Typed lookups and creates for the two account kinds.
///
/// Creates are atomic against uniqueness: a duplicate email (admins) or
/// github id / username / email (developers) yields `AppError::Conflict`
/// even when two requests race past the existence check.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Short backend name reported by the diagnostic routes.
    fn kind(&self) -> &'static str;

    /// Round trip through the backing store (`SELECT 1` for PostgreSQL).
    async fn ping(&self) -> Result<(), AppError>;

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError>;

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, AppError>;

    async fn find_developer_by_email(&self, email: &str) -> Result<Option<Developer>, AppError>;

    async fn find_developer_by_github_id(
        &self,
        github_id: &str,
    ) -> Result<Option<Developer>, AppError>;

    async fn find_developer_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Developer>, AppError>;

    async fn create_developer(&self, developer: NewDeveloper) -> Result<Developer, AppError>;

    /// One page of developers ordered by creation time, plus the total count.
    async fn list_developers(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<Developer>, u64), AppError>;
}

pub(crate) const ADMIN_CONFLICT: &str = "An admin with this email already exists";
pub(crate) const DEVELOPER_CONFLICT: &str =
    "A contributor with this GitHub id, username or email already exists";

//! PostgreSQL-backed `AccountStore` plus pool and DDL bootstrap.

use super::{AccountStore, ADMIN_CONFLICT, DEVELOPER_CONFLICT};
use crate::error::AppError;
use crate::models::{Admin, Developer, NewAdmin, NewDeveloper};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;
use uuid::Uuid;

const ADMIN_COLUMNS: &str = "id, email, password_hash, name, created_at";
const DEVELOPER_COLUMNS: &str = "id, github_id, username, email, password_hash, created_at";

/// Create the shared pool once at startup. Close it on shutdown with `PgPool::close`.
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Create `admins` and `developers` if they do not exist.
/// Uniqueness lives in the schema so inserts can use `ON CONFLICT`. Emails are
/// stored as submitted and unique by `lower(email)`.
pub async fn ensure_account_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admins (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            name TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS developers (
            id UUID PRIMARY KEY,
            github_id TEXT NOT NULL UNIQUE,
            username TEXT NOT NULL UNIQUE,
            email TEXT,
            password_hash TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    for ddl in [
        "CREATE UNIQUE INDEX IF NOT EXISTS admins_email_lower_idx ON admins (lower(email))",
        "CREATE UNIQUE INDEX IF NOT EXISTS developers_email_lower_idx ON developers (lower(email))",
        "CREATE INDEX IF NOT EXISTS developers_created_at_idx ON developers (created_at, id)",
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::info!("account tables ready");
    Ok(())
}

/// Connect to the `postgres` maintenance database and create the target database if missing.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no database path".into()))?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let mut parts = path_and_query.splitn(2, '?');
    let db_name = parts.next().unwrap_or("").trim().to_string();
    let query = parts.next().map(|q| format!("?{}", q)).unwrap_or_default();
    let admin_url = format!("{}postgres{}", &url[..path_start], query);
    Ok((admin_url, db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// `predicate` compares against `$1`.
    async fn find_developer_by(
        &self,
        predicate: &'static str,
        value: &str,
    ) -> Result<Option<Developer>, AppError> {
        let sql = format!(
            "SELECT {} FROM developers WHERE {}",
            DEVELOPER_COLUMNS, predicate
        );
        let row = sqlx::query_as::<_, Developer>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), AppError> {
        let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        if one != 1 {
            return Err(AppError::Internal(format!("SELECT 1 returned {}", one)));
        }
        Ok(())
    }

    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let sql = format!("SELECT {} FROM admins WHERE lower(email) = lower($1)", ADMIN_COLUMNS);
        let row = sqlx::query_as::<_, Admin>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_admin(&self, admin: NewAdmin) -> Result<Admin, AppError> {
        let sql = format!(
            r#"
            INSERT INTO admins ({cols})
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING {cols}
            "#,
            cols = ADMIN_COLUMNS
        );
        let row = sqlx::query_as::<_, Admin>(&sql)
            .bind(Uuid::new_v4())
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(&admin.name)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| AppError::Conflict(ADMIN_CONFLICT.into()))
    }

    async fn find_developer_by_email(&self, email: &str) -> Result<Option<Developer>, AppError> {
        self.find_developer_by("lower(email) = lower($1)", email).await
    }

    async fn find_developer_by_github_id(
        &self,
        github_id: &str,
    ) -> Result<Option<Developer>, AppError> {
        self.find_developer_by("github_id = $1", github_id).await
    }

    async fn find_developer_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Developer>, AppError> {
        self.find_developer_by("username = $1", username).await
    }

    async fn create_developer(&self, developer: NewDeveloper) -> Result<Developer, AppError> {
        let sql = format!(
            r#"
            INSERT INTO developers ({cols})
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            RETURNING {cols}
            "#,
            cols = DEVELOPER_COLUMNS
        );
        let row = sqlx::query_as::<_, Developer>(&sql)
            .bind(Uuid::new_v4())
            .bind(&developer.github_id)
            .bind(&developer.username)
            .bind(&developer.email)
            .bind(&developer.password_hash)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| AppError::Conflict(DEVELOPER_CONFLICT.into()))
    }

    async fn list_developers(
        &self,
        limit: u32,
        offset: u64,
    ) -> Result<(Vec<Developer>, u64), AppError> {
        let mut tx = self.pool.begin().await?;
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM developers")
            .fetch_one(&mut *tx)
            .await?;
        let sql = format!(
            "SELECT {} FROM developers ORDER BY created_at, id LIMIT $1 OFFSET $2",
            DEVELOPER_COLUMNS
        );
        let rows = sqlx::query_as::<_, Developer>(&sql)
            .bind(i64::from(limit))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok((rows, u64::try_from(total).unwrap_or(0)))
    }
}

//! Database connectivity checks for deployment troubleshooting.
//!
//! Both routes always answer 200; failures are reported in the body.

use crate::config::redact_url;
use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;
use std::time::{Duration, Instant};

const CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const URL_PREVIEW_CHARS: usize = 20;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticReport {
    pub success: bool,
    pub test_result: TestResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub ok: bool,
    pub message: String,
    pub duration_ms: u64,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub database_url: String,
    pub environment: &'static str,
    pub store: &'static str,
    pub access_path: &'static str,
}

/// GET /api/test-connection: `SELECT 1` through the shared store.
pub async fn test_connection(State(state): State<AppState>) -> Json<DiagnosticReport> {
    let started = Instant::now();
    let outcome = state.store.ping().await;
    Json(report(&state, "pool", outcome, started))
}

/// GET /api/test-db: `SELECT 1` over a fresh connection opened from `DATABASE_URL`.
pub async fn test_db(State(state): State<AppState>) -> Json<DiagnosticReport> {
    let started = Instant::now();
    let outcome = match state.config.database_url.as_deref() {
        Some(url) => match tokio::time::timeout(CHECK_TIMEOUT, check_direct(url)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Internal(format!(
                "connection attempt timed out after {}s",
                CHECK_TIMEOUT.as_secs()
            ))),
        },
        None => Err(AppError::BadRequest("DATABASE_URL is not set".into())),
    };
    Json(report(&state, "direct", outcome, started))
}

async fn check_direct(database_url: &str) -> Result<(), AppError> {
    let opts = PgConnectOptions::from_str(database_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn = opts.connect().await?;
    let (one,): (i32,) = sqlx::query_as("SELECT 1").fetch_one(&mut conn).await?;
    conn.close().await?;
    if one != 1 {
        return Err(AppError::Internal(format!("SELECT 1 returned {}", one)));
    }
    Ok(())
}

fn report(
    state: &AppState,
    access_path: &'static str,
    outcome: Result<(), AppError>,
    started: Instant,
) -> DiagnosticReport {
    let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let (ok, message) = match outcome {
        Ok(()) => (true, "Database connection successful".to_string()),
        Err(e) => {
            tracing::warn!(access_path, error = %e, "database check failed");
            (false, e.to_string())
        }
    };
    DiagnosticReport {
        success: ok,
        test_result: TestResult {
            ok,
            message,
            duration_ms,
            diagnostics: Diagnostics {
                database_url: url_preview(state.config.database_url.as_deref()),
                environment: state.config.environment.as_str(),
                store: state.store.kind(),
                access_path,
            },
        },
    }
}

/// First characters of the redacted URL, or `"not set"`.
fn url_preview(url: Option<&str>) -> String {
    match url {
        Some(url) => {
            let redacted = redact_url(url);
            let preview: String = redacted.chars().take(URL_PREVIEW_CHARS).collect();
            format!("{}...", preview)
        }
        None => "not set".to_string(),
    }
}

//! Admin-only views.

use crate::error::AppError;
use crate::extractors::BearerClaims;
use crate::models::ContributorSummary;
use crate::response::{paginated, Pagination};
use crate::service::Role;
use crate::state::AppState;
use axum::extract::{Query, State};
use std::collections::HashMap;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 100;

/// Page and limit from query params. Unparseable values fall back to defaults.
pub fn page_window(params: &HashMap<String, String>) -> (u32, u32) {
    let page = params
        .get("page")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);
    let limit = params
        .get("limit")
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// GET /api/admin/contributors?page=&limit=
pub async fn list_contributors(
    State(state): State<AppState>,
    BearerClaims(claims): BearerClaims,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    if claims.role != Role::Admin {
        return Err(AppError::Forbidden("Admin access required".into()));
    }
    let (page, limit) = page_window(&params);
    let offset = u64::from(page - 1) * u64::from(limit);
    let (rows, total) = state.store.list_developers(limit, offset).await?;
    let data: Vec<ContributorSummary> = rows.iter().map(ContributorSummary::from).collect();
    Ok(paginated(data, Pagination::new(page, limit, total)))
}

//! API routes mounted under `/api`.

use crate::handlers::{
    admin_login, admin_signin, contributor_login, contributor_signin, list_contributors,
    test_connection, test_db,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

/// The `contributer` spelling is part of the published API.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/test-connection", get(test_connection))
        .route("/test-db", get(test_db))
        .route("/auth/admin/login", post(admin_login))
        .route("/auth/admin/signin", post(admin_signin))
        .route("/auth/contributer/login", post(contributor_login))
        .route("/auth/contributer/signin", post(contributor_signin))
        .route("/admin/contributors", get(list_contributors))
        .with_state(state)
}

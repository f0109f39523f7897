mod common;

use axum::http::StatusCode;
use common::spawn_app;
use serde_json::json;

const LIST: &str = "/api/admin/contributors";

async fn admin_token(app: &common::TestApp) -> String {
    let (_, body) = app
        .post_json(
            "/api/auth/admin/signin",
            &json!({ "email": "root@example.com", "password": "rootroot" }),
        )
        .await;
    body["token"].as_str().unwrap().to_string()
}

async fn seed_contributors(app: &common::TestApp, n: usize) -> Option<String> {
    let mut token = None;
    for i in 0..n {
        let (status, body) = app
            .post_json(
                "/api/auth/contributer/signin",
                &json!({ "githubId": i, "username": format!("dev{:02}", i) }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        token = body["token"].as_str().map(String::from);
    }
    token
}

#[tokio::test]
async fn requires_a_bearer_token() {
    let app = spawn_app();
    let (status, body) = app.get(LIST, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    let (status, _) = app.get(LIST, Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn contributor_token_is_forbidden() {
    let app = spawn_app();
    let token = seed_contributors(&app, 1).await.unwrap();
    let (status, body) = app.get(LIST, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Admin access required");
}

#[tokio::test]
async fn admin_gets_paginated_contributors() {
    let app = spawn_app();
    let token = admin_token(&app).await;
    seed_contributors(&app, 21).await;

    let (status, body) = app.get(&format!("{}?page=3&limit=10", LIST), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(
        body["pagination"],
        json!({ "page": 3, "limit": 10, "total": 21, "totalPages": 3 })
    );
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["username"], "dev20");
}

#[tokio::test]
async fn default_window_is_first_ten() {
    let app = spawn_app();
    let token = admin_token(&app).await;
    seed_contributors(&app, 12).await;

    let (status, body) = app.get(LIST, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["totalPages"], 2);
    assert_eq!(body["data"][0]["githubId"], "0");
}

#[tokio::test]
async fn token_from_another_secret_is_rejected() {
    let app = spawn_app();
    let other = common::spawn_app_with(&[("JWT_SECRET", "someone-else")]);
    let foreign = admin_token(&other).await;
    let (status, _) = app.get(LIST, Some(&foreign)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

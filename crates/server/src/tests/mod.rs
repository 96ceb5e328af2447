// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router tests for the server.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use envdash_api::AuthenticationService;
use envdash_persistence::Persistence;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router};

/// Helper to create test app state with in-memory persistence.
fn create_test_app_state() -> AppState {
    let persistence: Persistence = Persistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_password_cost(4); // bcrypt minimum cost; bcrypt::MIN_COST is private
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        auth: AuthenticationService::default(),
        legacy_page_limit: 100,
    }
}

fn create_test_app() -> Router {
    build_router(create_test_app_state())
}

/// Sends a request and returns the status with the parsed JSON body.
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    read_response(app, request).await
}

async fn read_response(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, body)
}

/// Signs up and logs in a test account, returning its bearer token.
async fn create_test_token(app: &Router) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({
            "name": "Air Analyst",
            "email": "analyst@example.com",
            "password": "Benzene-42",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "analyst@example.com", "password": "Benzene-42" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app: Router = create_test_app();

    let (status, body) = send(&app, "GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "API is running." }));
}

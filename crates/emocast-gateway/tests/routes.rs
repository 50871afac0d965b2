// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use emocast_gateway::{GatewayState, router};
use emocast_test_utils::{MockGateway, TestHarness};
use serde_json::{Value, json};
use tower::ServiceExt;

struct App {
    router: Router,
    gateway: Arc<MockGateway>,
}

async fn app(responses: &[&str]) -> App {
    let h = TestHarness::builder()
        .with_mock_responses(responses.iter().map(|s| s.to_string()).collect())
        .build()
        .await
        .unwrap();
    let state = GatewayState {
        pipeline: Arc::new(h.pipeline),
        default_user: "anonymous".to_string(),
    };
    App {
        router: router(state),
        gateway: h.gateway,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-user-id", "user-9")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn compute_then_read_emotion() {
    let app = app(&[r#"{"felicidad":0.9,"tristeza":0.1}"#]).await;

    let (status, body) = send(
        &app.router,
        post("/compute/emotion", json!({"message": "I'm so happy today"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["emotions"]["felicidad"], 0.9);

    let id = body["id"].as_str().unwrap().to_string();
    let (status, reread) = send(&app.router, get(&format!("/emotion/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reread, body);
    assert_eq!(app.gateway.call_count(), 1);
}

#[tokio::test]
async fn unique_route_returns_the_message_set() {
    let app = app(&[r#"{"joy":0.3}"#]).await;
    let (status, body) = send(
        &app.router,
        post("/compute/emotion/unique", json!({"messages": ["a", "b"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"], json!(["a", "b"]));
}

#[tokio::test]
async fn blank_message_is_400_with_endpoint() {
    let app = app(&[]).await;
    let (status, body) = send(&app.router, post("/compute/emotion", json!({"message": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["endpoint"], "/compute/emotion");
    assert!(body["message"].as_str().unwrap().contains("message"));
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn wrong_body_shape_is_400() {
    let app = app(&[]).await;
    let (status, body) = send(&app.router, post("/compute/keyphrase", json!({"text": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["endpoint"], "/compute/keyphrase");
}

#[tokio::test]
async fn unknown_ids_are_404() {
    let app = app(&[]).await;
    for uri in [
        "/emotion/nope",
        "/emotion/batch/nope",
        "/keyphrase/nope",
        "/campaign/nope",
        "/clean/batch/nope",
    ] {
        let (status, body) = send(&app.router, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["endpoint"], uri);
    }
}

#[tokio::test]
async fn campaign_with_missing_dependencies_is_404() {
    let app = app(&[]).await;
    let (status, body) = send(
        &app.router,
        post(
            "/compute/campaign",
            json!({"keyphraseId": "k-1", "brandId": "b-1", "emotionsId": "e-1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["endpoint"], "/compute/campaign");
    assert_eq!(app.gateway.call_count(), 0);
}

#[tokio::test]
async fn upstream_failure_is_500_without_detail() {
    let app = app(&["no json here"]).await;
    let (status, body) = send(&app.router, post("/compute/emotion", json!({"message": "hi"}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["message"].as_str().unwrap().contains("no json here"));
}

#[tokio::test]
async fn batch_route_returns_batch_id() {
    let app = app(&[r#"{"joy":0.1}"#, r#"{"joy":0.2}"#]).await;
    let (status, body) = send(
        &app.router,
        post("/compute/emotion/batch", json!({"messages": ["one", "two"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"].as_array().unwrap().len(), 2);

    let batch_id = body["batchId"].as_str().unwrap();
    let (status, reread) = send(&app.router, get(&format!("/emotion/batch/{batch_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reread["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn health_is_ok() {
    let app = app(&[]).await;
    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

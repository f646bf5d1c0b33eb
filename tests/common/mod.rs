use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use countdown_keeper::{
    create_router,
    runtime::{RuntimeConfig, TimerService},
    storage::MemoryGateway,
    AppState,
};

pub const CATEGORIES: [&str; 3] = ["Work", "Study", "Break"];

/// Router over an in-memory store, plus the service handle and the gateway
pub async fn build_test_app() -> (Router, TimerService, Arc<MemoryGateway>) {
    let gateway = Arc::new(MemoryGateway::new());
    let (timers, _) = TimerService::spawn(gateway.clone(), RuntimeConfig::default()).await;
    let state = Arc::new(AppState::new(
        timers.clone(),
        CATEGORIES.iter().map(|c| c.to_string()).collect(),
        0,
        "127.0.0.1".to_string(),
    ));
    (create_router(state), timers, gateway)
}

pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, None).await
}

/// Create a timer and return its id
pub async fn create(app: &Router, name: &str, category: &str, seconds: u64) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/timers",
        Some(serde_json::json!({ "name": name, "category": category, "seconds": seconds })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["timer"]["id"].as_str().unwrap().to_string()
}

//! Integration tests for the timer endpoints.

mod common;

use std::time::Duration;

use axum::http::{Method, StatusCode};
use common::{build_test_app, create, get, post, send};
use countdown_keeper::storage::{StorageGateway, TIMERS_KEY};
use serde_json::json;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn create_returns_running_timer_with_view_fields() {
    let (app, _, _) = build_test_app().await;

    let (status, json) = send(
        &app,
        Method::POST,
        "/timers",
        Some(json!({ "name": "Tea", "category": "Break", "minutes": 1, "seconds": 30 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let timer = &json["timer"];
    assert_eq!(timer["name"], "Tea");
    assert_eq!(timer["duration"], 90);
    assert_eq!(timer["remainingTime"], 90);
    assert_eq!(timer["status"], "running");
    assert_eq!(timer["halfAlert"], false);
    assert_eq!(timer["progress"], 0.0);
    assert_eq!(timer["timeLeft"], "1m 30s");
}

#[tokio::test(start_paused = true)]
async fn create_rejects_invalid_input() {
    let (app, _, _) = build_test_app().await;

    for body in [
        json!({ "name": "", "category": "Work", "seconds": 10 }),
        json!({ "name": "Focus", "category": "Work", "seconds": 0 }),
        json!({ "name": "Focus", "category": "Gardening", "seconds": 10 }),
    ] {
        let (status, json) = send(&app, Method::POST, "/timers", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
    }

    let (_, json) = get(&app, "/timers").await;
    assert_eq!(json["count"], 0);
}

#[tokio::test(start_paused = true)]
async fn malformed_bodies_return_the_error_envelope() {
    let (app, _, _) = build_test_app().await;

    for body in [
        json!({ "name": "Focus", "category": "Work", "seconds": -5 }),
        json!({ "category": "Work", "seconds": 10 }),
        json!({ "name": "Focus", "category": "Work", "seconds": "ten" }),
    ] {
        let (status, json) = send(&app, Method::POST, "/timers", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().starts_with("Invalid request body"));
    }

    let (status, json) = post(&app, "/timers").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");

    let id = create(&app, "Focus", "Work", 10).await;
    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/timers/{id}/half-alert"),
        Some(json!({ "enabled": "yes" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], "error");

    let (_, json) = get(&app, "/timers").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["timers"][0]["halfAlert"], false);
}

#[tokio::test(start_paused = true)]
async fn unknown_timer_returns_404() {
    let (app, _, _) = build_test_app().await;

    let (status, _) = get(&app, "/timers/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = post(&app, "/timers/nope/toggle").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/timers/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn toggle_pause_restart_and_complete() {
    let (app, _, _) = build_test_app().await;
    let id = create(&app, "Focus", "Work", 10).await;

    sleep(Duration::from_millis(4500)).await;
    let (_, json) = get(&app, &format!("/timers/{id}")).await;
    assert_eq!(json["remainingTime"], 6);

    let (status, json) = post(&app, &format!("/timers/{id}/toggle")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timer"]["status"], "paused");
    assert_eq!(json["message"], "Timer paused");

    let (_, json) = post(&app, &format!("/timers/{id}/restart")).await;
    assert_eq!(json["timer"]["remainingTime"], 10);
    assert_eq!(json["timer"]["status"], "paused");

    let (_, json) = post(&app, &format!("/timers/{id}/start")).await;
    assert_eq!(json["timer"]["status"], "running");

    sleep(Duration::from_millis(10500)).await;
    let (_, json) = get(&app, &format!("/timers/{id}")).await;
    assert_eq!(json["status"], "completed");
    assert_eq!(json["remainingTime"], 0);
    assert_eq!(json["progress"], 1.0);

    let (status, _) = post(&app, &format!("/timers/{id}/start")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, json) = get(&app, "/history").await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["timers"][0]["id"], id);
}

#[tokio::test(start_paused = true)]
async fn bulk_pause_and_start() {
    let (app, timers, _) = build_test_app().await;
    create(&app, "A", "Work", 5).await;
    create(&app, "B", "Study", 5).await;

    sleep(Duration::from_millis(1500)).await;
    let (status, json) = post(&app, "/timers/pause-all").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 2);
    for timer in json["timers"].as_array().unwrap() {
        assert_eq!(timer["status"], "paused");
        assert_eq!(timer["remainingTime"], 4);
    }
    assert!(timers.snapshot().await.unwrap().active_ticks.is_empty());

    sleep(Duration::from_secs(5)).await;
    let (_, json) = post(&app, "/timers/start-all").await;
    for timer in json["timers"].as_array().unwrap() {
        assert_eq!(timer["status"], "running");
        assert_eq!(timer["remainingTime"], 4);
    }
    assert_eq!(timers.snapshot().await.unwrap().active_ticks.len(), 2);

    let (_, json) = get(&app, "/status").await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["counts"]["running"], 2);
    assert_eq!(json["active_ticks"], 2);
    assert_eq!(json["last_action"], "start-all");
}

#[tokio::test(start_paused = true)]
async fn delete_removes_timer_from_list_and_storage() {
    let (app, timers, gateway) = build_test_app().await;
    let id = create(&app, "Gone", "Work", 30).await;

    let (status, json) = send(&app, Method::DELETE, &format!("/timers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timer"]["id"], id);

    let (_, json) = get(&app, "/timers").await;
    assert_eq!(json["count"], 0);
    assert!(timers.snapshot().await.unwrap().active_ticks.is_empty());
    assert_eq!(gateway.get(TIMERS_KEY).await.unwrap(), Some(json!([])));
}

#[tokio::test(start_paused = true)]
async fn list_filters_by_category() {
    let (app, _, _) = build_test_app().await;
    create(&app, "A", "Work", 30).await;
    create(&app, "B", "Study", 30).await;
    create(&app, "C", "Work", 30).await;

    let (_, json) = get(&app, "/timers?category=Work").await;
    assert_eq!(json["category"], "Work");
    assert_eq!(json["count"], 2);

    let (_, json) = get(&app, "/timers?category=All").await;
    assert_eq!(json["category"], "All");
    assert_eq!(json["count"], 3);
}

#[tokio::test(start_paused = true)]
async fn half_alert_can_be_switched() {
    let (app, _, _) = build_test_app().await;
    let id = create(&app, "Half", "Work", 30).await;

    let (status, json) = send(
        &app,
        Method::PUT,
        &format!("/timers/{id}/half-alert"),
        Some(json!({ "enabled": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["timer"]["halfAlert"], true);
    assert_eq!(json["message"], "Halfway alert enabled");
}

#[tokio::test(start_paused = true)]
async fn categories_and_health() {
    let (app, _, _) = build_test_app().await;

    let (status, json) = get(&app, "/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!(["Work", "Study", "Break"]));

    let (status, json) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

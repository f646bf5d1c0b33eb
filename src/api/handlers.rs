//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    model::{filter::ALL_CATEGORIES, CategoryFilter, NewTimer},
    state::AppState,
};
use super::extract::ApiJson;
use super::responses::{
    ApiError, HealthResponse, StatusCounts, StatusResponse, TimerListResponse,
    TimerResponse, TimerView,
};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Optional `?category=` query
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    fn filter(&self) -> CategoryFilter {
        CategoryFilter::from_label(self.category.as_deref())
    }

    fn label(&self) -> String {
        match self.filter() {
            CategoryFilter::All => ALL_CATEGORIES.to_string(),
            CategoryFilter::Category(category) => category,
        }
    }
}

/// Body of PUT /timers/:id/half-alert
#[derive(Debug, Deserialize)]
pub struct HalfAlertRequest {
    pub enabled: bool,
}

/// Handle GET /timers - List timers, optionally by category
pub async fn list_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<TimerListResponse> {
    let timers = state.timers.list(query.filter()).await?;
    Ok(Json(TimerListResponse::new(query.label(), timers)))
}

/// Handle POST /timers - Create a running timer
pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(new): ApiJson<NewTimer>,
) -> Result<(StatusCode, Json<TimerResponse>), ApiError> {
    if let Err(e) = state.check_category(&new.category) {
        warn!("Rejected new timer: {}", e);
        return Err(e.into());
    }

    let timer = state.timers.create(new).await.map_err(|e| {
        warn!("Rejected new timer: {}", e);
        ApiError::from(e)
    })?;
    state.record_action("create");
    info!("Create endpoint called - timer {} started", timer.id);
    Ok((StatusCode::CREATED, Json(TimerResponse::new("Timer created", timer))))
}

/// Handle GET /timers/:id
pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TimerView> {
    Ok(Json(state.timers.get(&id).await?.into()))
}

/// Handle DELETE /timers/:id - Delete a timer and tear down its tick
pub async fn delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TimerResponse> {
    let timer = state.timers.delete(&id).await?;
    state.record_action("delete");
    Ok(Json(TimerResponse::new("Timer deleted", timer)))
}

/// Handle POST /timers/:id/toggle - Pause a running timer, start any other
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TimerResponse> {
    let timer = state.timers.toggle(&id).await?;
    state.record_action("toggle");
    let message = if timer.is_running() { "Timer started" } else { "Timer paused" };
    Ok(Json(TimerResponse::new(message, timer)))
}

/// Handle POST /timers/:id/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TimerResponse> {
    let timer = state.timers.start(&id).await?;
    state.record_action("start");
    Ok(Json(TimerResponse::new("Timer started", timer)))
}

/// Handle POST /timers/:id/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TimerResponse> {
    let timer = state.timers.pause(&id).await?;
    state.record_action("pause");
    Ok(Json(TimerResponse::new("Timer paused", timer)))
}

/// Handle POST /timers/:id/restart - Reset to the full duration, paused
pub async fn restart_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TimerResponse> {
    let timer = state.timers.restart(&id).await?;
    state.record_action("restart");
    Ok(Json(TimerResponse::new("Timer restarted", timer)))
}

/// Handle PUT /timers/:id/half-alert
pub async fn half_alert_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<HalfAlertRequest>,
) -> ApiResult<TimerResponse> {
    let timer = state.timers.set_half_alert(&id, request.enabled).await?;
    state.record_action("half-alert");
    let message = if request.enabled { "Halfway alert enabled" } else { "Halfway alert disabled" };
    Ok(Json(TimerResponse::new(message, timer)))
}

/// Handle POST /timers/start-all
pub async fn start_all_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerListResponse> {
    let timers = state.timers.start_all().await?;
    state.record_action("start-all");
    info!("Start-all endpoint called");
    Ok(Json(TimerListResponse::new(ALL_CATEGORIES, timers)))
}

/// Handle POST /timers/pause-all
pub async fn pause_all_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerListResponse> {
    let timers = state.timers.pause_all().await?;
    state.record_action("pause-all");
    info!("Pause-all endpoint called");
    Ok(Json(TimerListResponse::new(ALL_CATEGORIES, timers)))
}

/// Handle GET /history - Completed timers, optionally by category
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<TimerListResponse> {
    let timers = state.timers.history(query.filter()).await?;
    Ok(Json(TimerListResponse::new(query.label(), timers)))
}

/// Handle GET /categories
pub async fn categories_handler(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.categories.clone())
}

/// Handle GET /status - Counts per status and live ticks
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let snapshot = state.timers.snapshot().await?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        total: snapshot.timers.len(),
        counts: StatusCounts::tally(&snapshot.timers),
        active_ticks: snapshot.active_ticks.len(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}


//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{self, Stream};
use tracing::{error, info, warn};

use crate::{
    engine::Snapshot,
    state::{AppState, StateError},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

fn gesture_response(action: &str, result: Result<Snapshot, StateError>) -> Response {
    match result {
        Ok(snapshot) => {
            info!("{} endpoint called - countdown {} at {}", action, snapshot.state, snapshot);
            Json(ApiResponse::new(format!("{} applied", action), snapshot)).into_response()
        }
        Err(StateError::Engine(e)) => {
            warn!("Rejected {}: {}", action, e);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string()))).into_response()
        }
        Err(e) => {
            error!("Failed to apply {}: {}", action, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Handle POST /input/:digit - Press a keypad digit
pub async fn input_handler(
    State(state): State<Arc<AppState>>,
    Path(digit): Path<i32>,
) -> Response {
    gesture_response("Input", state.input(digit))
}

/// Handle POST /backspace - Remove the last digit
pub async fn backspace_handler(State(state): State<Arc<AppState>>) -> Response {
    gesture_response("Backspace", state.backspace())
}

/// Handle POST /reset - Clear the countdown
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Response {
    gesture_response("Reset", state.reset())
}

/// Handle POST /toggle - Start, pause or resume the countdown
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Response {
    gesture_response("Toggle", state.toggle())
}

/// Handle GET /status - Return current countdown status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let countdown = match state.snapshot() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get countdown snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();
    
    Ok(Json(StatusResponse {
        countdown,
        display: countdown.to_string(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every published snapshot
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let rx = state.subscribe().map_err(|e| {
        error!("Failed to subscribe to countdown: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Current value first, then one event per change
    let events = stream::unfold((rx, true), |(mut rx, first)| async move {
        if !first && rx.changed().await.is_err() {
            return None;
        }
        let snapshot = *rx.borrow_and_update();
        Some((snapshot_event(&snapshot), (rx, false)))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn snapshot_event(snapshot: &Snapshot) -> Result<Event, Infallible> {
    let name = snapshot.state.as_str();
    Ok(match Event::default().event(name).json_data(snapshot) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to encode snapshot event: {}", e);
            Event::default().event(name).data(snapshot.to_string())
        }
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

// HTTP request handlers
use crate::infrastructure::http_response::{json_response, png_response};
use crate::infrastructure::json_mapper::{
    StateUpdateDto, controls_to_dto, dashboard_to_dto, state_to_dto, state_update_from_dto,
};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Check if the client accepts Brotli compression
fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

fn unprocessable(message: String) -> axum::response::Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorBody { error: message }),
    )
        .into_response()
}

/// Widget-construction description for the presentation shell
pub async fn get_controls(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let dto = controls_to_dto(state.mapping_service.dataset());
    match json_response(&dto, accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Current mapping state
pub async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.mapping_service.snapshot().await;
    match json_response(&state_to_dto(&snapshot), false).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Apply a partial state update; out-of-bounds values leave the state
/// unchanged and come back as 422
pub async fn update_state(
    State(state): State<Arc<AppState>>,
    Json(dto): Json<StateUpdateDto>,
) -> impl IntoResponse {
    let update = match state_update_from_dto(dto) {
        Ok(update) => update,
        Err(e) => return unprocessable(e.to_string()),
    };

    match state.mapping_service.update(update).await {
        Ok(new_state) => match json_response(&state_to_dto(&new_state), false).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        },
        Err(e) => unprocessable(e.to_string()),
    }
}

/// Rebuild the full dashboard from current state
pub async fn render_dashboard(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let snapshot = state.mapping_service.snapshot().await;
    let view = state.dashboard_service.render(&snapshot);
    match json_response(&dashboard_to_dto(&view), accepts_brotli(&headers)).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// The shaded overlay for current state, PNG-encoded
pub async fn overlay_png(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.mapping_service.snapshot().await;
    let view = state.dashboard_service.render(&snapshot);
    match png_response(&view.map.overlay) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

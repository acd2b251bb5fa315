//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::{error, info};

use crate::{
    error::TimerError,
    state::{AppState, CountdownSnapshot},
    timer::{lookup_mode, Mode, ModeConfig, MODES},
};
use super::responses::{ApiResponse, ErrorResponse, HealthResponse, StatusResponse};

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = match &self {
            TimerError::UnknownMode(_) => StatusCode::NOT_FOUND,
            TimerError::InvalidDuration(_) => StatusCode::BAD_REQUEST,
            TimerError::StateUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(ErrorResponse::new(&self))).into_response()
    }
}

fn respond(
    message: &str,
    result: Result<CountdownSnapshot, TimerError>,
) -> Result<Json<ApiResponse>, TimerError> {
    let countdown = result?;
    info!("{}", message);
    Ok(Json(ApiResponse::new(message.to_string(), countdown)))
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, TimerError> {
    respond("Countdown started", state.start())
}

/// Handle POST /pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, TimerError> {
    respond("Countdown paused", state.pause())
}

/// Handle POST /reset - Restore the full duration of the current mode
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, TimerError> {
    respond("Countdown reset", state.reset())
}

/// Handle POST /skip - Move to the next mode without the chime
pub async fn skip_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, TimerError> {
    respond("Skipped to next mode", state.skip())
}

/// Handle POST /modes/:mode_id - Switch to a specific mode
pub async fn switch_mode_handler(
    State(state): State<Arc<AppState>>,
    Path(mode_id): Path<String>,
) -> Result<Json<ApiResponse>, TimerError> {
    let mode: Mode = mode_id.parse()?;
    respond(&format!("Switched to {}", mode.label()), state.switch_mode(mode))
}

/// Handle POST /chime - Play the completion chime now
pub async fn chime_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    state.preview_chime();
    StatusCode::ACCEPTED
}

/// Handle GET /modes - Return the mode table
pub async fn modes_handler() -> Json<&'static [ModeConfig]> {
    Json(&MODES[..])
}

/// Handle GET /modes/:mode_id - Return one mode
pub async fn mode_handler(Path(mode_id): Path<String>) -> Result<Json<&'static ModeConfig>, TimerError> {
    lookup_mode(&mode_id).map(Json)
}

/// Handle GET /status - Return current countdown status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, TimerError> {
    let countdown = state.snapshot()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        countdown,
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

use super::state::AppState;
use crate::pipeline::{SettingsSnapshot, SettingsUpdate, TurnError, TurnState};
use crate::prompts::{fetch_prompts, Prompt};
use crate::transcript::TranscriptEntry;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// User text for this turn
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StateResponse {
    pub state: TurnState,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn turn_error_status(error: &TurnError) -> StatusCode {
    match error {
        TurnError::EmptyInput => StatusCode::BAD_REQUEST,
        TurnError::Busy => StatusCode::CONFLICT,
        TurnError::NoRoom | TurnError::Configuration(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TurnError::Completion(_) | TurnError::Stream(_) | TurnError::Synthesis(_) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /chat/send
/// Run one turn and return its outcome
pub async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<SendMessageRequest>,
) -> impl IntoResponse {
    info!("Turn requested ({} chars)", req.text.chars().count());

    match state.pipeline.submit(&req.text).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            error!("Turn failed: {}", e);
            (
                turn_error_status(&e),
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /chat/state
pub async fn get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(StateResponse {
        state: state.pipeline.state(),
    })
}

/// GET /chat/transcript
pub async fn get_transcript(State(state): State<AppState>) -> Json<Vec<TranscriptEntry>> {
    Json(state.transcript.entries())
}

/// GET /chat/settings
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsSnapshot> {
    Json(state.settings.snapshot())
}

/// PUT /chat/settings
/// Partial update of model, speaker, style, prompt or room
pub async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Json<SettingsSnapshot> {
    let snapshot = state.settings.apply(update);
    info!("Settings updated (room={:?})", snapshot.room_id);
    Json(snapshot)
}

/// GET /chat/prompts
pub async fn list_prompts(State(state): State<AppState>) -> Json<Vec<Prompt>> {
    Json(fetch_prompts(&state.backend).await)
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

//! Speech HTTP Handlers

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::application::UtteranceOutcome;
use crate::infrastructure::http::dto::{
    ApiResponse, Empty, SpeakRequest, SpeakResponse, SpeakWaitResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

fn validate_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }
    Ok(())
}

/// 播放文本，不等待结束
pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeakRequest>,
) -> Result<Json<ApiResponse<SpeakResponse>>, ApiError> {
    validate_text(&req.text)?;
    let accepted = state.speech.speak(&req.text).await;
    Ok(Json(ApiResponse::success(SpeakResponse { accepted })))
}

/// 播放文本并等待结束
pub async fn speak_wait(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SpeakRequest>,
) -> Result<Json<ApiResponse<SpeakWaitResponse>>, ApiError> {
    validate_text(&req.text)?;
    let outcome = state.speech.speak_and_wait(&req.text).await;
    let error = match &outcome {
        UtteranceOutcome::Failed(error) => Some(error.clone()),
        _ => None,
    };
    Ok(Json(ApiResponse::success(SpeakWaitResponse {
        outcome: outcome.as_str(),
        error,
    })))
}

/// 停止当前播放
pub async fn stop(State(state): State<Arc<AppState>>) -> Json<ApiResponse<Empty>> {
    state.speech.stop().await;
    Json(ApiResponse::ok())
}

//! Voice HTTP Handlers

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::infrastructure::http::dto::{
    ApiResponse, SelectVoiceRequest, SelectedVoiceResponse, TopVoicesQuery, TopVoicesResponse,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

/// 排名靠前的音色名称
pub async fn top_voices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TopVoicesQuery>,
) -> Json<ApiResponse<TopVoicesResponse>> {
    let n = query.n.unwrap_or(state.default_top_n);
    let names = state.speech.list_top_voice_names(n).await;
    Json(ApiResponse::success(TopVoicesResponse { names }))
}

/// 当前使用的音色
pub async fn selected_voice(
    State(state): State<Arc<AppState>>,
) -> Json<ApiResponse<SelectedVoiceResponse>> {
    Json(ApiResponse::success(selected_response(&state).await))
}

/// 选择音色并保存为偏好
pub async fn select_voice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectVoiceRequest>,
) -> Result<Json<ApiResponse<SelectedVoiceResponse>>, ApiError> {
    // 音色名称按原样精确匹配，只拒绝空白名称
    if req.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Voice name is required".to_string()));
    }

    if !state.speech.select_voice(&req.name).await {
        return Err(ApiError::NotFound(format!(
            "Voice not available: {:?}",
            req.name
        )));
    }

    Ok(Json(ApiResponse::success(selected_response(&state).await)))
}

async fn selected_response(state: &AppState) -> SelectedVoiceResponse {
    SelectedVoiceResponse {
        voice: state.speech.selected_voice().await,
        preference: state.speech.selector().preference().await,
    }
}

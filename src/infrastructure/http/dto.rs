//! Data Transfer Objects

use serde::{Deserialize, Serialize};

use crate::domain::voice::VoiceDescriptor;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self::success(Empty {})
    }
}

// ============================================================================
// Voice DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct TopVoicesQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct TopVoicesResponse {
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SelectVoiceRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SelectedVoiceResponse {
    pub voice: Option<VoiceDescriptor>,
    pub preference: Option<String>,
}

// ============================================================================
// Speech DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub accepted: bool,
}

#[derive(Debug, Serialize)]
pub struct SpeakWaitResponse {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

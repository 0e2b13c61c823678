//! Application State

use std::sync::Arc;

use crate::application::{SpeechOutput, SpeechSynthesisPort};

/// 应用状态
pub struct AppState {
    pub speech: Arc<SpeechOutput>,
    pub synth: Arc<dyn SpeechSynthesisPort>,
    /// GET /api/voice/top 未指定 n 时的默认数量
    pub default_top_n: usize,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        speech: Arc<SpeechOutput>,
        synth: Arc<dyn SpeechSynthesisPort>,
        default_top_n: usize,
    ) -> Self {
        Self {
            speech,
            synth,
            default_top_n,
        }
    }
}

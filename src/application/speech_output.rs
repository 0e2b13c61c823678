//! Speech Output - 面向调用方的播放接口
//!
//! 每次播放前先停止当前播放，再通过 VoiceSelector 解析音色。
//! 宿主不支持语音合成时所有操作降级为 false / 空结果，不返回错误

use std::sync::Arc;

use crate::application::ports::{
    SpeechSynthesisPort, SynthError, Utterance, UtteranceHandle, UtteranceOutcome,
};
use crate::application::voice_selector::VoiceSelector;
use crate::domain::voice::VoiceDescriptor;

/// list_top_voice_names 的默认数量
pub const DEFAULT_TOP_VOICES: usize = 5;

/// 播放参数
#[derive(Debug, Clone)]
pub struct SpeechSettings {
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            lang: "en-US".to_string(),
            rate: 0.9,
            pitch: 1.0,
        }
    }
}

/// 语音输出
pub struct SpeechOutput {
    synth: Arc<dyn SpeechSynthesisPort>,
    selector: Arc<VoiceSelector>,
    settings: SpeechSettings,
}

impl SpeechOutput {
    pub fn new(
        synth: Arc<dyn SpeechSynthesisPort>,
        selector: Arc<VoiceSelector>,
        settings: SpeechSettings,
    ) -> Self {
        Self {
            synth,
            selector,
            settings,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn is_supported(&self) -> bool {
        self.synth.is_supported()
    }

    /// 播放文本，不等待结束
    ///
    /// 返回 false 表示宿主不支持或拒绝了请求
    pub async fn speak(&self, text: &str) -> bool {
        match self.start(text).await {
            Ok(handle) => {
                tracing::debug!(utterance_id = %handle.id(), "Utterance started");
                true
            }
            Err(SynthError::Unsupported) => {
                tracing::warn!("Text-to-speech not supported by host");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to start utterance");
                false
            }
        }
    }

    /// 播放文本并等待结束
    ///
    /// 宿主报告出错时返回 Failed，不会一直挂起
    pub async fn speak_and_wait(&self, text: &str) -> UtteranceOutcome {
        let handle = match self.start(text).await {
            Ok(handle) => handle,
            Err(SynthError::Unsupported) => return UtteranceOutcome::Unsupported,
            Err(e) => return UtteranceOutcome::Failed(e.to_string()),
        };

        let utterance_id = handle.id();
        let outcome = handle.wait().await;
        match &outcome {
            UtteranceOutcome::Failed(error) => {
                tracing::warn!(utterance_id = %utterance_id, error = %error, "Utterance failed")
            }
            other => {
                tracing::debug!(utterance_id = %utterance_id, outcome = other.as_str(), "Utterance ended")
            }
        }
        outcome
    }

    /// 停止当前播放
    pub async fn stop(&self) {
        if !self.synth.is_supported() {
            return;
        }
        if let Err(e) = self.synth.cancel().await {
            tracing::warn!(error = %e, "Failed to cancel speech");
        }
    }

    /// 排名前 n 的音色名称
    pub async fn list_top_voice_names(&self, n: usize) -> Vec<String> {
        if !self.synth.is_supported() {
            return Vec::new();
        }
        self.selector.top_candidate_names(n).await
    }

    /// 选择音色并保存为偏好
    pub async fn select_voice(&self, name: &str) -> bool {
        if !self.synth.is_supported() {
            return false;
        }
        self.selector.set_preference(name).await
    }

    /// 当前使用的音色
    pub async fn selected_voice(&self) -> Option<VoiceDescriptor> {
        self.selector.selected_voice().await
    }

    pub fn selector(&self) -> &Arc<VoiceSelector> {
        &self.selector
    }

    async fn start(&self, text: &str) -> Result<UtteranceHandle, SynthError> {
        if !self.synth.is_supported() {
            return Err(SynthError::Unsupported);
        }

        self.stop().await;
        self.selector.ensure_catalog_ready().await;

        // 没有可用音色时交给宿主使用默认音色
        let voice = self.selector.selected_voice().await;
        let utterance = Utterance::new(text, self.settings.lang.clone())
            .with_voice(voice)
            .with_rate(self.settings.rate)
            .with_pitch(self.settings.pitch);

        tracing::info!(
            utterance_id = %utterance.id,
            text_len = text.len(),
            voice = ?utterance.voice.as_ref().map(|v| v.name.as_str()),
            "Speaking"
        );

        self.synth.speak(utterance).await
    }
}

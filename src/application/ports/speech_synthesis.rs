//! Speech Synthesis Port - 宿主语音合成能力抽象
//!
//! 定义音色列表、播放、取消与音色变更通知的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{broadcast, oneshot};
use uuid::Uuid;

use crate::domain::voice::{VoiceCatalog, VoiceDescriptor};

/// 语音合成错误
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("Speech synthesis not supported by host")]
    Unsupported,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 一次播放请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Utterance {
    /// 用于日志和追踪
    pub id: Uuid,
    pub text: String,
    pub lang: String,
    /// 语速，1.0 为正常
    pub rate: f32,
    /// 音调，1.0 为正常
    pub pitch: f32,
    /// None 表示使用宿主默认音色
    pub voice: Option<VoiceDescriptor>,
}

impl Utterance {
    pub fn new(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            lang: lang.into(),
            rate: 1.0,
            pitch: 1.0,
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: Option<VoiceDescriptor>) -> Self {
        self.voice = voice;
        self
    }

    pub fn with_rate(mut self, rate: f32) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_pitch(mut self, pitch: f32) -> Self {
        self.pitch = pitch;
        self
    }
}

/// 播放结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtteranceOutcome {
    /// 宿主报告播放结束
    Finished,
    /// 宿主报告播放出错
    Failed(String),
    /// 完成信号被丢弃（宿主未报告任何结果）
    Interrupted,
    /// 宿主不支持语音合成
    Unsupported,
}

impl UtteranceOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Failed(_) => "failed",
            Self::Interrupted => "interrupted",
            Self::Unsupported => "unsupported",
        }
    }
}

/// 播放句柄，持有完成信号的接收端
#[derive(Debug)]
pub struct UtteranceHandle {
    id: Uuid,
    done: oneshot::Receiver<Result<(), String>>,
}

/// 完成信号的发送端，由适配器在宿主报告结束或出错时触发
#[derive(Debug)]
pub struct CompletionSender {
    tx: oneshot::Sender<Result<(), String>>,
}

impl UtteranceHandle {
    pub fn new(id: Uuid) -> (Self, CompletionSender) {
        let (tx, done) = oneshot::channel();
        (Self { id, done }, CompletionSender { tx })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// 等待播放结束；出错时返回 Failed 而不是一直挂起
    pub async fn wait(self) -> UtteranceOutcome {
        match self.done.await {
            Ok(Ok(())) => UtteranceOutcome::Finished,
            Ok(Err(error)) => UtteranceOutcome::Failed(error),
            Err(_) => UtteranceOutcome::Interrupted,
        }
    }
}

impl CompletionSender {
    pub fn finished(self) {
        let _ = self.tx.send(Ok(()));
    }

    pub fn errored(self, error: impl Into<String>) {
        let _ = self.tx.send(Err(error.into()));
    }
}

/// Speech Synthesis Port
///
/// 宿主平台的语音合成能力。音色列表可能异步填充，启动时可能为空
#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    /// 宿主是否提供语音合成能力
    fn is_supported(&self) -> bool {
        true
    }

    /// 当前已知音色（可能为空）
    async fn list_voices(&self) -> Result<VoiceCatalog, SynthError>;

    /// 请求播放，立即返回句柄
    async fn speak(&self, utterance: Utterance) -> Result<UtteranceHandle, SynthError>;

    /// 取消当前播放
    async fn cancel(&self) -> Result<(), SynthError>;

    /// 订阅音色列表变更通知
    fn subscribe_voices_changed(&self) -> broadcast::Receiver<()>;

    /// 检查合成服务是否可用
    async fn health_check(&self) -> bool {
        self.is_supported()
    }
}

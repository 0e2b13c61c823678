//! Fake Speech Synth - 用于测试的语音合成适配器
//!
//! 按脚本返回音色列表，记录所有播放请求，不实际发声

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

use crate::application::ports::{
    CompletionSender, SpeechSynthesisPort, SynthError, Utterance, UtteranceHandle,
};
use crate::domain::voice::VoiceCatalog;

/// 播放请求的模拟结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeOutcome {
    /// 立即报告播放结束
    Finish,
    /// 立即报告播放出错
    Fail(String),
    /// 保持播放中，直到被取消或被下一次播放替换
    Pending,
}

/// Fake Speech Synth
pub struct FakeSpeechSynth {
    supported: AtomicBool,
    outcome: Mutex<FakeOutcome>,
    /// 每次 list_voices 依次弹出一个，耗尽后保持最后的列表
    scripted: Mutex<VecDeque<VoiceCatalog>>,
    current: Mutex<VoiceCatalog>,
    spoken: Mutex<Vec<Utterance>>,
    pending: Mutex<Option<CompletionSender>>,
    polls: AtomicU64,
    cancels: AtomicU64,
    changes: broadcast::Sender<()>,
}

impl FakeSpeechSynth {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(16);
        Self {
            supported: AtomicBool::new(true),
            outcome: Mutex::new(FakeOutcome::Finish),
            scripted: Mutex::new(VecDeque::new()),
            current: Mutex::new(Vec::new()),
            spoken: Mutex::new(Vec::new()),
            pending: Mutex::new(None),
            polls: AtomicU64::new(0),
            cancels: AtomicU64::new(0),
            changes,
        }
    }

    /// 使用固定音色列表创建
    pub fn with_voices(voices: VoiceCatalog) -> Self {
        Self {
            current: Mutex::new(voices),
            ..Self::new()
        }
    }

    /// 模拟不支持语音合成的宿主
    pub fn unsupported() -> Self {
        let synth = Self::new();
        synth.supported.store(false, Ordering::Relaxed);
        synth
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 设置后续 list_voices 依次返回的列表
    pub async fn script_catalogs(&self, catalogs: Vec<VoiceCatalog>) {
        *self.scripted.lock().await = catalogs.into();
    }

    /// 替换当前音色列表（不会自动发出变更通知）
    pub async fn set_voices(&self, voices: VoiceCatalog) {
        self.scripted.lock().await.clear();
        *self.current.lock().await = voices;
    }

    /// 发出音色变更通知
    pub fn notify_voices_changed(&self) {
        let _ = self.changes.send(());
    }

    pub async fn set_outcome(&self, outcome: FakeOutcome) {
        *self.outcome.lock().await = outcome;
    }

    /// 已收到的播放请求
    pub async fn spoken(&self) -> Vec<Utterance> {
        self.spoken.lock().await.clone()
    }

    pub fn polls(&self) -> u64 {
        self.polls.load(Ordering::Relaxed)
    }

    pub fn cancels(&self) -> u64 {
        self.cancels.load(Ordering::Relaxed)
    }
}

impl Default for FakeSpeechSynth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynthesisPort for FakeSpeechSynth {
    fn is_supported(&self) -> bool {
        self.supported.load(Ordering::Relaxed)
    }

    async fn list_voices(&self) -> Result<VoiceCatalog, SynthError> {
        if !self.is_supported() {
            return Err(SynthError::Unsupported);
        }
        self.polls.fetch_add(1, Ordering::Relaxed);

        let mut current = self.current.lock().await;
        if let Some(next) = self.scripted.lock().await.pop_front() {
            *current = next;
        }
        Ok(current.clone())
    }

    async fn speak(&self, utterance: Utterance) -> Result<UtteranceHandle, SynthError> {
        if !self.is_supported() {
            return Err(SynthError::Unsupported);
        }

        tracing::debug!(
            utterance_id = %utterance.id,
            text_len = utterance.text.len(),
            voice = ?utterance.voice.as_ref().map(|v| v.name.as_str()),
            "FakeSpeechSynth: recording utterance"
        );

        let (handle, completion) = UtteranceHandle::new(utterance.id);

        // 先登记完成信号，再记录请求，保证观察到请求时 cancel 已可生效
        match self.outcome.lock().await.clone() {
            FakeOutcome::Finish => completion.finished(),
            FakeOutcome::Fail(error) => completion.errored(error),
            FakeOutcome::Pending => *self.pending.lock().await = Some(completion),
        }
        self.spoken.lock().await.push(utterance);

        Ok(handle)
    }

    async fn cancel(&self) -> Result<(), SynthError> {
        if !self.is_supported() {
            return Err(SynthError::Unsupported);
        }
        self.cancels.fetch_add(1, Ordering::Relaxed);

        if let Some(pending) = self.pending.lock().await.take() {
            pending.errored("interrupted");
        }
        Ok(())
    }

    fn subscribe_voices_changed(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}

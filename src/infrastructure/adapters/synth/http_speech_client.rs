//! HTTP Speech Client - 调用外部语音合成 HTTP 服务
//!
//! 实现 SpeechSynthesisPort trait
//!
//! 外部语音服务 API:
//! - GET  {base}/api/voices   音色列表 `[{"name","lang","localService"}]`
//! - POST {base}/api/speak    JSON utterance，播放结束后才返回
//! - POST {base}/api/cancel   取消当前播放
//! - GET  {base}/health       健康检查
//!
//! 服务端没有推送能力，音色变更通知通过定时轮询音色列表生成

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::application::ports::{SpeechSynthesisPort, SynthError, Utterance, UtteranceHandle};
use crate::domain::voice::VoiceCatalog;

/// HTTP 语音客户端配置
#[derive(Debug, Clone)]
pub struct HttpSpeechClientConfig {
    /// 语音服务基础 URL
    pub base_url: String,
    /// 请求超时时间（秒），同时限制单次播放的最长时间
    pub timeout_secs: u64,
    /// 音色列表轮询间隔（秒）
    pub watch_interval_secs: u64,
}

impl Default for HttpSpeechClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 120,
            watch_interval_secs: 5,
        }
    }
}

impl HttpSpeechClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_watch_interval(mut self, secs: u64) -> Self {
        self.watch_interval_secs = secs;
        self
    }
}

/// HTTP 语音客户端
pub struct HttpSpeechSynthClient {
    client: Client,
    config: HttpSpeechClientConfig,
    changes: broadcast::Sender<()>,
}

impl HttpSpeechSynthClient {
    /// 创建新的 HTTP 语音客户端
    pub fn new(config: HttpSpeechClientConfig) -> Result<Self, SynthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthError::NetworkError(e.to_string()))?;
        let (changes, _) = broadcast::channel(16);

        Ok(Self {
            client,
            config,
            changes,
        })
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn voices_url(&self) -> String {
        format!("{}/api/voices", self.config.base_url)
    }

    fn speak_url(&self) -> String {
        format!("{}/api/speak", self.config.base_url)
    }

    fn cancel_url(&self) -> String {
        format!("{}/api/cancel", self.config.base_url)
    }

    fn health_url(&self) -> String {
        format!("{}/health", self.config.base_url)
    }

    /// 启动音色列表轮询任务
    ///
    /// 列表内容与上一次不同时发出变更通知；客户端被释放后任务自动退出
    pub fn spawn_voice_watcher(self: &Arc<Self>) -> JoinHandle<()> {
        let client: Weak<Self> = Arc::downgrade(self);
        let interval = Duration::from_secs(self.config.watch_interval_secs.max(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            let mut last: Option<VoiceCatalog> = None;

            loop {
                ticker.tick().await;
                let Some(client) = client.upgrade() else {
                    break;
                };

                match client.list_voices().await {
                    Ok(voices) => {
                        if last.as_ref().is_some_and(|previous| *previous != voices) {
                            tracing::info!(count = voices.len(), "Remote voice catalog changed");
                            let _ = client.changes.send(());
                        }
                        last = Some(voices);
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Voice watcher poll failed");
                    }
                }
            }

            tracing::debug!("Voice watcher stopped");
        })
    }
}

fn map_request_error(e: reqwest::Error) -> SynthError {
    if e.is_timeout() {
        SynthError::Timeout
    } else if e.is_connect() {
        SynthError::NetworkError(format!("Cannot connect to speech service: {}", e))
    } else {
        SynthError::NetworkError(e.to_string())
    }
}

async fn ensure_success(response: Response) -> Result<Response, SynthError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(SynthError::ServiceError(format!(
        "HTTP {}: {}",
        status, error_text
    )))
}

#[async_trait]
impl SpeechSynthesisPort for HttpSpeechSynthClient {
    async fn list_voices(&self) -> Result<VoiceCatalog, SynthError> {
        let response = self
            .client
            .get(self.voices_url())
            .send()
            .await
            .map_err(map_request_error)?;

        ensure_success(response)
            .await?
            .json::<VoiceCatalog>()
            .await
            .map_err(|e| SynthError::InvalidResponse(format!("Failed to parse voices: {}", e)))
    }

    async fn speak(&self, utterance: Utterance) -> Result<UtteranceHandle, SynthError> {
        let (handle, completion) = UtteranceHandle::new(utterance.id);
        let request = self.client.post(self.speak_url()).json(&utterance);

        tracing::debug!(
            url = %self.speak_url(),
            utterance_id = %utterance.id,
            text_len = utterance.text.len(),
            voice = ?utterance.voice.as_ref().map(|v| v.name.as_str()),
            "Sending speak request"
        );

        tokio::spawn(async move {
            let result = match request.send().await {
                Ok(response) => ensure_success(response).await.map(|_| ()),
                Err(e) => Err(map_request_error(e)),
            };

            match result {
                Ok(()) => {
                    tracing::debug!(utterance_id = %utterance.id, "Utterance finished");
                    completion.finished();
                }
                Err(e) => {
                    tracing::warn!(utterance_id = %utterance.id, error = %e, "Utterance failed");
                    completion.errored(e.to_string());
                }
            }
        });

        Ok(handle)
    }

    async fn cancel(&self) -> Result<(), SynthError> {
        let response = self
            .client
            .post(self.cancel_url())
            .send()
            .await
            .map_err(map_request_error)?;
        ensure_success(response).await?;
        Ok(())
    }

    fn subscribe_voices_changed(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.health_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

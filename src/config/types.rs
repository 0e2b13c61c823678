//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::time::Duration;

use crate::application::{SpeechSettings, VoiceSelectorConfig, DEFAULT_TOP_VOICES};
use crate::domain::voice::{Gender, SelectionConfig};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 语音合成服务配置
    #[serde(default)]
    pub synth: SynthConfig,

    /// 音色选择与播放配置
    #[serde(default)]
    pub voice: VoiceConfig,

    /// 偏好存储配置
    #[serde(default)]
    pub preference: PreferenceConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 语音合成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct SynthConfig {
    /// 语音服务基础 URL
    #[serde(default = "default_synth_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_synth_timeout")]
    pub timeout_secs: u64,

    /// 音色列表轮询间隔（秒）
    #[serde(default = "default_watch_interval")]
    pub watch_interval_secs: u64,
}

fn default_synth_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_synth_timeout() -> u64 {
    120
}

fn default_watch_interval() -> u64 {
    5
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            url: default_synth_url(),
            timeout_secs: default_synth_timeout(),
            watch_interval_secs: default_watch_interval(),
        }
    }
}

/// 音色选择与播放配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// 目标语言（BCP-47）
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// 目标性别，决定默认的名称提示词
    #[serde(default)]
    pub target_gender: Gender,

    /// 自定义性别提示词，未设置时使用 target_gender 的默认列表
    #[serde(default)]
    pub gender_hints: Option<Vec<String>>,

    /// 是否对命中性别提示词的音色加分
    #[serde(default)]
    pub prefer_gender_heuristic: bool,

    /// 等待音色列表就绪的轮询间隔（毫秒）
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// 语速
    #[serde(default = "default_rate")]
    pub rate: f32,

    /// 音调
    #[serde(default = "default_pitch")]
    pub pitch: f32,

    /// 候选音色默认数量
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_target_language() -> String {
    "en-US".to_string()
}

fn default_poll_interval() -> u64 {
    100
}

fn default_rate() -> f32 {
    0.9
}

fn default_pitch() -> f32 {
    1.0
}

fn default_top_n() -> usize {
    DEFAULT_TOP_VOICES
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            target_gender: Gender::default(),
            gender_hints: None,
            prefer_gender_heuristic: false,
            poll_interval_ms: default_poll_interval(),
            rate: default_rate(),
            pitch: default_pitch(),
            top_n: default_top_n(),
        }
    }
}

impl VoiceConfig {
    /// 音色打分配置
    pub fn selection_config(&self) -> SelectionConfig {
        let config = SelectionConfig::new(&self.target_language, self.target_gender)
            .with_gender_preference(self.prefer_gender_heuristic);
        match &self.gender_hints {
            Some(hints) => config.with_hints(hints.clone()),
            None => config,
        }
    }

    /// 播放参数
    pub fn speech_settings(&self) -> SpeechSettings {
        SpeechSettings {
            lang: self.target_language.clone(),
            rate: self.rate,
            pitch: self.pitch,
        }
    }

    /// VoiceSelector 配置
    pub fn selector_config(&self, preference: &PreferenceConfig) -> VoiceSelectorConfig {
        VoiceSelectorConfig {
            selection: self.selection_config(),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            preference_key: preference.key.clone(),
        }
    }
}

/// 偏好存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct PreferenceConfig {
    /// Sled 数据库路径
    #[serde(default = "default_preference_path")]
    pub path: String,

    /// 偏好音色的存储 key
    #[serde(default = "default_preference_key")]
    pub key: String,
}

fn default_preference_path() -> String {
    "data/preferences.sled".to_string()
}

fn default_preference_key() -> String {
    crate::application::voice_selector::DEFAULT_PREFERENCE_KEY.to_string()
}

impl Default for PreferenceConfig {
    fn default() -> Self {
        Self {
            path: default_preference_path(),
            key: default_preference_key(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.synth.url, "http://localhost:8000");
        assert_eq!(config.voice.target_language, "en-US");
        assert_eq!(config.voice.rate, 0.9);
        assert_eq!(config.preference.key, "preferred_voice");
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.addr(), "0.0.0.0:5070");
    }

    #[test]
    fn test_selection_config_uses_custom_hints() {
        let voice = VoiceConfig {
            gender_hints: Some(vec!["Narrator".to_string()]),
            prefer_gender_heuristic: true,
            ..Default::default()
        };
        let selection = voice.selection_config();
        assert_eq!(selection.gender_hints, vec!["Narrator".to_string()]);
        assert!(selection.prefer_gender_heuristic);

        let selector = voice.selector_config(&PreferenceConfig::default());
        assert_eq!(selector.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_selection_config_defaults_to_gender_hints() {
        let voice = VoiceConfig {
            target_gender: Gender::Male,
            ..Default::default()
        };
        assert!(voice
            .selection_config()
            .gender_hints
            .contains(&"daniel".to_string()));
    }
}

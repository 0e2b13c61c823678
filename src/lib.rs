//! Voxsel - 语音合成音色选择与播放服务
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Voice: 音色描述、打分规则、最佳音色与候选列表
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechSynthesis, PreferenceStore）
//! - VoiceSelector: 维护当前最佳音色与用户偏好
//! - SpeechOutput: speak / speak_and_wait / stop / 候选音色 / 选择音色
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: 远程语音合成服务客户端、测试用 Fake
//! - Persistence: Sled 偏好存储
//! - Memory: 内存偏好存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};

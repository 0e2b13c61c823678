//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechSynthesis、PreferenceStore）
//! - voice_selector: 当前最佳音色与用户偏好
//! - speech_output: 面向调用方的播放接口

pub mod ports;
pub mod speech_output;
pub mod voice_selector;

pub use ports::{
    CompletionSender, PreferenceError, PreferenceStorePort, SpeechSynthesisPort, SynthError,
    Utterance, UtteranceHandle, UtteranceOutcome,
};
pub use speech_output::{SpeechOutput, SpeechSettings, DEFAULT_TOP_VOICES};
pub use voice_selector::{SelectorStats, VoiceSelector, VoiceSelectorConfig};

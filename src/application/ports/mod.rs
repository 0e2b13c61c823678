//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod preference_store;
mod speech_synthesis;

pub use preference_store::{PreferenceError, PreferenceStorePort};
pub use speech_synthesis::{
    CompletionSender, SpeechSynthesisPort, SynthError, Utterance, UtteranceHandle,
    UtteranceOutcome,
};

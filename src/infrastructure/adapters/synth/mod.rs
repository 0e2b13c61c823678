//! Speech Synth Adapter - 语音合成适配器

mod fake_speech_synth;
mod http_speech_client;

pub use fake_speech_synth::{FakeOutcome, FakeSpeechSynth};
pub use http_speech_client::{HttpSpeechClientConfig, HttpSpeechSynthClient};

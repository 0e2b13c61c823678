//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 宿主音色描述
//! - 音色打分
//! - 最佳音色 / 候选音色挑选

mod ranking;
mod selection;
mod value_objects;

pub use ranking::VoiceRanker;
pub use selection::{find_by_name, pick_best, top_candidates};
pub use value_objects::{Gender, SelectionConfig, VoiceCatalog, VoiceDescriptor};

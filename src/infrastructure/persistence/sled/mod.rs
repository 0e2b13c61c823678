//! Sled 嵌入式存储

mod preference_store;

pub use preference_store::{SledPreferenceConfig, SledPreferenceStore};

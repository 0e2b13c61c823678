//! Memory Layer - In-Memory State Management
//!
//! 不落盘的偏好存储，用于测试和无持久化需求的场景

mod preference_store;

pub use preference_store::InMemoryPreferenceStore;

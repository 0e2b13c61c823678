//! In-Memory Preference Store Implementation

use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{PreferenceError, PreferenceStorePort};

/// 内存偏好存储
pub struct InMemoryPreferenceStore {
    entries: DashMap<String, String>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// 带初始值创建
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.insert(key.into(), value.into());
        store
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryPreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStorePort for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let store = InMemoryPreferenceStore::with_entry("preferred_voice", "Alex");
        assert_eq!(store.get("preferred_voice").unwrap().as_deref(), Some("Alex"));

        store.set("preferred_voice", "Samantha").unwrap();
        assert_eq!(store.get("preferred_voice").unwrap().as_deref(), Some("Samantha"));
        assert!(store.get("other").unwrap().is_none());
    }
}

//! Sled-based Preference Store Implementation

use sled::Db;
use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{PreferenceError, PreferenceStorePort};

/// Sled 偏好存储配置
#[derive(Debug, Clone)]
pub struct SledPreferenceConfig {
    /// 数据库路径
    pub db_path: String,
}

impl Default for SledPreferenceConfig {
    fn default() -> Self {
        Self {
            db_path: "data/preferences.sled".to_string(),
        }
    }
}

/// Sled 偏好存储
///
/// 值以 UTF-8 字节存储，写入后立即 flush，保证进程重启后仍可读取
pub struct SledPreferenceStore {
    db: Db,
}

impl SledPreferenceStore {
    /// 创建新的存储实例
    pub fn new(config: &SledPreferenceConfig) -> Result<Self, PreferenceError> {
        let db = sled::open(&config.db_path)
            .map_err(|e| PreferenceError::StorageError(e.to_string()))?;

        tracing::info!(
            db_path = %config.db_path,
            entries = db.len(),
            "SledPreferenceStore initialized"
        );

        Ok(Self { db })
    }

    /// 打开现有存储
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PreferenceError> {
        let config = SledPreferenceConfig {
            db_path: path.as_ref().to_string_lossy().to_string(),
        };
        Self::new(&config)
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl PreferenceStorePort for SledPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        match self.db.get(key) {
            Ok(Some(data)) => String::from_utf8(data.to_vec())
                .map(Some)
                .map_err(|e| PreferenceError::Encoding(e.to_string())),
            Ok(None) => Ok(None),
            Err(e) => Err(PreferenceError::StorageError(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.db
            .insert(key, value.as_bytes())
            .map_err(|e| PreferenceError::StorageError(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| PreferenceError::StorageError(e.to_string()))?;

        tracing::debug!(key = %key, value = %value, "Preference stored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_preference_put_get() {
        let dir = tempdir().unwrap();
        let store = SledPreferenceStore::open(dir.path().join("prefs.sled")).unwrap();

        assert!(store.get("preferred_voice").unwrap().is_none());

        store.set("preferred_voice", "Google US English").unwrap();
        assert_eq!(
            store.get("preferred_voice").unwrap().as_deref(),
            Some("Google US English")
        );

        store.set("preferred_voice", "Samantha").unwrap();
        assert_eq!(store.get("preferred_voice").unwrap().as_deref(), Some("Samantha"));
    }

    #[test]
    fn test_preference_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.sled");

        {
            let store = SledPreferenceStore::open(&path).unwrap();
            store.set("preferred_voice", "Karen").unwrap();
        }

        let store = SledPreferenceStore::open(&path).unwrap();
        assert_eq!(store.get("preferred_voice").unwrap().as_deref(), Some("Karen"));
    }
}

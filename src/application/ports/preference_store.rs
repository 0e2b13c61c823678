//! Preference Store Port - 用户偏好持久化
//!
//! 客户端范围内的持久化 key -> string 映射，进程重启后仍然有效

use thiserror::Error;

/// 偏好存储错误
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Invalid stored value: {0}")]
    Encoding(String),
}

/// Preference Store Port
pub trait PreferenceStorePort: Send + Sync {
    /// 读取偏好，不存在时返回 None
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// 写入偏好
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

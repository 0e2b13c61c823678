//! Domain Layer - 领域层
//!
//! - Voice Context: 音色打分与选择（纯逻辑，无 I/O）

pub mod voice;

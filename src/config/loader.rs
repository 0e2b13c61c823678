//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `VOXSEL_SERVER__PORT=8080`
/// - `VOXSEL_SYNTH__URL=http://speech-engine:8000`
/// - `VOXSEL_VOICE__TARGET_LANGUAGE=en-GB`
/// - `VOXSEL_VOICE__PREFER_GENDER_HEURISTIC=true`
/// - `VOXSEL_PREFERENCE__PATH=/data/preferences.sled`
/// - `VOXSEL_VOICE__GENDER_HINTS=samantha,karen`（逗号分隔）
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("synth.url", "http://localhost:8000")?
        .set_default("synth.timeout_secs", 120)?
        .set_default("synth.watch_interval_secs", 5)?
        .set_default("voice.target_language", "en-US")?
        .set_default("voice.target_gender", "female")?
        .set_default("voice.prefer_gender_heuristic", false)?
        .set_default("voice.poll_interval_ms", 100)?
        .set_default("voice.rate", 0.9)?
        .set_default("voice.pitch", 1.0)?
        .set_default("voice.top_n", 5)?
        .set_default("preference.path", "data/preferences.sled")?
        .set_default("preference.key", "preferred_voice")?
        .set_default("log.level", "info")?;

    // 2. 配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 前缀: VOXSEL_，层级分隔符: __
    builder = builder.add_source(
        Environment::with_prefix("VOXSEL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("voice.gender_hints"),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.synth.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Synth URL cannot be empty".to_string(),
        ));
    }

    if config.voice.target_language.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Target language cannot be empty".to_string(),
        ));
    }

    if config.voice.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "Voice poll interval cannot be 0".to_string(),
        ));
    }

    if !(0.1..=10.0).contains(&config.voice.rate) {
        return Err(ConfigError::ValidationError(format!(
            "Speech rate must be between 0.1 and 10, got {}",
            config.voice.rate
        )));
    }

    if !(0.0..=2.0).contains(&config.voice.pitch) {
        return Err(ConfigError::ValidationError(format!(
            "Speech pitch must be between 0 and 2, got {}",
            config.voice.pitch
        )));
    }

    if config.preference.key.is_empty() {
        return Err(ConfigError::ValidationError(
            "Preference key cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}", config.server.addr());
    tracing::info!("Synth URL: {}", config.synth.url);
    tracing::info!("Synth Timeout: {}s", config.synth.timeout_secs);
    tracing::info!("Target Language: {}", config.voice.target_language);
    tracing::info!(
        "Gender Heuristic: {} ({})",
        config.voice.prefer_gender_heuristic,
        config.voice.target_gender.as_str()
    );
    tracing::info!("Rate / Pitch: {} / {}", config.voice.rate, config.voice.pitch);
    tracing::info!("Preference Store: {}", config.preference.path);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_language() {
        let mut config = AppConfig::default();
        config.voice.target_language = " ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_poll_interval() {
        let mut config = AppConfig::default();
        config.voice.poll_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_rate_out_of_range() {
        let mut config = AppConfig::default();
        config.voice.rate = 20.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voxsel.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[voice]\ntarget_language = \"en-GB\"\ntarget_gender = \"male\"\nprefer_gender_heuristic = true\n\n[server]\nport = 9000"
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.voice.target_language, "en-GB");
        assert_eq!(config.voice.target_gender, crate::domain::voice::Gender::Male);
        assert!(config.voice.prefer_gender_heuristic);
        assert_eq!(config.synth.url, "http://localhost:8000");
    }

    #[test]
    fn test_gender_hints_from_env_list() {
        std::env::set_var("VOXSEL_VOICE__GENDER_HINTS", "Samantha,Karen");
        let config = load_config_from_path(None);
        std::env::remove_var("VOXSEL_VOICE__GENDER_HINTS");

        let config = config.unwrap();
        assert_eq!(
            config.voice.gender_hints,
            Some(vec!["Samantha".to_string(), "Karen".to_string()])
        );
    }
}

//! Voxsel - 语音合成音色选择与播放服务

use voxsel::application::{SpeechOutput, VoiceSelector};
use voxsel::config::{load_config, print_config};
use voxsel::infrastructure::adapters::{HttpSpeechClientConfig, HttpSpeechSynthClient};
// use voxsel::infrastructure::adapters::FakeSpeechSynth;
use voxsel::infrastructure::http::{AppState, HttpServer, ServerConfig};
use voxsel::infrastructure::persistence::sled::{SledPreferenceConfig, SledPreferenceStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},voxsel={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Voxsel - voice selection service");
    print_config(&config);

    // 确保偏好存储目录存在
    if let Some(parent) = std::path::Path::new(&config.preference.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 偏好存储
    let store = SledPreferenceStore::new(&SledPreferenceConfig {
        db_path: config.preference.path.clone(),
    })?
    .arc();

    // 远程语音合成服务
    let synth_config = HttpSpeechClientConfig::new(&config.synth.url)
        .with_timeout(config.synth.timeout_secs)
        .with_watch_interval(config.synth.watch_interval_secs);
    let synth = HttpSpeechSynthClient::new(synth_config)?.arc();
    synth.spawn_voice_watcher();

    // // 本地调试（不发声，始终成功）
    // let synth = FakeSpeechSynth::with_voices(vec![]).arc();

    // 音色选择器
    let selector = VoiceSelector::new(
        config.voice.selector_config(&config.preference),
        synth.clone(),
        store,
    )
    .arc();
    selector.spawn_catalog_watcher();

    // 后台预热音色列表，不阻塞启动
    selector.spawn_warmup();

    let speech = SpeechOutput::new(synth.clone(), selector, config.voice.speech_settings()).arc();

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(speech, synth, config.voice.top_n);
    let server = HttpServer::new(server_config, state);

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

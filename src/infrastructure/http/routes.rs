//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping               GET   健康检查
//! - /api/voice/top          GET   排名靠前的音色名称（?n=）
//! - /api/voice/selected     GET   当前音色与已保存的偏好
//! - /api/voice/select       POST  选择音色并保存为偏好
//! - /api/speech/speak       POST  播放文本（不等待）
//! - /api/speech/speak_wait  POST  播放文本并等待结束
//! - /api/speech/stop        POST  停止当前播放

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/voice", voice_routes())
        .nest("/speech", speech_routes())
}

/// Voice 路由
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/top", get(handlers::top_voices))
        .route("/selected", get(handlers::selected_voice))
        .route("/select", post(handlers::select_voice))
}

/// Speech 路由
fn speech_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/speak", post(handlers::speak))
        .route("/speak_wait", post(handlers::speak_wait))
        .route("/stop", post(handlers::stop))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::time::Duration;
    use tower::util::ServiceExt;

    use crate::application::{
        SpeechOutput, SpeechSettings, VoiceSelector, VoiceSelectorConfig,
    };
    use crate::domain::voice::VoiceDescriptor;
    use crate::infrastructure::adapters::{FakeOutcome, FakeSpeechSynth};
    use crate::infrastructure::memory::InMemoryPreferenceStore;

    fn catalog() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("Android Speech", "en-US", true),
            VoiceDescriptor::new("Google US English", "en-US", false),
            VoiceDescriptor::new("Samantha", "en-US", true),
            VoiceDescriptor::new("Thomas", "fr-FR", true),
        ]
    }

    fn router(synth: Arc<FakeSpeechSynth>) -> Router {
        let config = VoiceSelectorConfig {
            poll_interval: Duration::from_millis(1),
            ..Default::default()
        };
        let selector =
            VoiceSelector::new(config, synth.clone(), InMemoryPreferenceStore::new().arc()).arc();
        let speech =
            SpeechOutput::new(synth.clone(), selector, SpeechSettings::default()).arc();
        let state = AppState::new(speech, synth, 2);
        create_routes().with_state(Arc::new(state))
    }

    async fn call(app: Router, request: Request<Body>) -> Value {
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let app = router(FakeSpeechSynth::new().arc());
        let body = call(app, get("/api/ping")).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["synth_available"], true);
    }

    #[tokio::test]
    async fn test_top_voices_default_and_explicit_n() {
        let synth = FakeSpeechSynth::with_voices(catalog()).arc();

        let body = call(router(synth.clone()), get("/api/voice/top")).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["names"].as_array().unwrap().len(), 2);

        let body = call(router(synth), get("/api/voice/top?n=10")).await;
        assert_eq!(body["data"]["names"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_select_voice_then_selected() {
        let app = router(FakeSpeechSynth::with_voices(catalog()).arc());

        let body = call(
            app.clone(),
            post_json("/api/voice/select", json!({ "name": "Samantha" })),
        )
        .await;
        assert_eq!(body["errno"], 0);
        assert_eq!(body["data"]["voice"]["name"], "Samantha");
        assert_eq!(body["data"]["preference"], "Samantha");

        let body = call(app, get("/api/voice/selected")).await;
        assert_eq!(body["data"]["voice"]["name"], "Samantha");
    }

    #[tokio::test]
    async fn test_select_unknown_voice_returns_not_found() {
        let app = router(FakeSpeechSynth::with_voices(catalog()).arc());

        let body = call(
            app.clone(),
            post_json("/api/voice/select", json!({ "name": "Nobody" })),
        )
        .await;
        assert_eq!(body["errno"], 404);
        assert!(body["data"].is_null());

        let body = call(app, post_json("/api/voice/select", json!({ "name": " " }))).await;
        assert_eq!(body["errno"], 400);
    }

    #[tokio::test]
    async fn test_select_voice_matches_name_exactly() {
        let app = router(FakeSpeechSynth::with_voices(catalog()).arc());

        let body = call(
            app.clone(),
            post_json("/api/voice/select", json!({ "name": " Samantha " })),
        )
        .await;
        assert_eq!(body["errno"], 404);

        let body = call(app, get("/api/voice/selected")).await;
        assert!(body["data"]["preference"].is_null());
    }

    #[tokio::test]
    async fn test_speak_and_stop() {
        let synth = FakeSpeechSynth::with_voices(catalog()).arc();
        synth.set_outcome(FakeOutcome::Pending).await;
        let app = router(synth.clone());

        let body = call(
            app.clone(),
            post_json("/api/speech/speak", json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(body["data"]["accepted"], true);
        assert_eq!(synth.spoken().await[0].text, "hello");

        let body = call(app, post_json("/api/speech/stop", json!({}))).await;
        assert_eq!(body["errno"], 0);
        assert_eq!(synth.cancels(), 2);
    }

    #[tokio::test]
    async fn test_speak_rejects_empty_text() {
        let synth = FakeSpeechSynth::with_voices(catalog()).arc();
        let body = call(
            router(synth.clone()),
            post_json("/api/speech/speak", json!({ "text": "  " })),
        )
        .await;
        assert_eq!(body["errno"], 400);
        assert!(synth.spoken().await.is_empty());
    }

    #[tokio::test]
    async fn test_speak_wait_reports_failure() {
        let synth = FakeSpeechSynth::with_voices(catalog()).arc();
        synth
            .set_outcome(FakeOutcome::Fail("audio-busy".to_string()))
            .await;

        let body = call(
            router(synth),
            post_json("/api/speech/speak_wait", json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(body["data"]["outcome"], "failed");
        assert_eq!(body["data"]["error"], "audio-busy");
    }

    #[tokio::test]
    async fn test_unsupported_host() {
        let app = router(FakeSpeechSynth::unsupported().arc());

        let body = call(app.clone(), get("/api/ping")).await;
        assert_eq!(body["synth_available"], false);

        let body = call(
            app.clone(),
            post_json("/api/speech/speak_wait", json!({ "text": "hello" })),
        )
        .await;
        assert_eq!(body["data"]["outcome"], "unsupported");
        assert!(body["data"].get("error").is_none());

        let body = call(app, get("/api/voice/top")).await;
        assert!(body["data"]["names"].as_array().unwrap().is_empty());
    }
}

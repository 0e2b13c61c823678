//! Voice Selector - 当前使用哪个音色
//!
//! 在异步填充、可能变化的宿主音色列表上维护“当前最佳音色”：
//! - 用户偏好存在且能在当前列表中找到时，始终使用偏好音色
//! - 否则使用得分最高的音色，同分取列表中最先出现的
//!
//! 已知风险：宿主永远不提供音色时，`ensure_catalog_ready` 会无限等待

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::application::ports::{PreferenceStorePort, SpeechSynthesisPort, SynthError};
use crate::domain::voice::{
    find_by_name, pick_best, top_candidates, SelectionConfig, VoiceCatalog, VoiceDescriptor,
    VoiceRanker,
};

/// 默认偏好存储 key
pub const DEFAULT_PREFERENCE_KEY: &str = "preferred_voice";

/// VoiceSelector 配置
#[derive(Debug, Clone)]
pub struct VoiceSelectorConfig {
    pub selection: SelectionConfig,
    /// 等待音色列表就绪时的轮询间隔
    pub poll_interval: Duration,
    /// 偏好存储 key
    pub preference_key: String,
}

impl Default for VoiceSelectorConfig {
    fn default() -> Self {
        Self {
            selection: SelectionConfig::default(),
            poll_interval: Duration::from_millis(100),
            preference_key: DEFAULT_PREFERENCE_KEY.to_string(),
        }
    }
}

/// 选择器统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectorStats {
    /// ensure_catalog_ready 成功等到非空列表的次数
    pub catalog_loads: u64,
    /// SelectedVoice 按打分重新计算的次数
    pub recomputations: u64,
}

#[derive(Debug, Default)]
struct SelectorState {
    selected: Option<VoiceDescriptor>,
    /// 是否至少成功加载过一次音色列表
    loaded: bool,
    preference: Option<String>,
}

/// 音色选择器
pub struct VoiceSelector {
    ranker: VoiceRanker,
    poll_interval: Duration,
    preference_key: String,
    synth: Arc<dyn SpeechSynthesisPort>,
    store: Arc<dyn PreferenceStorePort>,
    state: RwLock<SelectorState>,
    /// 串行化“读取音色列表并写入状态”：就绪等待与变更处理依次执行，
    /// 并发的就绪等待各自轮询，后到者读到的总是更新的列表
    ready_lock: Mutex<()>,
    /// 构造时注册的变更订阅，由 spawn_catalog_watcher 取走
    catalog_changes: Mutex<Option<broadcast::Receiver<()>>>,
    catalog_loads: AtomicU64,
    recomputations: AtomicU64,
}

impl VoiceSelector {
    /// 创建选择器
    ///
    /// 立即读取已保存的偏好，并注册音色变更订阅
    pub fn new(
        config: VoiceSelectorConfig,
        synth: Arc<dyn SpeechSynthesisPort>,
        store: Arc<dyn PreferenceStorePort>,
    ) -> Self {
        let preference = match store.get(&config.preference_key) {
            Ok(preference) => preference,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load voice preference, ignoring");
                None
            }
        };

        tracing::info!(
            target_language = %config.selection.target_language,
            prefer_gender = config.selection.prefer_gender_heuristic,
            preference = ?preference,
            "VoiceSelector initialized"
        );

        let catalog_changes = synth.subscribe_voices_changed();

        Self {
            ranker: VoiceRanker::new(&config.selection),
            poll_interval: config.poll_interval,
            preference_key: config.preference_key,
            synth,
            store,
            state: RwLock::new(SelectorState {
                selected: None,
                loaded: false,
                preference,
            }),
            ready_lock: Mutex::new(()),
            catalog_changes: Mutex::new(Some(catalog_changes)),
            catalog_loads: AtomicU64::new(0),
            recomputations: AtomicU64::new(0),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 等待宿主提供非空音色列表，然后重新计算 SelectedVoice
    ///
    /// 宿主不支持语音合成时立即返回空列表
    pub async fn ensure_catalog_ready(&self) -> VoiceCatalog {
        if !self.synth.is_supported() {
            tracing::debug!("Speech synthesis unsupported, skipping catalog wait");
            return Vec::new();
        }

        let _guard = self.ready_lock.lock().await;

        let mut polls = 0u64;
        let mut failures = 0u64;
        let catalog = loop {
            polls += 1;
            match self.synth.list_voices().await {
                Ok(voices) if !voices.is_empty() => break voices,
                Ok(_) => tracing::trace!(polls, "Voice catalog still empty"),
                Err(SynthError::Unsupported) => return Vec::new(),
                Err(e) => {
                    failures += 1;
                    // 只在首次失败时告警，之后每次轮询降为 debug
                    if failures == 1 {
                        tracing::warn!(polls, error = %e, "Failed to list voices, retrying");
                    } else {
                        tracing::debug!(polls, failures, error = %e, "Failed to list voices, retrying");
                    }
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        };

        self.catalog_loads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(polls, voices = catalog.len(), "Voice catalog ready");

        let mut state = self.state.write().await;
        state.loaded = true;
        self.recompute(&mut state, &catalog);
        catalog
    }

    /// 音色得分
    pub fn rank(&self, voice: &VoiceDescriptor) -> i32 {
        self.ranker.rank(voice)
    }

    /// 在给定列表上挑选最佳音色（考虑已保存的偏好）
    pub async fn pick_best(&self, catalog: &[VoiceDescriptor]) -> Option<VoiceDescriptor> {
        let state = self.state.read().await;
        pick_best(&self.ranker, catalog, state.preference.as_deref()).cloned()
    }

    /// 当前列表中排名前 n 的音色名称
    pub async fn top_candidate_names(&self, n: usize) -> Vec<String> {
        let catalog = self.current_catalog().await;
        top_candidates(&self.ranker, &catalog, n)
            .into_iter()
            .map(|voice| voice.name.clone())
            .collect()
    }

    /// 设置用户偏好
    ///
    /// 只有当前列表中存在该音色时才会保存，否则返回 false 且不产生任何副作用
    pub async fn set_preference(&self, name: &str) -> bool {
        let catalog = self.current_catalog().await;
        let Some(voice) = find_by_name(&catalog, name).cloned() else {
            tracing::info!(voice = %name, "Preferred voice not available, ignoring");
            return false;
        };

        // 持有写锁期间完成持久化，避免与变更通知交错
        let mut state = self.state.write().await;
        if let Err(e) = self.store.set(&self.preference_key, name) {
            tracing::warn!(voice = %name, error = %e, "Failed to persist voice preference");
            return false;
        }

        state.preference = Some(name.to_string());
        state.selected = Some(voice);
        tracing::info!(voice = %name, "Voice preference saved");
        true
    }

    /// 宿主音色列表变更
    ///
    /// 从未成功加载过列表时忽略（避免启动早期的空列表通知）。
    /// 与 ensure_catalog_ready 共用 ready_lock，进行中的就绪等待不会用旧列表覆盖本次结果
    pub async fn on_catalog_changed(&self) {
        if !self.state.read().await.loaded {
            tracing::debug!("Voice catalog changed before first load, ignoring");
            return;
        }

        let _guard = self.ready_lock.lock().await;
        let catalog = self.current_catalog().await;
        let mut state = self.state.write().await;

        let preferred = state
            .preference
            .as_deref()
            .and_then(|name| find_by_name(&catalog, name))
            .cloned();

        match preferred {
            Some(voice) => state.selected = Some(voice),
            None => self.recompute(&mut state, &catalog),
        }
    }

    /// 启动变更监听任务
    ///
    /// 订阅在构造时注册，只能启动一次；选择器被释放后任务自动退出
    pub fn spawn_catalog_watcher(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut changes = self.catalog_changes.try_lock().ok()?.take()?;
        let selector: Weak<Self> = Arc::downgrade(self);

        Some(tokio::spawn(async move {
            loop {
                match changes.recv().await {
                    Ok(()) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Voice change notifications lagged");
                    }
                    Err(RecvError::Closed) => break,
                }

                let Some(selector) = selector.upgrade() else {
                    break;
                };
                selector.on_catalog_changed().await;
            }
            tracing::debug!("Voice catalog watcher stopped");
        }))
    }

    /// 后台预热音色列表，不阻塞调用方
    pub fn spawn_warmup(self: &Arc<Self>) -> JoinHandle<()> {
        let selector = Arc::clone(self);
        tokio::spawn(async move {
            let catalog = selector.ensure_catalog_ready().await;
            let selected = selector.selected_voice().await.map(|v| v.name);
            tracing::info!(
                voices = catalog.len(),
                selected = ?selected,
                "Voice catalog warmed up"
            );
        })
    }

    /// 当前缓存的最佳音色
    pub async fn selected_voice(&self) -> Option<VoiceDescriptor> {
        self.state.read().await.selected.clone()
    }

    /// 已保存的偏好音色名称
    pub async fn preference(&self) -> Option<String> {
        self.state.read().await.preference.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.read().await.loaded
    }

    pub fn stats(&self) -> SelectorStats {
        SelectorStats {
            catalog_loads: self.catalog_loads.load(Ordering::Relaxed),
            recomputations: self.recomputations.load(Ordering::Relaxed),
        }
    }

    fn recompute(&self, state: &mut SelectorState, catalog: &[VoiceDescriptor]) {
        let selected = pick_best(&self.ranker, catalog, state.preference.as_deref()).cloned();
        self.recomputations.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(
            voice = ?selected.as_ref().map(|v| v.name.as_str()),
            score = ?selected.as_ref().map(|v| self.ranker.rank(v)),
            "Selected voice recomputed"
        );
        state.selected = selected;
    }

    async fn current_catalog(&self) -> VoiceCatalog {
        match self.synth.list_voices().await {
            Ok(voices) => voices,
            Err(e) => {
                tracing::debug!(error = %e, "Voice catalog unavailable");
                Vec::new()
            }
        }
    }
}

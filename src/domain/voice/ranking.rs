//! Voice Ranking - 音色打分启发式
//!
//! 各项得分相互独立、直接相加：
//! - 语言匹配：完全匹配 +6，同主语言不同地区 +4，仅主语言前缀 +3
//! - 厂商/音质提示词：google +4，microsoft +4，apple/siri +3，neural/wavenet/natural +3
//! - 本地合成 +1
//! - 性别启发式（需开启）+3
//! - 低质量提示词 -3（只扣一次）

use super::{SelectionConfig, VoiceDescriptor};

const EXACT_LANGUAGE_SCORE: i32 = 6;
const REGIONAL_LANGUAGE_SCORE: i32 = 4;
const PRIMARY_LANGUAGE_SCORE: i32 = 3;

/// 每组提示词命中任意一个即得分，组与组之间独立累加
const NAME_HINT_BONUSES: &[(&[&str], i32)] = &[
    (&["google"], 4),
    (&["microsoft"], 4),
    (&["apple", "siri"], 3),
    (&["neural", "wavenet", "natural"], 3),
];

const LOCAL_SERVICE_SCORE: i32 = 1;
const GENDER_HINT_SCORE: i32 = 3;

const LOW_QUALITY_HINTS: &[&str] = &["default", "basic", "compact", "android", "native"];
const LOW_QUALITY_PENALTY: i32 = 3;

/// 音色打分器
///
/// 构造时完成目标语言与提示词的归一化，`rank` 为纯函数
#[derive(Debug, Clone)]
pub struct VoiceRanker {
    target_language: String,
    primary_language: String,
    gender_hints: Vec<String>,
    prefer_gender_heuristic: bool,
}

impl VoiceRanker {
    pub fn new(config: &SelectionConfig) -> Self {
        let target_language = normalize_lang(&config.target_language);
        let primary_language = target_language
            .split('-')
            .next()
            .unwrap_or_default()
            .to_string();

        Self {
            target_language,
            primary_language,
            gender_hints: config
                .gender_hints
                .iter()
                .map(|hint| hint.trim().to_lowercase())
                .filter(|hint| !hint.is_empty())
                .collect(),
            prefer_gender_heuristic: config.prefer_gender_heuristic,
        }
    }

    /// 计算音色得分，允许为负
    pub fn rank(&self, voice: &VoiceDescriptor) -> i32 {
        let name = voice.name.to_lowercase();

        let mut score = self.language_score(&voice.lang);

        for (hints, bonus) in NAME_HINT_BONUSES {
            if hints.iter().any(|hint| name.contains(hint)) {
                score += bonus;
            }
        }

        if voice.local_service {
            score += LOCAL_SERVICE_SCORE;
        }

        if self.prefer_gender_heuristic && self.name_matches_gender(&name) {
            score += GENDER_HINT_SCORE;
        }

        if LOW_QUALITY_HINTS.iter().any(|hint| name.contains(hint)) {
            score -= LOW_QUALITY_PENALTY;
        }

        score
    }

    /// 语言匹配得分
    pub fn language_score(&self, lang: &str) -> i32 {
        if self.primary_language.is_empty() {
            return 0;
        }

        let lang = normalize_lang(lang);
        if lang == self.target_language {
            EXACT_LANGUAGE_SCORE
        } else if lang.starts_with(&format!("{}-", self.primary_language)) {
            REGIONAL_LANGUAGE_SCORE
        } else if lang.starts_with(&self.primary_language) {
            PRIMARY_LANGUAGE_SCORE
        } else {
            0
        }
    }

    /// 音色名称是否命中性别提示词（与是否开启加分无关）
    pub fn matches_gender_hint(&self, voice: &VoiceDescriptor) -> bool {
        self.name_matches_gender(&voice.name.to_lowercase())
    }

    fn name_matches_gender(&self, lowercase_name: &str) -> bool {
        self.gender_hints
            .iter()
            .any(|hint| lowercase_name.contains(hint.as_str()))
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }
}

impl Default for VoiceRanker {
    fn default() -> Self {
        Self::new(&SelectionConfig::default())
    }
}

fn normalize_lang(lang: &str) -> String {
    lang.trim().replace('_', "-").to_lowercase()
}

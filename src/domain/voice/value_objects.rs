//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 宿主平台提供的合成音色
///
/// 只读：由宿主平台创建和销毁，`name` 由厂商决定且不保证唯一
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceDescriptor {
    /// 音色名称
    pub name: String,
    /// BCP-47 语言标签，如 "en-US"
    pub lang: String,
    /// 是否为本地（设备端）合成
    #[serde(default, alias = "local_service")]
    pub local_service: bool,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, lang: impl Into<String>, local_service: bool) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            local_service,
        }
    }
}

impl std::fmt::Display for VoiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.lang)
    }
}

/// 宿主当前已知的音色列表（有序，可能为空）
pub type VoiceCatalog = Vec<VoiceDescriptor>;

/// 目标性别
///
/// 宿主平台不提供性别字段，只能通过名称启发式判断
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Female,
    Male,
}

const FEMALE_NAME_HINTS: &[&str] = &[
    "female", "woman", "samantha", "victoria", "karen", "moira", "tessa", "fiona", "zira",
    "susan", "hazel", "aria", "jenny", "libby", "sonia", "serena", "allison", "ava", "kate",
    "emma", "joanna", "salli", "kimberly", "ivy",
];

// "male" 会命中 "female"，不能作为提示词
const MALE_NAME_HINTS: &[&str] = &[
    "david", "mark", "alex", "daniel", "fred", "george", "guy", "ryan", "thomas", "oliver",
    "james", "matthew", "joey", "justin", "brian", "arthur", "aaron", "rishi",
];

impl Gender {
    /// 该性别的默认名称提示词
    pub fn default_hints(&self) -> &'static [&'static str] {
        match self {
            Self::Female => FEMALE_NAME_HINTS,
            Self::Male => MALE_NAME_HINTS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

/// 音色选择配置
#[derive(Debug, Clone)]
pub struct SelectionConfig {
    /// 目标语言，如 "en-US"
    pub target_language: String,
    /// 性别启发式名称提示词（大小写不敏感）
    pub gender_hints: Vec<String>,
    /// 是否对命中性别提示词的音色加分
    pub prefer_gender_heuristic: bool,
}

impl SelectionConfig {
    pub fn new(target_language: impl Into<String>, gender: Gender) -> Self {
        Self {
            target_language: target_language.into(),
            gender_hints: gender.default_hints().iter().map(|s| s.to_string()).collect(),
            prefer_gender_heuristic: false,
        }
    }

    pub fn with_gender_preference(mut self, enabled: bool) -> Self {
        self.prefer_gender_heuristic = enabled;
        self
    }

    pub fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.gender_hints = hints;
        self
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self::new("en-US", Gender::default())
    }
}

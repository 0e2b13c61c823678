//! Voice Selection - 基于打分结果挑选音色

use super::{VoiceDescriptor, VoiceRanker};

/// 按名称查找音色（首个匹配）
pub fn find_by_name<'a>(catalog: &'a [VoiceDescriptor], name: &str) -> Option<&'a VoiceDescriptor> {
    catalog.iter().find(|voice| voice.name == name)
}

/// 挑选最佳音色
///
/// - 列表为空返回 None
/// - 偏好音色存在于列表中时直接返回，不参与打分
/// - 否则返回得分最高者，同分取列表中最先出现的
pub fn pick_best<'a>(
    ranker: &VoiceRanker,
    catalog: &'a [VoiceDescriptor],
    preference: Option<&str>,
) -> Option<&'a VoiceDescriptor> {
    if let Some(voice) = preference.and_then(|name| find_by_name(catalog, name)) {
        return Some(voice);
    }

    let mut best: Option<(&VoiceDescriptor, i32)> = None;
    for voice in catalog {
        let score = ranker.rank(voice);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((voice, score)),
        }
    }
    best.map(|(voice, _)| voice)
}

/// 排名靠前的候选音色
///
/// 先按得分降序稳定排序，再在排序结果上筛选命中性别提示词的音色：
/// 命中数 >= n 时返回筛选结果的前 n 个，否则返回完整排序结果的前 n 个
pub fn top_candidates<'a>(
    ranker: &VoiceRanker,
    catalog: &'a [VoiceDescriptor],
    n: usize,
) -> Vec<&'a VoiceDescriptor> {
    let mut ranked: Vec<(&VoiceDescriptor, i32)> =
        catalog.iter().map(|voice| (voice, ranker.rank(voice))).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let matching: Vec<&VoiceDescriptor> = ranked
        .iter()
        .map(|(voice, _)| *voice)
        .filter(|voice| ranker.matches_gender_hint(voice))
        .collect();

    if matching.len() >= n {
        return matching.into_iter().take(n).collect();
    }

    ranked.into_iter().take(n).map(|(voice, _)| voice).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::voice::SelectionConfig;

    fn voice(name: &str, lang: &str, local: bool) -> VoiceDescriptor {
        VoiceDescriptor::new(name, lang, local)
    }

    fn names(voices: &[&VoiceDescriptor]) -> Vec<String> {
        voices.iter().map(|v| v.name.clone()).collect()
    }

    #[test]
    fn test_pick_best_empty_catalog() {
        assert!(pick_best(&VoiceRanker::default(), &[], Some("Anything")).is_none());
    }

    #[test]
    fn test_pick_best_prefers_google_over_android() {
        let catalog = vec![
            voice("Android Speech", "en-US", true),
            voice("Google US English", "en-US", false),
        ];
        let best = pick_best(&VoiceRanker::default(), &catalog, None).unwrap();
        assert_eq!(best.name, "Google US English");
    }

    #[test]
    fn test_pick_best_preference_bypasses_ranking() {
        let catalog = vec![
            voice("Google US English", "en-US", false),
            voice("Android Speech", "en-US", true),
        ];
        let best = pick_best(&VoiceRanker::default(), &catalog, Some("Android Speech")).unwrap();
        assert_eq!(best.name, "Android Speech");
    }

    #[test]
    fn test_pick_best_unresolvable_preference_falls_back() {
        let catalog = vec![
            voice("Android Speech", "en-US", true),
            voice("Google US English", "en-US", false),
        ];
        let best = pick_best(&VoiceRanker::default(), &catalog, Some("Gone")).unwrap();
        assert_eq!(best.name, "Google US English");
    }

    #[test]
    fn test_pick_best_tie_keeps_first() {
        let catalog = vec![
            voice("Voice A", "en-US", false),
            voice("Voice B", "en-US", false),
            voice("Voice C", "fr-FR", false),
        ];
        let best = pick_best(&VoiceRanker::default(), &catalog, None).unwrap();
        assert_eq!(best.name, "Voice A");
    }

    #[test]
    fn test_top_candidates_matches_first_then_fallback() {
        let ranker = VoiceRanker::new(&SelectionConfig::default().with_gender_preference(true));
        let mut catalog: Vec<VoiceDescriptor> = (0..10)
            .map(|i| voice(&format!("Voice {}", i), "en-GB", false))
            .collect();
        catalog.insert(3, voice("Samantha", "en-US", true));
        catalog.insert(7, voice("Karen", "en-AU", false));
        catalog.push(voice("Google Zira", "en-US", false));

        let top = top_candidates(&ranker, &catalog, 5);
        assert_eq!(
            names(&top),
            vec!["Google Zira", "Samantha", "Karen", "Voice 0", "Voice 1"]
        );
    }

    #[test]
    fn test_top_candidates_enough_matches() {
        let ranker = VoiceRanker::default();
        let catalog = vec![
            voice("Google US English", "en-US", false),
            voice("Samantha", "en-US", true),
            voice("Daniel", "en-GB", true),
            voice("Karen", "en-AU", true),
        ];

        let top = top_candidates(&ranker, &catalog, 2);
        // Google 得分最高但不命中性别提示词
        assert_eq!(names(&top), vec!["Samantha", "Karen"]);
    }

    #[test]
    fn test_top_candidates_stable_on_equal_rank() {
        let ranker = VoiceRanker::default();
        let catalog = vec![
            voice("Voice B", "en-US", false),
            voice("Voice A", "en-US", false),
            voice("Voice C", "en-US", false),
        ];
        let top = top_candidates(&ranker, &catalog, 5);
        assert_eq!(names(&top), vec!["Voice B", "Voice A", "Voice C"]);
    }
}

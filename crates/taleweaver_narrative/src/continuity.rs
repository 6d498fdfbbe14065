//! Continuity carried from one scene into the next.

use regex::Regex;
use std::sync::LazyLock;
use taleweaver_core::{Continuity, Scene, StoryConcept};

/// Longest recap carried forward.
pub const MAX_RECAP_CHARS: usize = 400;

static SENTENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^.!?]+(?:[.!?]+["'”’)]*|$)"#).expect("Valid sentence regex")
});

/// Splits text into trimmed, non-empty sentences.
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Derives the continuity summary of an accepted scene.
///
/// Deterministic: the same scene and concept always yield the same summary.
///
/// # Examples
///
/// ```
/// use taleweaver_core::{Scene, StoryConcept, Tone};
/// use taleweaver_narrative::derive_continuity;
///
/// let concept = StoryConcept::builder()
///     .character("Mia", "a curious fox")
///     .character("Leo", "a shy owl")
///     .plot("two friends search the forest for a lost star")
///     .moral("friends make you brave")
///     .build();
/// let scene = Scene::new(
///     0,
///     "Mia found a glowing stone. She gasped. The forest went quiet.",
///     Tone::Mysterious,
///     "Mia finds a stone",
///     "A fox beside a glowing stone at dusk. Tall pines all around.",
///     None,
/// );
///
/// let continuity = derive_continuity(&scene, &concept);
/// assert_eq!(continuity.recap, "She gasped. The forest went quiet.");
/// assert_eq!(continuity.setting, "A fox beside a glowing stone at dusk.");
/// assert_eq!(continuity.characters, vec!["Mia".to_string()]);
/// ```
pub fn derive_continuity(scene: &Scene, concept: &StoryConcept) -> Continuity {
    let narration = sentences(scene.text());
    let start = narration.len().saturating_sub(2);
    let recap = tail_chars(&narration[start..].join(" "), MAX_RECAP_CHARS);

    let setting = sentences(scene.visual_description())
        .first()
        .map(|s| s.to_string())
        .unwrap_or_default();

    let characters = concept
        .character_names()
        .filter(|name| mentions(scene.text(), name))
        .map(str::to_string)
        .collect();

    Continuity {
        from_index: *scene.index(),
        recap,
        setting,
        characters,
        tone: *scene.tone(),
    }
}

/// Whole-word, case-insensitive mention check.
fn mentions(text: &str, name: &str) -> bool {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(name)))
        .map(|re| re.is_match(text))
        .unwrap_or_else(|_| text.to_lowercase().contains(&name.to_lowercase()))
}

/// Last `max` characters of `text`, starting on a word boundary.
fn tail_chars(text: &str, max: usize) -> String {
    let count = text.chars().count();
    if count <= max {
        return text.to_string();
    }
    let tail: String = text.chars().skip(count - max).collect();
    match tail.find(char::is_whitespace) {
        Some(idx) => tail[idx..].trim_start().to_string(),
        None => tail,
    }
}

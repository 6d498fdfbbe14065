//! Prompt shaping for scene text, illustrations and narration.
//!
//! Prompt wording is not part of the engine's contract. [`ScenePrompter`] is
//! the seam for replacing it; [`StandardPrompter`] is the built-in wording.

use regex::Regex;
use std::fmt::Write;
use std::sync::LazyLock;
use taleweaver_core::{Continuity, Scene, StoryConcept, Tone};

/// Everything a scene prompt may draw on.
#[derive(Debug, Clone, Copy)]
pub struct SceneBrief<'a> {
    /// Validated story concept
    pub concept: &'a StoryConcept,
    /// Index of the scene to write
    pub index: usize,
    /// Total scenes in the story
    pub scene_count: usize,
    /// Summary of the previous scene, if any
    pub continuity: Option<&'a Continuity>,
    /// Tones the scene may declare
    pub tones: &'a [Tone],
}

/// Renders the prompt for one scene.
pub trait ScenePrompter: Send + Sync {
    /// Prompt text for the scene described by `brief`.
    fn scene_prompt(&self, brief: &SceneBrief<'_>) -> String;
}

/// Built-in scene prompt wording.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardPrompter;

impl ScenePrompter for StandardPrompter {
    fn scene_prompt(&self, brief: &SceneBrief<'_>) -> String {
        let concept = brief.concept;
        let mut prompt = String::new();

        let _ = writeln!(prompt, "# Story");
        let _ = writeln!(prompt, "Title: {}", concept.display_title());
        let _ = writeln!(prompt, "Genre: {}", concept.genre());
        let _ = writeln!(prompt, "Target age: {}", concept.target_age());
        let _ = writeln!(prompt, "Plot: {}", concept.plot());
        let _ = writeln!(prompt, "Moral: {}", concept.moral());

        let _ = writeln!(prompt, "\n# Characters");
        for (name, description) in concept.characters() {
            let _ = writeln!(prompt, "- {}: {}", name, description);
        }
        if !concept.style_examples().is_empty() {
            let _ = writeln!(prompt, "\n# Style to follow");
            for example in concept.style_examples() {
                let _ = writeln!(prompt, "- {}", example);
            }
        }

        let _ = writeln!(
            prompt,
            "\n# Task\nWrite scene {} of {}.",
            brief.index + 1,
            brief.scene_count
        );
        match brief.continuity {
            Some(previous) => {
                let _ = writeln!(prompt, "The previous scene ended: {}", previous.recap);
                if !previous.setting.is_empty() {
                    let _ = writeln!(prompt, "It was set: {}", previous.setting);
                }
                if !previous.characters.is_empty() {
                    let _ = writeln!(
                        prompt,
                        "Characters present: {}",
                        previous.characters.join(", ")
                    );
                }
                let _ = writeln!(prompt, "Its tone was {}. Continue seamlessly.", previous.tone);
            }
            None => {
                let _ = writeln!(prompt, "This is the opening scene.");
            }
        }
        if brief.index + 1 == brief.scene_count {
            let _ = writeln!(prompt, "This is the final scene: resolve the plot and land the moral.");
        }

        let tones: Vec<&str> = brief.tones.iter().map(|t| t.as_ref()).collect();
        let _ = writeln!(
            prompt,
            "\n# Output\nReply with one JSON object with these string fields:\n\
             - \"narration\": the scene narration\n\
             - \"tone\": one of {}\n\
             - \"summary\": one sentence describing what happens\n\
             - \"visual_description\": characters, setting, lighting and colors for an illustration, \
             using the exact character appearances above",
            tones.join(", ")
        );

        prompt
    }
}

/// Builds illustration prompts that keep characters and style consistent.
///
/// # Examples
///
/// ```
/// use taleweaver_core::{Scene, StoryConcept, Tone};
/// use taleweaver_narrative::ImagePrompter;
///
/// let concept = StoryConcept::builder()
///     .character("Mia", "a red fox with a green scarf")
///     .plot("two friends search the forest for a lost star")
///     .moral("friends make you brave")
///     .build();
/// let scene = Scene::new(0, "Mia ran.", Tone::Excited, "Mia runs", "Mia racing through snow.", None);
///
/// let prompt = ImagePrompter::new("watercolor").prompt(&scene, &concept);
/// assert!(prompt.starts_with("Mia racing through snow."));
/// assert!(prompt.contains("Mia: a red fox with a green scarf"));
/// assert!(prompt.ends_with("Style: watercolor."));
/// ```
#[derive(Debug, Clone)]
pub struct ImagePrompter {
    style: String,
}

impl ImagePrompter {
    /// Creates a prompter with a style line appended to every prompt.
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
        }
    }

    /// Illustration prompt for a scene.
    ///
    /// Every concept character mentioned in the scene's visual description or
    /// narration gets its canonical description restated.
    pub fn prompt(&self, scene: &Scene, concept: &StoryConcept) -> String {
        let mut prompt = scene.visual_description().trim().to_string();

        let haystack = format!("{} {}", scene.visual_description(), scene.text()).to_lowercase();
        let sheet: Vec<String> = concept
            .characters()
            .iter()
            .filter(|(name, _)| haystack.contains(&name.to_lowercase()))
            .map(|(name, description)| format!("{}: {}", name, description))
            .collect();
        if !sheet.is_empty() {
            let _ = write!(
                prompt,
                " Characters, drawn exactly as described: {}.",
                sheet.join("; ")
            );
        }
        let _ = write!(prompt, " Mood: {}.", scene.tone());
        if !self.style.trim().is_empty() {
            let _ = write!(prompt, " Style: {}.", self.style.trim());
        }
        prompt
    }
}

/// Prosody applied to a whole scene narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prosody {
    /// Speaking rate
    pub rate: &'static str,
    /// Pitch shift
    pub pitch: &'static str,
    /// Loudness
    pub volume: &'static str,
}

impl Prosody {
    /// Prosody for a tone.
    pub fn for_tone(tone: Tone) -> Self {
        let (rate, pitch, volume) = match tone {
            Tone::Calm => ("medium", "medium", "medium"),
            Tone::Curious => ("medium", "+2st", "medium"),
            Tone::Awe => ("slow", "+1st", "soft"),
            Tone::Tense => ("fast", "+3st", "loud"),
            Tone::Determined => ("medium", "medium", "loud"),
            Tone::Sad => ("slow", "-2st", "soft"),
            Tone::Excited => ("fast", "+4st", "loud"),
            Tone::Angry => ("fast", "+2st", "loud"),
            Tone::Mysterious => ("slow", "-1st", "soft"),
            Tone::Joyful => ("medium", "+3st", "medium"),
            Tone::Vulnerable => ("slow", "-1st", "soft"),
            Tone::Tender => ("slow", "medium", "soft"),
            Tone::Nostalgic => ("slow", "-1st", "medium"),
            Tone::Hopeful => ("medium", "+1st", "medium"),
            Tone::Melancholy => ("slow", "-2st", "soft"),
            Tone::Passionate => ("medium", "+2st", "loud"),
        };
        Self {
            rate,
            pitch,
            volume,
        }
    }

    /// Loud tones are also emphasized.
    pub fn emphasized(&self) -> bool {
        self.volume == "loud"
    }
}

static SENTENCE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?]+)(\s+|$)").expect("Valid sentence end regex"));

/// Pause after each sentence.
pub const SENTENCE_BREAK: &str = r#"<break time="500ms"/>"#;

/// Pause before every scene after the first.
pub const SCENE_BREAK: &str = r#"<break time="1s"/>"#;

/// Builds SSML narration for a scene.
///
/// # Examples
///
/// ```
/// use taleweaver_core::{Scene, Tone};
/// use taleweaver_narrative::SsmlBuilder;
///
/// let scene = Scene::new(0, "Tom & Jerry hid.", Tone::Calm, "hiding", "a barn", None);
/// assert_eq!(
///     SsmlBuilder::build(&scene),
///     r#"<speak><prosody rate="medium" pitch="medium" volume="medium">Tom &amp; Jerry hid.<break time="500ms"/></prosody></speak>"#
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SsmlBuilder;

impl SsmlBuilder {
    /// SSML for a scene's narration, shaped by its tone.
    pub fn build(scene: &Scene) -> String {
        let prosody = Prosody::for_tone(*scene.tone());
        let body = Self::with_sentence_breaks(&Self::escape(scene.text().trim()));

        let mut ssml = String::from("<speak>");
        if *scene.index() > 0 {
            ssml.push_str(SCENE_BREAK);
        }
        let _ = write!(
            ssml,
            r#"<prosody rate="{}" pitch="{}" volume="{}">"#,
            prosody.rate, prosody.pitch, prosody.volume
        );
        if prosody.emphasized() {
            let _ = write!(ssml, r#"<emphasis level="moderate">{}</emphasis>"#, body);
        } else {
            ssml.push_str(&body);
        }
        ssml.push_str("</prosody></speak>");
        ssml
    }

    /// Escapes XML special characters.
    pub fn escape(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;")
    }

    fn with_sentence_breaks(text: &str) -> String {
        SENTENCE_END
            .replace_all(text, format!("${{1}}{}${{2}}", SENTENCE_BREAK).as_str())
            .into_owned()
    }
}

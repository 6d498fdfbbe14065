//! Story concept input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum trimmed length of a concept plot.
const MIN_PLOT_CHARS: usize = 20;

/// Minimum trimmed length of a concept moral.
const MIN_MORAL_CHARS: usize = 10;

/// Audience a story is written for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TargetAge {
    /// Young readers.
    #[default]
    #[serde(alias = "children")]
    #[strum(to_string = "child", serialize = "children")]
    Child,
    /// Teenage readers.
    Teen,
    /// Adult readers.
    Adult,
}

/// The structured idea a story is generated from.
///
/// Characters are kept in a sorted map so that every rendering of a concept
/// (prompts, continuity, serialized records) sees them in the same order.
///
/// # Examples
///
/// ```
/// use taleweaver_core::{StoryConcept, TargetAge};
///
/// let concept = StoryConcept::builder()
///     .character("hero", "a young explorer with a red scarf")
///     .character("mentor", "an old wizard")
///     .plot("find the lost crystal before winter")
///     .moral("courage grows when shared")
///     .target_age(TargetAge::Child)
///     .build();
///
/// assert!(concept.validate().is_ok());
/// assert_eq!(concept.characters().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoryConcept {
    /// Character name to description.
    characters: BTreeMap<String, String>,
    /// Main plot line.
    plot: String,
    /// Moral or theme.
    moral: String,
    /// Genre label.
    #[serde(default = "default_genre")]
    genre: String,
    /// Intended audience.
    #[serde(default)]
    target_age: TargetAge,
    /// Optional working title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    /// Example styles the narration should follow.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    style_examples: Vec<String>,
}

fn default_genre() -> String {
    "fantasy".to_string()
}

impl StoryConcept {
    /// Creates a new concept builder.
    pub fn builder() -> StoryConceptBuilder {
        StoryConceptBuilder::default()
    }

    /// Validates the concept at the pipeline boundary.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.characters.is_empty() {
            return Err("concept must name at least one character".to_string());
        }
        for (name, description) in &self.characters {
            if name.trim().is_empty() {
                return Err("character names cannot be blank".to_string());
            }
            if description.trim().is_empty() {
                return Err(format!("character '{}' has no description", name));
            }
        }
        if self.plot.trim().chars().count() < MIN_PLOT_CHARS {
            return Err(format!(
                "plot must be at least {} characters, got {}",
                MIN_PLOT_CHARS,
                self.plot.trim().chars().count()
            ));
        }
        if self.moral.trim().chars().count() < MIN_MORAL_CHARS {
            return Err(format!(
                "moral must be at least {} characters, got {}",
                MIN_MORAL_CHARS,
                self.moral.trim().chars().count()
            ));
        }
        if self.genre.trim().is_empty() {
            return Err("genre cannot be blank".to_string());
        }
        Ok(())
    }

    /// Character names in concept order.
    pub fn character_names(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    /// Title to use when the concept has none.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// Builder for [`StoryConcept`].
#[derive(Debug, Default)]
pub struct StoryConceptBuilder {
    characters: BTreeMap<String, String>,
    plot: String,
    moral: String,
    genre: Option<String>,
    target_age: TargetAge,
    title: Option<String>,
    style_examples: Vec<String>,
}

impl StoryConceptBuilder {
    /// Adds a character.
    pub fn character(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.characters.insert(name.into(), description.into());
        self
    }

    /// Sets the plot.
    pub fn plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = plot.into();
        self
    }

    /// Sets the moral.
    pub fn moral(mut self, moral: impl Into<String>) -> Self {
        self.moral = moral.into();
        self
    }

    /// Sets the genre.
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    /// Sets the target age.
    pub fn target_age(mut self, target_age: TargetAge) -> Self {
        self.target_age = target_age;
        self
    }

    /// Sets the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Adds a style example.
    pub fn style_example(mut self, example: impl Into<String>) -> Self {
        self.style_examples.push(example.into());
        self
    }

    /// Builds the concept. Validation is a separate step.
    pub fn build(self) -> StoryConcept {
        StoryConcept {
            characters: self.characters,
            plot: self.plot,
            moral: self.moral,
            genre: self.genre.unwrap_or_else(default_genre),
            target_age: self.target_age,
            title: self.title,
            style_examples: self.style_examples,
        }
    }
}

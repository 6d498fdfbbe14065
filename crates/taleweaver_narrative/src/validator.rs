//! Scene response validation.

use crate::{extract_json, parse_json};
use serde_json::{Map, Value};
use std::str::FromStr;
use taleweaver_core::{ProviderOutput, Tone};
use taleweaver_rate_limit::{TaleweaverConfig, ValidationConfig};

/// Scene content that passed validation, before it is numbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneDraft {
    /// Narration text
    pub narration: String,
    /// Declared tone
    pub tone: Tone,
    /// Short plot summary
    pub summary: String,
    /// Image prompt material
    pub visual_description: String,
}

/// Checks scene responses against the expected shape, the configured tone set
/// and the configured length bounds.
///
/// Every rejection is a human-readable message; delegation feeds it back to
/// the provider as a repair hint.
///
/// # Examples
///
/// ```
/// use taleweaver_core::Tone;
/// use taleweaver_narrative::SceneValidator;
/// use taleweaver_rate_limit::ValidationConfig;
///
/// let validator = SceneValidator::new(ValidationConfig::default(), vec![Tone::Calm]);
/// let err = validator.validate_text("no json here").unwrap_err();
/// assert!(err.contains("JSON"));
/// ```
#[derive(Debug, Clone)]
pub struct SceneValidator {
    bounds: ValidationConfig,
    tones: Vec<Tone>,
}

impl SceneValidator {
    /// Creates a validator.
    pub fn new(bounds: ValidationConfig, tones: Vec<Tone>) -> Self {
        Self { bounds, tones }
    }

    /// Validator using the configured bounds and tones.
    pub fn from_config(config: &TaleweaverConfig) -> Self {
        Self::new(config.validation.clone(), config.story.tones.clone())
    }

    /// Tones a scene may declare.
    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Validates raw provider output.
    pub fn validate(&self, output: ProviderOutput) -> Result<SceneDraft, String> {
        match output.as_text() {
            Some(text) => self.validate_text(text),
            None => Err(format!(
                "expected a text response, got {}",
                output.kind_name()
            )),
        }
    }

    /// Validates a text response.
    pub fn validate_text(&self, text: &str) -> Result<SceneDraft, String> {
        let json = extract_json(text).map_err(|e| e.message)?;
        let object: Map<String, Value> = parse_json(&json).map_err(|e| e.message)?;

        let narration = required(&object, &["narration", "text"])?;
        let tone_name = required(&object, &["tone"])?;
        let summary = required(&object, &["summary"])?;
        let visual_description = required(
            &object,
            &["visual_description", "visualDescription", "image_prompt"],
        )?;

        let tone = Tone::from_str(&tone_name)
            .ok()
            .filter(|tone| self.tones.contains(tone))
            .ok_or_else(|| {
                let allowed: Vec<&str> = self.tones.iter().map(|t| t.as_ref()).collect();
                format!(
                    "tone '{}' is not one of: {}",
                    tone_name,
                    allowed.join(", ")
                )
            })?;

        let b = &self.bounds;
        check_length("narration", &narration, b.narration_min, b.narration_max)?;
        check_length("summary", &summary, b.summary_min, b.summary_max)?;
        check_length(
            "visual_description",
            &visual_description,
            b.visual_min,
            b.visual_max,
        )?;

        Ok(SceneDraft {
            narration,
            tone,
            summary,
            visual_description,
        })
    }
}

/// First present, non-blank string among `keys`, trimmed.
fn required(object: &Map<String, Value>, keys: &[&str]) -> Result<String, String> {
    let value = keys.iter().find_map(|key| object.get(*key));
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(format!("field '{}' is empty", keys[0])),
        Some(other) => Err(format!(
            "field '{}' must be a string, got {}",
            keys[0],
            json_type(other)
        )),
        None => Err(format!("missing required field '{}'", keys[0])),
    }
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(format!(
            "{} must be {}-{} characters, got {}",
            field, min, max, len
        ));
    }
    Ok(())
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Engine configuration.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`taleweaver.toml` shipped with the library)
//! 2. `~/.config/taleweaver/taleweaver.toml`
//! 3. `./taleweaver.toml`
//! 4. An explicit file (`--config`)
//! 5. `TALEWEAVER__SECTION__KEY` environment variables

use crate::BackoffSchedule;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use taleweaver_core::{Modality, RequestClass, Tone};
use taleweaver_error::{ConfigError, TaleweaverError, TaleweaverResult};
use taleweaver_interface::{CostClass, LatencyClass};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../taleweaver.toml");

/// Story shape and deadline.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoryConfig {
    /// Number of scenes to generate
    pub scene_count: usize,
    /// Deadline for a whole story run
    pub story_timeout_ms: u64,
    /// Asset modalities generated for every scene
    pub modalities: Vec<Modality>,
    /// Tones a scene may declare
    pub tones: Vec<Tone>,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            scene_count: 6,
            story_timeout_ms: 900_000,
            modalities: vec![Modality::Image, Modality::Audio],
            tones: Tone::all(),
        }
    }
}

impl StoryConfig {
    /// Story deadline.
    pub fn story_timeout(&self) -> Duration {
        Duration::from_millis(self.story_timeout_ms)
    }
}

/// Character-length bounds applied to generated scene fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum narration length
    pub narration_min: usize,
    /// Maximum narration length
    pub narration_max: usize,
    /// Minimum summary length
    pub summary_min: usize,
    /// Maximum summary length
    pub summary_max: usize,
    /// Minimum visual description length
    pub visual_min: usize,
    /// Maximum visual description length
    pub visual_max: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            narration_min: 50,
            narration_max: 1200,
            summary_min: 10,
            summary_max: 300,
            visual_min: 30,
            visual_max: 600,
        }
    }
}

/// Ordered provider names per request class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreferencesConfig {
    /// Scene text candidates
    pub scene_text: Vec<String>,
    /// Image candidates
    pub image: Vec<String>,
    /// Audio candidates
    pub audio: Vec<String>,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            scene_text: vec!["openai".to_string(), "anthropic".to_string()],
            image: vec!["openai".to_string(), "stability".to_string()],
            audio: vec!["openai".to_string()],
        }
    }
}

impl PreferencesConfig {
    /// Candidates for a request class, most preferred first.
    pub fn for_class(&self, class: RequestClass) -> &[String] {
        match class {
            RequestClass::SceneText => &self.scene_text,
            RequestClass::Image => &self.image,
            RequestClass::Audio => &self.audio,
        }
    }
}

/// Fallback and retry limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DelegationConfig {
    /// Hard cap on attempts for one logical request
    pub global_attempt_ceiling: u32,
    /// Attempts per candidate when the provider sets no `retry_budget`
    pub default_retry_budget: u32,
    /// First backoff delay
    pub backoff_base_ms: u64,
    /// Largest backoff delay
    pub backoff_cap_ms: u64,
    /// Candidate order per request class
    pub preferences: PreferencesConfig,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            global_attempt_ceiling: 8,
            default_retry_budget: 2,
            backoff_base_ms: 500,
            backoff_cap_ms: 8_000,
            preferences: PreferencesConfig::default(),
        }
    }
}

impl DelegationConfig {
    /// Backoff schedule built from the base and cap.
    pub fn backoff(&self) -> BackoffSchedule {
        BackoffSchedule::new(
            Duration::from_millis(self.backoff_base_ms),
            Duration::from_millis(self.backoff_cap_ms),
        )
    }
}

/// What to record when an asset cannot be generated.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FailureMode {
    /// Record the asset as failed with no reference
    #[default]
    Failed,
    /// Record a placeholder reference
    Placeholder,
}

/// Asset generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Asset requests in flight at once, story-wide
    pub max_in_flight: usize,
    /// Exhaustion handling
    pub failure_mode: FailureMode,
    /// Placeholder URI for images
    pub image_placeholder: String,
    /// Placeholder URI for audio
    pub audio_placeholder: String,
    /// Style line appended to every image prompt
    pub image_style: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 3,
            failure_mode: FailureMode::Failed,
            image_placeholder: "placeholder://image".to_string(),
            audio_placeholder: "placeholder://audio".to_string(),
            image_style: "consistent children's book illustration, same artistic style throughout"
                .to_string(),
        }
    }
}

impl AssetsConfig {
    /// Placeholder URI for a modality.
    pub fn placeholder_for(&self, modality: Modality) -> &str {
        match modality {
            Modality::Image => &self.image_placeholder,
            Modality::Audio => &self.audio_placeholder,
        }
    }
}

/// Which adapter implementation a provider section configures.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// OpenAI chat, image and speech APIs
    Openai,
    /// Anthropic messages API
    Anthropic,
    /// Stability AI text-to-image
    Stability,
}

/// One `[providers.<name>]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Adapter implementation
    pub kind: ProviderKind,
    /// Environment variable holding the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// API base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Request classes this provider serves
    pub classes: Vec<RequestClass>,
    /// Cost tier
    #[serde(default)]
    pub cost_class: CostClass,
    /// Latency tier
    #[serde(default)]
    pub latency_class: LatencyClass,
    /// Hard per-call timeout
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    /// Attempts allowed on this provider per request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_budget: Option<u32>,
    /// Request pacing; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
    /// Model used for scene text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_model: Option<String>,
    /// Model used for images
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_model: Option<String>,
    /// Model used for speech
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_model: Option<String>,
    /// Speech voice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    /// Sampling temperature for text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Output token limit for text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_call_timeout_ms() -> u64 {
    60_000
}

impl ProviderConfig {
    /// Creates a section with defaults for everything but kind and classes.
    pub fn new(kind: ProviderKind, classes: Vec<RequestClass>) -> Self {
        Self {
            kind,
            api_key_env: None,
            base_url: None,
            classes,
            cost_class: CostClass::default(),
            latency_class: LatencyClass::default(),
            call_timeout_ms: default_call_timeout_ms(),
            retry_budget: None,
            requests_per_minute: None,
            text_model: None,
            image_model: None,
            speech_model: None,
            voice: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Hard per-call timeout.
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

/// Top-level Taleweaver configuration.
///
/// Constructed once, validated, and passed by reference.
///
/// # Example
///
/// ```no_run
/// use taleweaver_rate_limit::TaleweaverConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = TaleweaverConfig::load()?;
/// println!("Scenes per story: {}", config.story.scene_count);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TaleweaverConfig {
    /// Story shape
    pub story: StoryConfig,
    /// Scene field bounds
    pub validation: ValidationConfig,
    /// Fallback and retry limits
    pub delegation: DelegationConfig,
    /// Asset settings
    pub assets: AssetsConfig,
    /// Provider sections by name
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl TaleweaverConfig {
    /// Load configuration from the default locations.
    #[instrument]
    pub fn load() -> TaleweaverResult<Self> {
        Self::load_with(None)
    }

    /// Load configuration from the default locations plus an explicit file.
    ///
    /// The explicit file, when given, must exist.
    #[instrument]
    pub fn load_with(explicit: Option<&Path>) -> TaleweaverResult<Self> {
        debug!("Loading configuration: env > explicit > current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/taleweaver/taleweaver.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("taleweaver").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TALEWEAVER")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Load configuration from a single file, without defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> TaleweaverResult<Self> {
        debug!("Loading configuration from file");
        Self::finish(Config::builder().add_source(File::from(path.as_ref())))
    }

    /// Bundled defaults with a TOML string layered on top.
    pub fn from_toml_str(overrides: &str) -> TaleweaverResult<Self> {
        Self::finish(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from_str(overrides, FileFormat::Toml)),
        )
    }

    /// The bundled defaults alone.
    pub fn bundled() -> TaleweaverResult<Self> {
        Self::from_toml_str("")
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> TaleweaverResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                TaleweaverError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                TaleweaverError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        debug!(
            providers = config.providers.len(),
            scene_count = config.story.scene_count,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.story.scene_count == 0 {
            return Err(ConfigError::for_key("story.scene_count", "must be at least 1"));
        }
        if self.story.story_timeout_ms == 0 {
            return Err(ConfigError::for_key("story.story_timeout_ms", "must be positive"));
        }
        if self.story.tones.is_empty() {
            return Err(ConfigError::for_key("story.tones", "must list at least one tone"));
        }
        if self.assets.max_in_flight == 0 {
            return Err(ConfigError::for_key("assets.max_in_flight", "must be at least 1"));
        }
        if self.delegation.global_attempt_ceiling == 0 {
            return Err(ConfigError::for_key(
                "delegation.global_attempt_ceiling",
                "must be at least 1",
            ));
        }
        if self.delegation.default_retry_budget == 0 {
            return Err(ConfigError::for_key(
                "delegation.default_retry_budget",
                "must be at least 1",
            ));
        }

        let v = &self.validation;
        for (key, min, max) in [
            ("validation.narration", v.narration_min, v.narration_max),
            ("validation.summary", v.summary_min, v.summary_max),
            ("validation.visual", v.visual_min, v.visual_max),
        ] {
            if max == 0 || min > max {
                return Err(ConfigError::for_key(
                    key,
                    format!("invalid bounds {}..={}", min, max),
                ));
            }
        }

        for (name, provider) in &self.providers {
            if provider.classes.is_empty() {
                return Err(ConfigError::for_key(
                    format!("providers.{}.classes", name),
                    "must list at least one request class",
                ));
            }
            if provider.retry_budget == Some(0) {
                return Err(ConfigError::for_key(
                    format!("providers.{}.retry_budget", name),
                    "must be at least 1",
                ));
            }
            if provider.call_timeout_ms == 0 {
                return Err(ConfigError::for_key(
                    format!("providers.{}.call_timeout_ms", name),
                    "must be positive",
                ));
            }
        }

        for class in [RequestClass::SceneText, RequestClass::Image, RequestClass::Audio] {
            for name in self.delegation.preferences.for_class(class) {
                if !self.providers.contains_key(name) {
                    return Err(ConfigError::for_key(
                        format!("delegation.preferences.{}", class),
                        format!("names undefined provider '{}'", name),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Attempts allowed on a provider per request.
    pub fn retry_budget(&self, provider: &str) -> u32 {
        self.providers
            .get(provider)
            .and_then(|p| p.retry_budget)
            .unwrap_or(self.delegation.default_retry_budget)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render configuration: {}", e)))
    }
}

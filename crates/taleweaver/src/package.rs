//! Concept files in, story packages out.

use std::fs;
use std::path::{Path, PathBuf};
use taleweaver_core::{AssetRef, StoryConcept, StoryRecord};
use taleweaver_error::{JsonError, OutputError, TaleweaverResult};
use tracing::{debug, info, instrument};

/// Reads a concept from a JSON or TOML file.
///
/// Files ending in `.toml` are parsed as TOML; anything else as JSON. The
/// concept is not validated here.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_concept(path: &Path) -> TaleweaverResult<StoryConcept> {
    let contents = fs::read_to_string(path).map_err(|e| {
        JsonError::new(format!("Failed to read concept file {}: {}", path.display(), e))
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let concept: StoryConcept = if is_toml {
        toml::from_str(&contents).map_err(|e| {
            JsonError::new(format!("Invalid concept TOML in {}: {}", path.display(), e))
        })?
    } else {
        serde_json::from_str(&contents).map_err(JsonError::from)?
    };

    debug!(
        characters = concept.characters().len(),
        title = %concept.display_title(),
        "Concept loaded"
    );
    Ok(concept)
}

/// Timestamped output directory under the working directory.
pub fn default_output_dir() -> PathBuf {
    PathBuf::from(format!(
        "story-{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ))
}

/// File extension for an asset MIME type.
///
/// # Examples
///
/// ```
/// use taleweaver::asset_extension;
///
/// assert_eq!(asset_extension("image/png"), "png");
/// assert_eq!(asset_extension("audio/mpeg"), "mp3");
/// assert_eq!(asset_extension("application/x-unknown"), "bin");
/// ```
pub fn asset_extension(mime: &str) -> &'static str {
    match mime {
        "image/png" => "png",
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "audio/mpeg" | "audio/mp3" => "mp3",
        "audio/wav" | "audio/x-wav" => "wav",
        "audio/ogg" => "ogg",
        "audio/opus" => "opus",
        "audio/flac" => "flac",
        "audio/aac" => "aac",
        _ => "bin",
    }
}

/// A story record written to disk.
///
/// The package is `story.json` plus, optionally, one file per inline asset
/// named `scene_NN.<ext>`.
#[derive(Debug, Clone)]
pub struct StoryPackage {
    dir: PathBuf,
    write_assets: bool,
}

impl StoryPackage {
    /// Package rooted at `dir`, writing asset files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_assets: true,
        }
    }

    /// Whether inline assets are decoded to files.
    pub fn with_asset_files(mut self, write_assets: bool) -> Self {
        self.write_assets = write_assets;
        self
    }

    /// Package directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the record, returning every file created.
    #[instrument(skip(self, record), fields(dir = %self.dir.display()))]
    pub fn write(&self, record: &StoryRecord) -> TaleweaverResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| OutputError::new(self.dir.display().to_string(), e.to_string()))?;

        let mut written = Vec::new();
        let story_path = self.dir.join("story.json");
        let json = serde_json::to_string_pretty(record).map_err(JsonError::from)?;
        write_file(&story_path, json.as_bytes())?;
        written.push(story_path);

        if self.write_assets {
            for asset in record.assets() {
                let Some(reference) = asset.reference() else {
                    continue;
                };
                let (AssetRef::Inline { mime, .. }, Some(decoded)) =
                    (reference, reference.decode_inline())
                else {
                    continue;
                };
                let path = self.dir.join(format!(
                    "scene_{:02}.{}",
                    asset.scene_index(),
                    asset_extension(mime)
                ));
                let bytes = decoded.map_err(|e| {
                    OutputError::new(
                        path.display().to_string(),
                        format!("Invalid inline {} payload: {}", asset.modality(), e),
                    )
                })?;
                write_file(&path, &bytes)?;
                written.push(path);
            }
        }

        info!(files = written.len(), "Story package written");
        Ok(written)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    fs::write(path, bytes).map_err(|e| OutputError::new(path.display().to_string(), e.to_string()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}

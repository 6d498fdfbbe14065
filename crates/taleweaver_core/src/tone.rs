//! Emotional tone tags.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Emotional tone tag attached to every scene.
///
/// The full set is fixed; configuration narrows it to the tones a story may
/// use.
///
/// # Examples
///
/// ```
/// use taleweaver_core::Tone;
/// use std::str::FromStr;
///
/// assert_eq!(Tone::from_str("Curious").unwrap(), Tone::Curious);
/// assert_eq!(Tone::Awe.to_string(), "awe");
/// assert_eq!(Tone::all().len(), 16);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
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
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tone {
    /// Calm.
    Calm,
    /// Curious.
    Curious,
    /// Awe.
    Awe,
    /// Tense.
    Tense,
    /// Determined.
    Determined,
    /// Sad.
    Sad,
    /// Excited.
    Excited,
    /// Angry.
    Angry,
    /// Mysterious.
    Mysterious,
    /// Joyful.
    Joyful,
    /// Vulnerable.
    Vulnerable,
    /// Tender.
    Tender,
    /// Nostalgic.
    Nostalgic,
    /// Hopeful.
    Hopeful,
    /// Melancholy.
    Melancholy,
    /// Passionate.
    Passionate,
}

impl Tone {
    /// Every tone tag, in declaration order.
    pub fn all() -> Vec<Tone> {
        Tone::iter().collect()
    }
}

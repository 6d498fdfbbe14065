//! SSML flattening for speech APIs that only accept plain text.

use regex::Regex;
use std::sync::LazyLock;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Valid tag regex"));
static SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Valid space regex"));

/// Strips SSML markup and unescapes XML entities.
///
/// Text without markup passes through with whitespace collapsed.
///
/// # Examples
///
/// ```
/// use taleweaver_models::ssml_to_plain;
///
/// let ssml = r#"<speak><prosody rate="slow">Tom &amp; Jerry</prosody><break time="1s"/> ran.</speak>"#;
/// assert_eq!(ssml_to_plain(ssml), "Tom & Jerry ran.");
/// ```
pub fn ssml_to_plain(text: &str) -> String {
    let stripped = TAG.replace_all(text, " ");
    let unescaped = stripped
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    let collapsed = SPACE.replace_all(unescaped.trim(), " ");
    collapsed
        .replace(" .", ".")
        .replace(" ,", ",")
        .replace(" !", "!")
        .replace(" ?", "?")
}

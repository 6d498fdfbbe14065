//! Utilities for extracting structured data from LLM responses.
//!
//! Scene responses are requested as a bare JSON object but often arrive
//! wrapped in markdown code blocks or surrounded by explanatory text.

use taleweaver_error::JsonError;

/// Extract a JSON object from a response that may contain markdown or extra text.
///
/// Strategies, in order:
/// 1. Markdown code blocks: ```json ... ``` (or an unlabelled fence)
/// 2. Balanced braces: { ... }
///
/// # Errors
///
/// Returns an error if no JSON object is found in the response.
///
/// # Examples
///
/// ```
/// use taleweaver_narrative::extract_json;
///
/// let response = "Here is the scene:\n\
///     \n\
///     ```json\n\
///     {\"narration\": \"Once upon a time\"}\n\
///     ```\n";
///
/// let json = extract_json(response).unwrap();
/// assert!(json.starts_with('{'));
/// ```
pub fn extract_json(response: &str) -> Result<String, JsonError> {
    if let Some(block) = extract_from_code_block(response, "json") {
        if let Some(json) = extract_balanced(&block, '{', '}') {
            return Ok(json);
        }
    }

    if let Some(json) = extract_balanced(response, '{', '}') {
        return Ok(json);
    }

    tracing::debug!(
        response_length = response.len(),
        "No JSON object found in response"
    );

    Err(JsonError::new(format!(
        "No JSON object found in response (length: {}). Reply with a single JSON object only.",
        response.len()
    )))
}

/// Extract content from markdown code blocks.
///
/// Looks for patterns like:
/// - ```language\n...\n```
/// - ``` ... ``` (no language specified)
fn extract_from_code_block(response: &str, language: &str) -> Option<String> {
    let pattern = format!("```{}", language);

    if let Some(start) = response.find(&pattern) {
        let content_start = start + pattern.len();
        if let Some(end) = response[content_start..].find("```") {
            let content = &response[content_start..content_start + end];
            return Some(content.trim().to_string());
        }
        // Unclosed fence: the response was probably truncated
        return Some(response[content_start..].trim().to_string());
    }

    if let Some(start) = response.find("```") {
        let content_start = start + 3;
        let skip_to = response[content_start..]
            .find('\n')
            .map(|n| content_start + n + 1)
            .unwrap_or(content_start);

        if let Some(end) = response[skip_to..].find("```") {
            let content = &response[skip_to..skip_to + end];
            return Some(content.trim().to_string());
        }
        return Some(response[skip_to..].trim().to_string());
    }

    None
}

/// Extract content between balanced delimiters.
///
/// Finds the first occurrence of `open` and extracts content up to
/// the matching `close`, handling nesting and string literals.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

/// Parse JSON into a specific type.
///
/// # Errors
///
/// Returns an error if the JSON string cannot be parsed into type `T`.
///
/// # Examples
///
/// ```
/// use taleweaver_narrative::parse_json;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Beat {
///     tone: String,
/// }
///
/// let beat: Beat = parse_json(r#"{"tone": "calm"}"#).unwrap();
/// assert_eq!(beat.tone, "calm");
/// ```
pub fn parse_json<T>(json_str: &str) -> Result<T, JsonError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(json_str).map_err(|e| {
        let preview = json_str.chars().take(100).collect::<String>();

        tracing::debug!(
            error = %e,
            json_preview = %preview,
            "JSON parsing failed"
        );

        JsonError::new(format!(
            "Failed to parse JSON: {} (JSON: {}...). Check for unescaped quotes and trailing commas.",
            e, preview
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_from_code_block() {
        let response = r#"
Here's the scene you requested:

```json
{
  "narration": "The lantern flickered.",
  "tone": "mysterious"
}
```

Hope this helps!
"#;
        let json = extract_json(response).unwrap();
        assert!(json.contains("\"tone\": \"mysterious\""));
    }

    #[test]
    fn test_extract_json_balanced_braces() {
        let response = r#"
Sure! Here it is: {"narration": "x", "nested": {"value": "test"}} and that's all.
"#;
        let json = extract_json(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("nested"));
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let response = r#"{"narration": "She drew a { on the wall", "tone": "calm"}"#;
        let json = extract_json(response).unwrap();
        assert_eq!(json, response);
    }

    #[test]
    fn test_no_json_found() {
        let response = "This is just plain text with no JSON";
        assert!(extract_json(response).is_err());
    }

    #[test]
    fn test_extract_json_with_string_escapes() {
        let response = r#"{"narration": "She said \"hello\""}"#;
        let json = extract_json(response).unwrap();
        assert!(json.contains("She said"));
        assert!(json.ends_with('}'));
    }

    #[test]
    fn test_parse_json_into_struct() {
        use serde::Deserialize;

        #[derive(Deserialize, Debug)]
        struct Beat {
            index: usize,
            tone: String,
        }

        let beat: Beat = parse_json(r#"{"index": 2, "tone": "awe"}"#).unwrap();
        assert_eq!(beat.index, 2);
        assert_eq!(beat.tone, "awe");
    }

    #[test]
    fn test_parse_json_error_mentions_preview() {
        let err = parse_json::<serde_json::Value>("{\"tone\": }").unwrap_err();
        assert!(err.message.contains("Failed to parse JSON"));
    }
}

//! Mapping HTTP and transport failures onto provider failure kinds.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use taleweaver_core::RequestClass;
use taleweaver_error::{ProviderError, ProviderErrorKind};
use tracing::{error, warn};

const BODY_SNIPPET_CHARS: usize = 200;

/// Classifies a non-success HTTP status.
///
/// | Status | Kind |
/// |---|---|
/// | 429 | `RateLimited` |
/// | 408, 504 | `Timeout` |
/// | 400, 422 | `InvalidResponse` (the prompt was refused; a repaired prompt may pass) |
/// | 401, 403, 404, other 5xx, anything else | `ProviderUnavailable` |
///
/// # Examples
///
/// ```
/// use reqwest::StatusCode;
/// use taleweaver_core::FailureKind;
/// use taleweaver_models::classify_status;
///
/// let err = classify_status("openai", StatusCode::TOO_MANY_REQUESTS, "slow down");
/// assert_eq!(err.failure_kind(), FailureKind::RateLimited);
///
/// let err = classify_status("openai", StatusCode::UNAUTHORIZED, "bad key");
/// assert_eq!(err.failure_kind(), FailureKind::ProviderUnavailable);
/// ```
#[track_caller]
pub fn classify_status(provider: &str, status: StatusCode, body: &str) -> ProviderError {
    let message = format!("{} returned HTTP {}: {}", provider, status.as_u16(), snippet(body));
    let kind = match status.as_u16() {
        429 => ProviderErrorKind::RateLimited(message),
        408 | 504 => ProviderErrorKind::Timeout(message),
        400 | 422 => ProviderErrorKind::InvalidResponse(message),
        _ => ProviderErrorKind::ProviderUnavailable(message),
    };
    ProviderError::new(kind)
}

/// Classifies a transport-level failure.
#[track_caller]
pub fn classify_transport(provider: &str, err: &reqwest::Error) -> ProviderError {
    let message = format!("{} request failed: {}", provider, err);
    let kind = if err.is_timeout() {
        ProviderErrorKind::Timeout(message)
    } else if err.is_decode() || err.is_body() {
        ProviderErrorKind::InvalidResponse(message)
    } else {
        ProviderErrorKind::ProviderUnavailable(message)
    };
    ProviderError::new(kind)
}

/// Failure for a request class the adapter cannot serve.
#[track_caller]
pub(crate) fn unsupported_class(provider: &str, class: RequestClass) -> ProviderError {
    ProviderError::unavailable(format!("{} does not serve {} requests", provider, class))
}

/// Returns the response if its status is a success, otherwise a classified error.
pub(crate) async fn ensure_success(
    provider: &str,
    response: Response,
) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!(provider, status = %status, "Provider rate limited the request");
    } else {
        error!(provider, status = %status, body = %snippet(&body), "Provider returned error");
    }
    Err(classify_status(provider, status, &body))
}

/// Parses a JSON body; parse failures are invalid responses.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &str,
    response: Response,
) -> Result<T, ProviderError> {
    let body = response
        .text()
        .await
        .map_err(|e| classify_transport(provider, &e))?;
    serde_json::from_str(&body).map_err(|e| {
        error!(provider, error = %e, "Failed to parse provider response");
        ProviderError::invalid_response(format!(
            "{} response was not the expected JSON: {} ({})",
            provider,
            e,
            snippet(&body)
        ))
    })
}

/// Truncates to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn snippet(body: &str) -> &str {
    truncate_chars(body.trim(), BODY_SNIPPET_CHARS)
}

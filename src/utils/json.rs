//! Recovering JSON from model output.
//!
//! Models asked for structured output still wrap it in Markdown fences or
//! surround it with commentary. [`extract_json`] tolerates both and leaves
//! semantic checks to [`crate::schema`]. Fences inside string values are
//! content and are never touched.

use crate::types::{AppError, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Removes a single outer ```` ```json ```` / ```` ``` ```` wrapper and trims.
///
/// Text that does not open with a fence is returned trimmed but otherwise
/// unchanged, so applying this twice is the same as applying it once.
pub fn strip_code_fences(raw: &str) -> &str {
    let text = raw.trim();
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    // Opening line may carry an info string such as `json`
    let body = match rest.find('\n') {
        Some(newline) if rest[..newline].trim().chars().all(|c| c.is_ascii_alphanumeric()) => {
            &rest[newline + 1..]
        }
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim()
}

/// Slice between the first `{` and the last `}`, inclusive.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Parses model text into `T`.
///
/// Tries the trimmed text as-is, then with one outer fence removed, then the
/// outermost `{...}` slice. Fails with [`AppError::Parse`] carrying the raw text.
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::parse("model returned an empty response", raw));
    }

    let direct_err = match serde_json::from_str::<T>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let unfenced = strip_code_fences(trimmed);
    if unfenced.len() != trimmed.len() {
        if let Ok(value) = serde_json::from_str::<T>(unfenced) {
            return Ok(value);
        }
    }

    debug!(error = %direct_err, "Direct JSON parse failed, trying brace slice");

    match outermost_object(trimmed) {
        Some(slice) => serde_json::from_str::<T>(slice)
            .map_err(|e| AppError::parse(format!("no parseable JSON object: {}", e), raw)),
        None => Err(AppError::parse(
            format!("no JSON object found: {}", direct_err),
            raw,
        )),
    }
}

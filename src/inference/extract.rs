//! Best-effort JSON extraction from model output
//!
//! Models asked for strict JSON still sometimes wrap it in a markdown code
//! fence. The fence is removed before parsing; anything that still does not
//! parse yields `None` and the caller falls back to its default.

use lazy_regex::regex_captures;

/// Remove a surrounding ```` ```lang ... ``` ```` fence, if there is one
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match regex_captures!(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$", trimmed) {
        Some((_, _, inner)) if !inner.is_empty() => inner.trim(),
        _ => trimmed,
    }
}

/// Parse model output as a JSON value after stripping any fence
pub fn extract_json(text: &str) -> Option<serde_json::Value> {
    let candidate = strip_code_fence(text);
    match serde_json::from_str(candidate) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("Model output is not JSON ({}): {:?}", e, candidate);
            None
        }
    }
}

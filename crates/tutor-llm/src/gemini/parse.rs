//! Answer extraction from `generateContent` responses.
//!
//! Only a body that is not JSON at all is an error. Any JSON shape that
//! lacks usable text degrades to one of two sentinel answers.

use serde_json::Value;

use crate::generator::RemoteError;

/// Answer when the response has no candidates.
pub const NO_CANDIDATES: &str = "[no candidates]";
/// Answer when the first candidate carries no text.
pub const EMPTY_ANSWER: &str = "[empty]";

/// Parse a 2xx response body into answer text.
pub fn parse_text(body: &str) -> Result<String, RemoteError> {
    let json: Value = serde_json::from_str(body)?;
    Ok(extract_text(&json))
}

/// Pull the first candidate's concatenated part texts out of a response.
///
/// Parts without a string `text` field are skipped.
pub fn extract_text(response: &Value) -> String {
    let Some(first) = response["candidates"].as_array().and_then(|c| c.first()) else {
        return NO_CANDIDATES.to_string();
    };

    let Some(parts) = first["content"]["parts"].as_array() else {
        return EMPTY_ANSWER.to_string();
    };

    let text: String = parts.iter().filter_map(|p| p["text"].as_str()).collect();
    if text.trim().is_empty() {
        EMPTY_ANSWER.to_string()
    } else {
        text
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

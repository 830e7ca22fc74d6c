//! Gemini `generateContent` wire types and client configuration.

use std::time::Duration;

use serde::Serialize;
use tutor_core::{Entry, RetryConfig, Role};

/// API version path segment.
pub const API_VERSION: &str = "v1beta";

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Gemini client configuration.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key, sent as the `key` query parameter.
    pub api_key: String,
    /// API host (no trailing path).
    pub base_url: String,
    /// Timeout applied to each HTTP attempt.
    pub request_timeout: Duration,
    /// Attempt limit and backoff.
    pub retry: RetryConfig,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Request body
// ─────────────────────────────────────────────────────────────────────────────

/// `generateContent` request body.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// System directive, omitted when blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    /// Prior turns followed by the new user turn.
    pub contents: Vec<Content>,
}

/// One role-tagged content block.
#[derive(Clone, Debug, Serialize)]
pub struct Content {
    /// Wire role.
    pub role: Role,
    /// Text parts.
    pub parts: Vec<Part>,
}

/// A text part.
#[derive(Clone, Debug, Serialize)]
pub struct Part {
    /// Part text.
    pub text: String,
}

impl Content {
    /// Single-part content.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl From<&Entry> for Content {
    fn from(entry: &Entry) -> Self {
        Self::text(entry.role(), entry.text())
    }
}

impl GenerateContentRequest {
    /// Build the body for one turn.
    ///
    /// `directive` must already be filtered for blankness.
    pub fn new(history: &[Entry], user_input: &str, directive: Option<&str>) -> Self {
        let contents = history
            .iter()
            .map(Content::from)
            .chain(std::iter::once(Content::text(Role::User, user_input)))
            .collect();
        Self {
            system_instruction: directive.map(|d| Content::text(Role::System, d)),
            contents,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

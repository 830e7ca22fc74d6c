//! Settings type definitions.
//!
//! All types use `#[serde(rename_all = "camelCase", default)]`, so a settings
//! file may name any subset of fields and the rest keep their defaults.

use serde::{Deserialize, Serialize};
use tracing::warn;
use tutor_core::{LogFormat, RetryConfig};

use crate::errors::{Result, SettingsError};

/// Env var holding the Generative Language API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY_GEMINI";
/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Default per-attempt request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Default number of exchange pairs sent as context.
pub const DEFAULT_MAX_PAIRS: usize = 5;
/// Smallest number of exchange pairs a conversation keeps.
pub const MIN_MAX_PAIRS: usize = 2;
/// Default system directive.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a specialized english tutor. \
Help the user learn English by answering their questions and providing explanations.";

// ─────────────────────────────────────────────────────────────────────────────
// Root
// ─────────────────────────────────────────────────────────────────────────────

/// Root settings type for the tutor client.
///
/// Loaded from `~/.tutor/settings.json` with defaults applied for missing
/// fields. Environment variables override specific values.
///
/// ```json
/// {
///   "api": { "model": "gemini-2.5-pro" },
///   "conversation": { "maxPairs": 8 }
/// }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TutorSettings {
    /// Remote API endpoint, credentials and model.
    pub api: ApiSettings,
    /// Retry policy for API calls.
    pub retry: RetryConfig,
    /// Conversation shaping.
    pub conversation: ConversationSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
}

impl TutorSettings {
    /// Clamp out-of-range values back into range, logging what changed.
    pub fn validate(&mut self) {
        if self.conversation.max_pairs < MIN_MAX_PAIRS {
            warn!(
                configured = self.conversation.max_pairs,
                min = MIN_MAX_PAIRS,
                "maxPairs below minimum, clamping"
            );
            self.conversation.max_pairs = MIN_MAX_PAIRS;
        }
        if self.api.request_timeout_ms == 0 {
            warn!("requestTimeoutMs is zero, using default");
            self.api.request_timeout_ms = DEFAULT_REQUEST_TIMEOUT_MS;
        }
    }

    /// The configured API key.
    ///
    /// Fails with [`SettingsError::MissingRequired`] when no layer supplied a
    /// non-blank key.
    pub fn api_key(&self) -> Result<&str> {
        self.api
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| SettingsError::MissingRequired(API_KEY_ENV.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Sections
// ─────────────────────────────────────────────────────────────────────────────

/// Remote API settings.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSettings {
    /// API key. Read from the settings file or `GOOGLE_API_KEY_GEMINI`;
    /// never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API host, without the `/v1beta` path.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Per-attempt request timeout in milliseconds.
    pub request_timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .finish()
    }
}

/// Conversation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConversationSettings {
    /// Most recent exchange pairs sent as context (at least 2).
    pub max_pairs: usize,
    /// System directive sent with every request. Blank disables it.
    pub system_prompt: String,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            max_pairs: DEFAULT_MAX_PAIRS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Minimum level, as an `EnvFilter` directive.
    pub level: String,
    /// Output format on stderr.
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

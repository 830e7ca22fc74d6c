//! # Generator Trait
//!
//! The single capability the conversation layer needs from a model backend:
//! turn a history, a new user input, and an optional system directive into
//! one answer string. [`GeminiClient`](crate::GeminiClient) is the production
//! implementation; tests substitute echo or failing doubles.

use async_trait::async_trait;
use tutor_core::Entry;

/// Result type alias for generation.
pub type GenerateResult<T> = Result<T, GenerateError>;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure of a single remote exchange.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// Connection, timeout, or body read failure. The request URL is
    /// stripped because it carries the API key.
    #[error("HTTP error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API error ({status}): {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message from the body, or the raw body.
        message: String,
    },

    /// A 2xx body that is not JSON at all.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// The call was cancelled mid-request or mid-backoff.
    #[error("request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

impl RemoteError {
    /// Build a [`RemoteError::Status`] from a non-2xx response.
    ///
    /// Prefers `error.message` from a JSON error body; falls back to the raw
    /// body text.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| json["error"]["message"].as_str().map(String::from))
            .unwrap_or_else(|| body.to_string());
        Self::Status { status, message }
    }

    /// Whether another attempt may succeed.
    ///
    /// 429 and 5xx statuses and transport failures are retryable; every other
    /// status, malformed bodies, and cancellation are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::MalformedBody(_) | Self::Cancelled => false,
        }
    }

    /// Short category label for logs and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Transport(e) if e.is_timeout() => "timeout",
            Self::Transport(_) => "network",
            Self::Status { status: 429, .. } => "rate_limit",
            Self::Status { status, .. } if *status >= 500 => "server_error",
            Self::Status { .. } => "api_error",
            Self::MalformedBody(_) => "malformed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Error returned by [`Generator::generate`].
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A required input was blank. Never retried.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The remote call failed terminally, after retries or on a
    /// non-retryable error.
    #[error("generation failed after {attempts} attempt(s): {source}")]
    Failed {
        /// Attempts made, counting the first.
        attempts: u32,
        /// Last underlying failure.
        #[source]
        source: RemoteError,
    },
}

impl GenerateError {
    /// The underlying remote failure, if any.
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Failed { source, .. } => Some(source),
            Self::InvalidArgument(_) => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Produces one model answer for a conversation turn.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate an answer to `user_input` given prior `history`.
    ///
    /// `system_directive` that is `None` or blank means no system
    /// instruction. Implementations call [`validate_request`] first.
    async fn generate(
        &self,
        model_id: &str,
        history: &[Entry],
        user_input: &str,
        system_directive: Option<&str>,
    ) -> GenerateResult<String>;
}

/// Precondition check shared by every [`Generator`] implementation.
pub fn validate_request(model_id: &str) -> GenerateResult<()> {
    if model_id.trim().is_empty() {
        return Err(GenerateError::InvalidArgument(
            "model id must not be blank".to_string(),
        ));
    }
    Ok(())
}

/// Directive text when present and non-blank.
pub fn effective_directive(system_directive: Option<&str>) -> Option<&str> {
    system_directive.filter(|d| !d.trim().is_empty())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

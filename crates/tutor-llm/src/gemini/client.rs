//! Gemini `generateContent` client with retry and backoff.
//!
//! One call makes up to `retry.max_attempts()` HTTP exchanges. 429, 5xx and
//! transport failures are retried with exponential backoff; any other status
//! fails the call at once. A cancellation token, when set, interrupts both
//! the in-flight request and the backoff sleep.

use std::time::Instant;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use tutor_core::Entry;

use super::parse::parse_text;
use super::types::{API_VERSION, GeminiConfig, GenerateContentRequest};
use crate::generator::{
    GenerateError, GenerateResult, Generator, RemoteError, effective_directive, validate_request,
};

/// Gemini API client.
pub struct GeminiClient {
    config: GeminiConfig,
    /// HTTP client (reused across requests).
    client: reqwest::Client,
    cancel_token: Option<CancellationToken>,
}

impl GeminiClient {
    /// Create a client with its own HTTP connection pool.
    #[must_use]
    pub fn new(config: GeminiConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a client with a shared HTTP client.
    #[must_use]
    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Self {
        info!(
            base_url = %config.base_url,
            max_attempts = config.retry.max_attempts(),
            timeout_ms = u64::try_from(config.request_timeout.as_millis()).unwrap_or(u64::MAX),
            "Gemini client initialized"
        );
        Self {
            config,
            client,
            cancel_token: None,
        }
    }

    /// Abort in-flight requests and backoff sleeps when `token` fires.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    /// Endpoint URL for a model, without the key parameter.
    fn api_url(&self, model_id: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/{API_VERSION}/models/{model_id}:generateContent")
    }

    /// Run the attempt loop for one request body.
    async fn execute(&self, model_id: &str, body: &GenerateContentRequest) -> GenerateResult<String> {
        let url = self.api_url(model_id);
        let max_attempts = self.config.retry.max_attempts();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            let err = match self.send_once(&url, body, attempt).await {
                Ok(text) => return Ok(text),
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= max_attempts {
                warn!(
                    attempt,
                    category = err.category(),
                    error = %err,
                    "Gemini request failed"
                );
                return Err(GenerateError::Failed {
                    attempts: attempt,
                    source: err,
                });
            }

            let delay = self.config.retry.delay_after(attempt);
            metrics::counter!("gemini_retries_total", "category" => err.category()).increment(1);
            warn!(
                attempt,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "retryable Gemini error, backing off"
            );

            if let Some(ref token) = self.cancel_token {
                tokio::select! {
                    () = tokio::time::sleep(delay) => {}
                    () = token.cancelled() => {
                        debug!(attempt, "cancelled during backoff");
                        return Err(GenerateError::Failed {
                            attempts: attempt,
                            source: RemoteError::Cancelled,
                        });
                    }
                }
            } else {
                tokio::time::sleep(delay).await;
            }
        }
    }

    /// One HTTP exchange: send, read the body, classify the status.
    async fn send_once(
        &self,
        url: &str,
        body: &GenerateContentRequest,
        attempt: u32,
    ) -> Result<String, RemoteError> {
        let started = Instant::now();
        let request = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .timeout(self.config.request_timeout)
            .json(body);

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = match self.cancel_token {
            Some(ref token) => tokio::select! {
                result = exchange => result?,
                () = token.cancelled() => return Err(RemoteError::Cancelled),
            },
            None => exchange.await?,
        };

        info!(
            attempt,
            status = status.as_u16(),
            took_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "generateContent response"
        );

        if status.is_success() {
            parse_text(&text)
        } else {
            Err(RemoteError::from_status(status.as_u16(), &text))
        }
    }
}

#[async_trait]
impl Generator for GeminiClient {
    #[instrument(skip_all, fields(model = %model_id, history_len = history.len()))]
    async fn generate(
        &self,
        model_id: &str,
        history: &[Entry],
        user_input: &str,
        system_directive: Option<&str>,
    ) -> GenerateResult<String> {
        validate_request(model_id)?;
        let body = GenerateContentRequest::new(
            history,
            user_input,
            effective_directive(system_directive),
        );
        self.execute(model_id, &body).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

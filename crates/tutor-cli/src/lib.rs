//! # tutor-cli
//!
//! Console front end of the tutor client: argument parsing and the chat loop.
//! The `tutor` binary in `main.rs` wires settings, logging, the Gemini client,
//! and the conversation service together.

#![deny(unsafe_code)]

pub mod cli;
pub mod console;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tutor_llm::{GeminiClient, GeminiConfig};
use tutor_runtime::ChatService;
use tutor_settings::TutorSettings;

/// Build the conversation service described by `settings`.
///
/// Fails when no API key is configured. `cancel` aborts in-flight requests
/// and backoff sleeps.
pub fn build_service(settings: &TutorSettings, cancel: CancellationToken) -> Result<ChatService> {
    let api_key = settings.api_key()?.to_string();

    let client = GeminiClient::new(GeminiConfig {
        api_key,
        base_url: settings.api.base_url.clone(),
        request_timeout: Duration::from_millis(settings.api.request_timeout_ms),
        retry: settings.retry.clone(),
    })
    .with_cancel_token(cancel);

    let service = ChatService::new(
        Arc::new(client),
        settings.api.model.clone(),
        Some(settings.conversation.system_prompt.clone()),
        settings.conversation.max_pairs,
    )?;
    tracing::info!(
        model = service.model_id(),
        max_pairs = service.max_pairs(),
        "chat service ready"
    );
    Ok(service)
}

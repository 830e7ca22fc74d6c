//! # tutor-llm
//!
//! Model access for the tutor client.
//!
//! - [`Generator`]: the capability the conversation layer calls
//! - [`GeminiClient`]: resilient Gemini implementation with retry, backoff,
//!   and cancellation
//! - [`GenerateError`] / [`RemoteError`]: terminal and per-attempt failures

#![deny(unsafe_code)]

pub mod gemini;
pub mod generator;

pub use gemini::{GeminiClient, GeminiConfig};
pub use generator::{
    GenerateError, GenerateResult, Generator, RemoteError, effective_directive, validate_request,
};

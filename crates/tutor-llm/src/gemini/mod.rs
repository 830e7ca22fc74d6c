//! # Gemini
//!
//! Client for the Generative Language `generateContent` endpoint, keyed by
//! API key.
//!
//! - [`client`]: HTTP exchange, retry loop, cancellation
//! - [`types`]: request body and client configuration
//! - [`parse`]: answer extraction and sentinel answers

pub mod client;
pub mod parse;
pub mod types;

pub use client::GeminiClient;
pub use parse::{EMPTY_ANSWER, NO_CANDIDATES, extract_text, parse_text};
pub use types::{Content, GeminiConfig, GenerateContentRequest, Part};

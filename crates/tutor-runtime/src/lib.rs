//! # tutor-runtime
//!
//! Conversation layer of the tutor client.
//!
//! - [`history::trim`]: bound the context to the most recent exchange pairs
//! - [`ChatService`]: trim, generate, and append on success

#![deny(unsafe_code)]

pub mod chat;
pub mod history;

pub use chat::{ChatService, MIN_HISTORY_PAIRS};
pub use history::{count_pairs, trim};

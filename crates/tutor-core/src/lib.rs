//! # tutor-core
//!
//! Foundation types shared by every tutor crate.
//!
//! - **Messages**: [`Role`] and [`Entry`], the role-tagged turns of a conversation
//! - **Retry**: [`RetryConfig`] and [`backoff_delay`] for the HTTP retry loop
//! - **Logging**: [`logging::init_subscriber`] for the `tracing` subscriber

#![deny(unsafe_code)]

pub mod logging;
pub mod messages;
pub mod retry;

pub use logging::LogFormat;
pub use messages::{Entry, Role};
pub use retry::{RetryConfig, backoff_delay};

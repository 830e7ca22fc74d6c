//! # tutor-settings
//!
//! Configuration with layered sources for the tutor client.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`TutorSettings::default()`]
//! 2. **User file**: `~/.tutor/settings.json` (deep-merged over defaults)
//! 3. **Environment variables**: `GOOGLE_API_KEY_GEMINI`, `MODEL_ID` and
//!    `TUTOR_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{
    apply_env_overrides_with, deep_merge, load_settings_from_path, load_settings_with,
    settings_path,
};
pub use types::*;

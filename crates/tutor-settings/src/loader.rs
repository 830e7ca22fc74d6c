//! Settings loading with deep merge and environment variable overrides.
//!
//! [`TutorSettings::default()`] is serialized to JSON, the settings file (when
//! present) is overlaid with [`deep_merge`], and the result is deserialized
//! back before environment variables get the last word.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::types::{API_KEY_ENV, TutorSettings};

/// Default settings file location: `$HOME/.tutor/settings.json`, or the
/// temp dir when `HOME` is unset.
pub fn settings_path() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(std::env::temp_dir, PathBuf::from)
        .join(".tutor")
        .join("settings.json")
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TutorSettings> {
    load_settings_with(path, |name| std::env::var(name).ok())
}

/// Load settings from `path`, resolving env overrides through `lookup`.
pub fn load_settings_with(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<TutorSettings> {
    let defaults = serde_json::to_value(TutorSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: TutorSettings = serde_json::from_value(merged)?;
    apply_env_overrides_with(&mut settings, lookup);
    Ok(settings)
}

/// Overlay `layer` onto `base`.
///
/// Nested objects merge key by key. Any other `layer` value, arrays included,
/// replaces what `base` held. A `null` in `layer` keeps the base value.
pub fn deep_merge(base: Value, layer: Value) -> Value {
    match (base, layer) {
        (Value::Object(mut fields), Value::Object(overrides)) => {
            for (key, value) in overrides.into_iter().filter(|(_, v)| !v.is_null()) {
                let value = match fields.remove(&key) {
                    Some(current) => deep_merge(current, value),
                    None => value,
                };
                let _ = fields.insert(key, value);
            }
            Value::Object(fields)
        }
        (_, layer) => layer,
    }
}

/// Apply environment overrides resolved through `lookup`.
///
/// Blank values are ignored. Numbers must parse and fall within range,
/// otherwise they are ignored with a warning.
pub fn apply_env_overrides_with(
    settings: &mut TutorSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let env = EnvReader { lookup };

    // ── API settings ────────────────────────────────────────────────
    if let Some(v) = env.string(API_KEY_ENV) {
        settings.api.api_key = Some(v);
    }
    if let Some(v) = env.string("MODEL_ID") {
        settings.api.model = v;
    }
    if let Some(v) = env.string("TUTOR_BASE_URL") {
        settings.api.base_url = v;
    }
    if let Some(v) = env.u64("TUTOR_TIMEOUT_MS", 1000, 600_000) {
        settings.api.request_timeout_ms = v;
    }

    // ── Conversation / logging ──────────────────────────────────────
    if let Some(v) = env.usize("TUTOR_MAX_PAIRS", 1, 1000) {
        settings.conversation.max_pairs = v;
    }
    if let Some(v) = env.string("TUTOR_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.trim().parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

struct EnvReader<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn string(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn u64(&self, name: &str, min: u64, max: u64) -> Option<u64> {
        let val = self.string(name)?;
        let result = parse_u64_range(&val, min, max);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid u64 env var, ignoring");
        }
        result
    }

    fn usize(&self, name: &str, min: usize, max: usize) -> Option<usize> {
        let val = self.string(name)?;
        let result = parse_usize_range(&val, min, max);
        if result.is_none() {
            warn!(key = name, value = %val, "invalid usize env var, ignoring");
        }
        result
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::errors::SettingsError;
    use crate::types::DEFAULT_MODEL;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        |_: &str| None
    }

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({"api": {"model": "a", "baseUrl": "b"}});
        let source = serde_json::json!({"api": {"model": "z"}});
        let merged = deep_merge(target, source);
        assert_eq!(merged["api"]["model"], "z");
        assert_eq!(merged["api"]["baseUrl"], "b");
    }

    #[test]
    fn merge_null_preserves_target() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": null});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_array_replace() {
        let target = serde_json::json!({"items": [1, 2, 3]});
        let source = serde_json::json!({"items": [4]});
        assert_eq!(deep_merge(target, source)["items"], serde_json::json!([4]));
    }

    #[test]
    fn merge_new_keys_added() {
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"b": 2}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    // ── load_settings_with ──────────────────────────────────────────

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_with(&dir.path().join("nope.json"), no_env()).unwrap();
        assert_eq!(settings, TutorSettings::default());
    }

    #[test]
    fn file_values_merge_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"api": {"model": "gemini-2.5-pro", "apiKey": "file-key"}, "retry": {"maxRetries": 4}}"#,
        )
        .unwrap();

        let settings = load_settings_with(&path, no_env()).unwrap();
        assert_eq!(settings.api.model, "gemini-2.5-pro");
        assert_eq!(settings.api_key().unwrap(), "file-key");
        assert_eq!(settings.retry.max_retries, 4);
        assert_eq!(settings.retry.base_delay_ms, 250);
        assert_eq!(settings.conversation.max_pairs, 5);
    }

    #[test]
    fn invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_settings_with(&path, no_env()).unwrap_err();
        assert!(matches!(err, SettingsError::Json(_)));
    }

    #[test]
    fn env_beats_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"api": {"model": "from-file", "apiKey": "file-key"}}"#).unwrap();

        let settings = load_settings_with(
            &path,
            env(&[("MODEL_ID", "from-env"), ("GOOGLE_API_KEY_GEMINI", "env-key")]),
        )
        .unwrap();
        assert_eq!(settings.api.model, "from-env");
        assert_eq!(settings.api_key().unwrap(), "env-key");
    }

    // ── apply_env_overrides_with ────────────────────────────────────

    #[test]
    fn blank_env_values_ignored() {
        let mut settings = TutorSettings::default();
        apply_env_overrides_with(&mut settings, env(&[("MODEL_ID", "   "), ("GOOGLE_API_KEY_GEMINI", "")]));
        assert_eq!(settings.api.model, DEFAULT_MODEL);
        assert!(settings.api_key().is_err());
    }

    #[test]
    fn env_values_trimmed() {
        let mut settings = TutorSettings::default();
        apply_env_overrides_with(&mut settings, env(&[("GOOGLE_API_KEY_GEMINI", "  k  ")]));
        assert_eq!(settings.api.api_key.as_deref(), Some("k"));
    }

    #[test]
    fn numeric_overrides() {
        let mut settings = TutorSettings::default();
        apply_env_overrides_with(
            &mut settings,
            env(&[
                ("TUTOR_TIMEOUT_MS", "5000"),
                ("TUTOR_MAX_PAIRS", "12"),
                ("TUTOR_BASE_URL", "http://localhost:9000"),
                ("TUTOR_LOG_LEVEL", "debug"),
            ]),
        );
        assert_eq!(settings.api.request_timeout_ms, 5000);
        assert_eq!(settings.conversation.max_pairs, 12);
        assert_eq!(settings.api.base_url, "http://localhost:9000");
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn invalid_numbers_ignored() {
        let mut settings = TutorSettings::default();
        apply_env_overrides_with(
            &mut settings,
            env(&[("TUTOR_TIMEOUT_MS", "fast"), ("TUTOR_MAX_PAIRS", "0")]),
        );
        assert_eq!(settings.api.request_timeout_ms, 30_000);
        assert_eq!(settings.conversation.max_pairs, 5);
    }

    // ── parsing ─────────────────────────────────────────────────────

    #[test]
    fn parse_ranges() {
        assert_eq!(parse_u64_range("1000", 1000, 2000), Some(1000));
        assert_eq!(parse_u64_range("999", 1000, 2000), None);
        assert_eq!(parse_u64_range("-1", 0, 10), None);
        assert_eq!(parse_usize_range(" 7 ", 1, 10), Some(7));
        assert_eq!(parse_usize_range("11", 1, 10), None);
    }

    #[test]
    fn settings_path_under_home() {
        let path = settings_path();
        assert!(path.ends_with(".tutor/settings.json"));
    }
}

//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`CallscribeSettings::default()`]
//! 2. If the settings file exists, deep-merge user values over defaults
//! 3. Apply `CALLSCRIBE_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::{CallscribeSettings, CleanupMode};

/// Resolve the path to the settings file (`~/.callscribe/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".callscribe").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<CallscribeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<CallscribeSettings> {
    let defaults = serde_json::to_value(CallscribeSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: CallscribeSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules:
/// - Integers must be valid and within the specified range
/// - Enums must match a known wire value
/// - Invalid values are logged and ignored (fall back to file/default)
pub fn apply_env_overrides(settings: &mut CallscribeSettings) {
    // ── Server ──────────────────────────────────────────────────────
    if let Some(v) = read_env_string("CALLSCRIBE_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("CALLSCRIBE_PORT", 1, 65535) {
        settings.server.port = v;
    }

    // ── PBX origin ──────────────────────────────────────────────────
    if let Some(v) = read_env_string("CALLSCRIBE_PBX_URL") {
        settings.pbx.base_url = v;
    }
    if let Some(v) = read_env_u64("CALLSCRIBE_FETCH_TIMEOUT_MS", 1000, 3_600_000) {
        settings.pbx.fetch_timeout_ms = v;
    }

    // ── Backend ─────────────────────────────────────────────────────
    if let Some(v) = read_env_string("CALLSCRIBE_BACKEND_URL") {
        settings.backend.base_url = v;
    }
    if let Some(v) = read_env_string("CALLSCRIBE_DEV_BACKEND_URL") {
        settings.backend.developer_base_url = v;
    }
    if let Some(v) = read_env_u64("CALLSCRIBE_PROBE_TIMEOUT_MS", 100, 600_000) {
        settings.backend.probe_timeout_ms = v;
    }
    if let Some(v) = read_env_u64("CALLSCRIBE_NOTIFY_TIMEOUT_MS", 1000, 600_000) {
        settings.backend.notify_timeout_ms = v;
    }

    // ── Engine ──────────────────────────────────────────────────────
    if let Some(v) = read_env_string("CALLSCRIBE_ENGINE_COMMAND") {
        settings.engine.command = v;
    }
    if let Some(v) = read_env_string("CALLSCRIBE_ENGINE_MODEL") {
        settings.engine.model = v;
    }
    if let Some(v) = read_env_string("CALLSCRIBE_ENGINE_LANGUAGE") {
        settings.engine.language = v;
    }
    if let Some(v) = read_env_string("CALLSCRIBE_AUDIO_DIR") {
        settings.engine.audio_dir = v;
    }
    if let Some(v) = read_env_string("CALLSCRIBE_TRANSCRIPT_DIR") {
        settings.engine.transcript_dir = v;
    }

    // ── Cleanup policy ──────────────────────────────────────────────
    if let Some(v) = read_env_string("CALLSCRIBE_CLEANUP_MODE") {
        match parse_cleanup_mode(&v) {
            Some(mode) => settings.cleanup_mode = mode,
            None => tracing::warn!(value = %v, "invalid cleanup mode env var, ignoring"),
        }
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a cleanup mode from its JSON wire value.
pub fn parse_cleanup_mode(val: &str) -> Option<CleanupMode> {
    serde_json::from_value(Value::String(val.to_string())).ok()
}

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SettingsError;

    // ── deep_merge ──────────────────────────────────────────────────

    #[test]
    fn merge_simple_override() {
        let target = serde_json::json!({"a": 1, "b": 2});
        let source = serde_json::json!({"a": 10});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 10);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_nested_override() {
        let target = serde_json::json!({
            "backend": {"baseUrl": "http://a", "notifyTimeoutMs": 60000}
        });
        let source = serde_json::json!({
            "backend": {"baseUrl": "http://b"}
        });
        let merged = deep_merge(target, source);
        assert_eq!(merged["backend"]["baseUrl"], "http://b");
        assert_eq!(merged["backend"]["notifyTimeoutMs"], 60000);
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
    fn merge_new_keys_added() {
        let target = serde_json::json!({"a": 1});
        let source = serde_json::json!({"b": 2});
        let merged = deep_merge(target, source);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_primitive_replace() {
        let target = serde_json::json!("hello");
        let source = serde_json::json!("world");
        let merged = deep_merge(target, source);
        assert_eq!(merged, "world");
    }

    // ── load_settings_from_path ─────────────────────────────────────

    #[test]
    fn load_missing_file_returns_defaults() {
        let path = Path::new("/nonexistent/settings.json");
        let settings = load_settings_from_path(path).unwrap();
        let defaults = CallscribeSettings::default();
        assert_eq!(settings.server.port, defaults.server.port);
        assert_eq!(settings.engine.command, defaults.engine.command);
    }

    #[test]
    fn load_empty_json_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.port, CallscribeSettings::default().server.port);
    }

    #[test]
    fn load_partial_json_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"port": 9090}, "engine": {"model": "large"}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.engine.model, "large");
        assert_eq!(settings.engine.language, "pt");
        assert_eq!(settings.backend.notify_timeout_ms, 60_000);
    }

    #[test]
    fn load_cleanup_mode_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"cleanupMode": "onNotifySuccess"}"#).unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.cleanup_mode, CleanupMode::OnNotifySuccess);
    }

    #[test]
    fn load_invalid_json_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not valid json").unwrap();

        let result = load_settings_from_path(&path);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), SettingsError::Json(_)));
    }

    // ── parse_cleanup_mode ──────────────────────────────────────────

    #[test]
    fn parse_cleanup_mode_values() {
        assert_eq!(parse_cleanup_mode("always"), Some(CleanupMode::Always));
        assert_eq!(
            parse_cleanup_mode("onNotifySuccess"),
            Some(CleanupMode::OnNotifySuccess)
        );
        assert_eq!(parse_cleanup_mode("sometimes"), None);
        assert_eq!(parse_cleanup_mode(""), None);
    }

    // ── parse_u16_range / parse_u64_range ───────────────────────────

    #[test]
    fn parse_u16_valid() {
        assert_eq!(parse_u16_range("3000", 1, 65535), Some(3000));
        assert_eq!(parse_u16_range("1", 1, 65535), Some(1));
        assert_eq!(parse_u16_range("65535", 1, 65535), Some(65535));
    }

    #[test]
    fn parse_u16_invalid() {
        assert_eq!(parse_u16_range("0", 1, 65535), None);
        assert_eq!(parse_u16_range("not_a_number", 1, 65535), None);
        assert_eq!(parse_u16_range("99999", 1, 65535), None);
    }

    #[test]
    fn parse_u64_valid() {
        assert_eq!(parse_u64_range("30000", 1000, 600_000), Some(30_000));
    }

    #[test]
    fn parse_u64_out_of_range() {
        assert_eq!(parse_u64_range("500", 1000, 600_000), None);
        assert_eq!(parse_u64_range("700000", 1000, 600_000), None);
        assert_eq!(parse_u64_range("abc", 1000, 600_000), None);
    }
}

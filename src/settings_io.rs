use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::settings::Settings;
use mirrorframe_capture::config;

pub fn mirrorframe_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(config::app::CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::config_dir().map(|d| d.join(config::app::APP_DIR_NAME))
}

pub fn settings_path(dir: &Path) -> PathBuf {
    dir.join(config::app::SETTINGS_FILE_NAME)
}

fn merge_json(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_obj), Value::Object(overlay_obj)) => {
            for (k, v) in overlay_obj {
                match base_obj.get_mut(&k) {
                    Some(existing) => merge_json(existing, v),
                    None => {
                        base_obj.insert(k, v);
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value;
        }
    }
}

const LOG_LEVELS: &[&str] = &["off", "error", "warn", "warning", "info", "debug", "trace"];

/// Bring hand-edited or legacy settings into the current schema.
/// Values that cannot be repaired are removed so defaults apply.
pub fn sanitize_settings_json(value: &mut Value) {
    let Value::Object(obj) = value else {
        return;
    };

    // target: a bare string is a window title; blank titles mean the display
    if let Some(target) = obj.get("target").cloned() {
        let normalized = match target {
            Value::String(title) => Some(criteria_json_for_title(&title)),
            Value::Object(ref fields) => {
                let mode = fields
                    .get("mode")
                    .and_then(|m| m.as_str())
                    .map(|m| m.to_lowercase());
                let title = fields.get("title").and_then(|t| t.as_str()).unwrap_or("");
                match mode.as_deref() {
                    Some("window") => Some(criteria_json_for_title(title)),
                    Some("primary_display") | Some("display") | Some("screen") => {
                        Some(serde_json::json!({ "mode": "primary_display" }))
                    }
                    _ => None,
                }
            }
            _ => None,
        };
        match normalized {
            Some(v) => {
                obj.insert("target".to_string(), v);
            }
            None => {
                obj.remove("target");
            }
        }
    }

    for key in ["capture_interval_frames", "reinit_after_empty_captures"] {
        if let Some(n) = obj.get(key).map(|v| v.as_u64()) {
            match n {
                Some(n) if n >= 1 => {
                    obj.insert(key.to_string(), serde_json::json!(n.min(u32::MAX as u64)));
                }
                _ => {
                    obj.remove(key);
                }
            }
        }
    }

    if let Some(fps) = obj.get("target_fps").map(|v| v.as_u64()) {
        match fps {
            Some(fps) if fps >= 1 => {
                let clamped = fps.min(config::capture::MAX_TARGET_FPS as u64);
                obj.insert("target_fps".to_string(), serde_json::json!(clamped));
            }
            _ => {
                obj.remove("target_fps");
            }
        }
    }

    if let Some(level) = obj.get("log_level").map(|v| v.as_str().map(str::to_lowercase)) {
        match level {
            Some(level) if LOG_LEVELS.contains(&level.as_str()) => {
                obj.insert("log_level".to_string(), Value::String(level));
            }
            _ => {
                obj.remove("log_level");
            }
        }
    }
}

fn criteria_json_for_title(title: &str) -> Value {
    if title.trim().is_empty() {
        serde_json::json!({ "mode": "primary_display" })
    } else {
        serde_json::json!({ "mode": "window", "title": title })
    }
}

pub fn bootstrap_settings_if_missing(config_dir: &Path) {
    if settings_path(config_dir).exists() {
        return;
    }

    if let Err(e) = persist_settings_to_disk(config_dir, &Settings::default()) {
        log::warn!("Failed to bootstrap settings.json: {:#}", e);
    }
}

pub fn persist_settings_to_disk(dir: &Path, settings: &Settings) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
    let path = settings_path(dir);
    let pretty = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;
    std::fs::write(&path, pretty).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

pub fn load_settings_from_disk(dir: &Path) -> Settings {
    let _ = std::fs::create_dir_all(dir);

    // First-run bootstrap: seed defaults only if missing.
    bootstrap_settings_if_missing(dir);

    let raw = std::fs::read_to_string(settings_path(dir)).unwrap_or_else(|_| "{}".to_string());
    let value: Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            // Leave the hand-edited file alone so the user can fix it
            log::warn!("settings.json is not valid JSON, using defaults: {}", e);
            return Settings::default();
        }
    };

    let settings = apply_overrides(&Settings::default(), value).unwrap_or_else(|e| {
        log::warn!("Failed to apply settings.json, using defaults: {:#}", e);
        Settings::default()
    });

    // Keep a normalized, fully-populated settings.json on disk
    if let Err(e) = persist_settings_to_disk(dir, &settings) {
        log::warn!("Failed to persist normalized settings: {:#}", e);
    }

    settings
}

/// Merge `overrides` (sanitized) over `base`
pub fn apply_overrides(base: &Settings, mut overrides: Value) -> Result<Settings> {
    sanitize_settings_json(&mut overrides);
    let mut merged = serde_json::to_value(base).context("Failed to serialize base settings")?;

    // Target variants carry different fields, so a given target replaces the base one whole
    let target = overrides.as_object_mut().and_then(|obj| obj.remove("target"));
    merge_json(&mut merged, overrides);
    if let (Some(target), Value::Object(obj)) = (target, &mut merged) {
        obj.insert("target".to_string(), target);
    }

    serde_json::from_value::<Settings>(merged).context("Invalid settings overrides")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_turns_bare_title_into_window_criteria() {
        let mut value = json!({ "target": "Minecraft" });
        sanitize_settings_json(&mut value);
        assert_eq!(value["target"], json!({ "mode": "window", "title": "Minecraft" }));
    }

    #[test]
    fn sanitize_maps_blank_window_title_to_display() {
        let mut value = json!({ "target": { "mode": "window", "title": "  " } });
        sanitize_settings_json(&mut value);
        assert_eq!(value["target"], json!({ "mode": "primary_display" }));
    }

    #[test]
    fn sanitize_drops_unknown_target_mode() {
        let mut value = json!({ "target": { "mode": "region" } });
        sanitize_settings_json(&mut value);
        assert!(value.get("target").is_none());
    }

    #[test]
    fn sanitize_removes_zero_intervals_and_clamps_fps() {
        let mut value = json!({
            "capture_interval_frames": 0,
            "reinit_after_empty_captures": -3,
            "target_fps": 1000
        });
        sanitize_settings_json(&mut value);
        assert!(value.get("capture_interval_frames").is_none());
        assert!(value.get("reinit_after_empty_captures").is_none());
        assert_eq!(value["target_fps"], json!(config::capture::MAX_TARGET_FPS));
    }

    #[test]
    fn sanitize_normalizes_log_level() {
        let mut value = json!({ "log_level": "DEBUG" });
        sanitize_settings_json(&mut value);
        assert_eq!(value["log_level"], json!("debug"));

        let mut bad = json!({ "log_level": "loud" });
        sanitize_settings_json(&mut bad);
        assert!(bad.get("log_level").is_none());
    }
}

use serde::{Deserialize, Serialize};

use mirrorframe_capture::config;
use mirrorframe_capture::CaptureCriteria;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    // Target
    #[serde(default)]
    pub target: CaptureCriteria,

    // Cadence
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    #[serde(default = "default_capture_interval_frames")]
    pub capture_interval_frames: u32,
    #[serde(default = "default_reinit_after_empty_captures")]
    pub reinit_after_empty_captures: u32,

    // Logging
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_to_file: bool,
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: CaptureCriteria::default(),
            target_fps: default_target_fps(),
            capture_interval_frames: default_capture_interval_frames(),
            reinit_after_empty_captures: default_reinit_after_empty_captures(),
            log_level: default_log_level(),
            log_to_file: false,
            log_retention_days: default_log_retention_days(),
        }
    }
}

fn default_target_fps() -> u32 {
    config::capture::DEFAULT_TARGET_FPS
}

fn default_capture_interval_frames() -> u32 {
    config::capture::DEFAULT_CAPTURE_INTERVAL_FRAMES
}

fn default_reinit_after_empty_captures() -> u32 {
    config::capture::DEFAULT_REINIT_AFTER_EMPTY_CAPTURES
}

fn default_log_level() -> String {
    config::logging::DEFAULT_LOG_LEVEL.to_string()
}

fn default_log_retention_days() -> u32 {
    config::logging::LOG_RETENTION_DAYS
}

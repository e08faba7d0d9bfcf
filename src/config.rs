//! Application Configuration Constants
//!
//! Centralized configuration for magic numbers and defaults shared by the
//! capture library and the mirror driver.

/// Capture cadence defaults
pub mod capture {
    /// Default render rate of the mirror loop
    pub const DEFAULT_TARGET_FPS: u32 = 60;

    /// Upper bound accepted from settings
    pub const MAX_TARGET_FPS: u32 = 240;

    /// Capture on every Nth rendered frame
    pub const DEFAULT_CAPTURE_INTERVAL_FRAMES: u32 = 2;

    /// Re-run initialize after this many consecutive empty captures
    /// (about two seconds at the default frame rate and interval)
    pub const DEFAULT_REINIT_AFTER_EMPTY_CAPTURES: u32 = 60;

    /// Emit a stats line every N captured frames at debug level
    pub const STATS_LOG_INTERVAL_FRAMES: u64 = 600;
}

/// Pixel layout constants
pub mod pixel {
    /// Bytes per pixel in the OS staging buffer (B, G, R, X)
    pub const STAGING_BYTES_PER_PIXEL: usize = 4;

    /// Bytes per pixel in frames handed to the renderer (R, G, B)
    pub const RGB_BYTES_PER_PIXEL: usize = 3;
}

/// Logging defaults
pub mod logging {
    /// Default level when settings carry none or an invalid one
    pub const DEFAULT_LOG_LEVEL: &str = "info";

    /// Log retention period in days
    pub const LOG_RETENTION_DAYS: u32 = 30;

    /// Base name of rolling log files
    pub const LOG_FILE_PREFIX: &str = "mirrorframe.log";
}

/// Application identity
pub mod app {
    /// Directory name under the platform config/data dirs
    pub const APP_DIR_NAME: &str = "MirrorFrame";

    /// Settings file name inside the config dir
    pub const SETTINGS_FILE_NAME: &str = "settings.json";

    /// Environment variable overriding the config dir
    pub const CONFIG_DIR_ENV: &str = "MIRRORFRAME_CONFIG_DIR";
}

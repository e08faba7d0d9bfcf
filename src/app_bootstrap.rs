use std::path::Path;

use crate::logging;
use crate::settings::Settings;
use crate::settings_io;
use mirrorframe_capture::{create_capture_engine, CaptureCadence, MirrorLoop};

/// Load settings early to get log level configuration.
///
/// An explicit directory wins over the environment override and the platform
/// config dir. Without any of them the defaults are used and nothing is written.
pub(crate) fn load_initial_settings(config_dir_override: Option<&Path>) -> Settings {
    match config_dir_override {
        Some(dir) => settings_io::load_settings_from_disk(dir),
        None => match settings_io::mirrorframe_config_dir() {
            Some(dir) => settings_io::load_settings_from_disk(&dir),
            None => Settings::default(),
        },
    }
}

/// Initialize logging system.
pub(crate) fn init_logging(initial_settings: &Settings) {
    let log_level = initial_settings
        .log_level
        .parse::<logging::LogLevel>()
        .unwrap_or(logging::LogLevel::Info);

    if let Err(e) = logging::init_logging(log_level, initial_settings.log_to_file) {
        eprintln!("Failed to initialize logging: {:#}", e);
    } else {
        tracing::info!("***********************************************************************");
        tracing::info!("*                       MIRRORFRAME STARTUP                           *");
        tracing::info!("***********************************************************************");
        tracing::info!(
            version = env!("CARGO_PKG_VERSION"),
            platform = std::env::consts::OS,
            log_level = %log_level,
            "Application started"
        );

        tracing::debug!(
            os = std::env::consts::OS,
            arch = std::env::consts::ARCH,
            "Platform details"
        );
    }

    if initial_settings.log_to_file {
        logging::auto_cleanup_old_logs(initial_settings.log_retention_days);
    }
}

/// Log panics before the default hook runs. Unwinding drops the mirror loop,
/// which releases any OS capture resources it still holds.
pub(crate) fn install_panic_hook() {
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!(?panic_info, "Application panic detected");
        default_panic(panic_info);
    }));
}

/// Log active settings for debugging.
pub(crate) fn log_active_settings(settings: &Settings) {
    tracing::debug!(
        capture_target = %settings.target,
        target_fps = settings.target_fps,
        capture_interval_frames = settings.capture_interval_frames,
        reinit_after_empty_captures = settings.reinit_after_empty_captures,
        log_level = ?settings.log_level,
        log_to_file = settings.log_to_file,
        log_retention_days = settings.log_retention_days,
        "Settings configuration"
    );
}

/// Create the capture handle for the configured target and wrap it in a loop
pub(crate) fn build_mirror_loop(settings: &Settings) -> MirrorLoop {
    tracing::info!(capture_target = %settings.target, "Creating capture engine");

    let engine = create_capture_engine(settings.target.clone());
    let cadence = CaptureCadence::new(
        settings.capture_interval_frames,
        settings.reinit_after_empty_captures,
    );
    MirrorLoop::new(engine, cadence)
}

/// Release capture resources and log the session summary
pub(crate) fn perform_cleanup(mirror: &mut MirrorLoop) {
    let stats = mirror.engine().stats();
    mirror.shutdown();
    tracing::info!(
        frames_captured = stats.frames_captured,
        empty_results = stats.empty_results,
        sessions_allocated = stats.sessions_allocated,
        transfer_failures = stats.transfer_failures,
        targets_lost = stats.targets_lost,
        reinit_attempts = mirror.reinit_attempts(),
        "Cleanup completed"
    );
}

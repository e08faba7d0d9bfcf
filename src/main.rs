// Headless mirror driver: paces a render loop and feeds it captured frames

use std::process::ExitCode;
use std::time::{Duration, Instant};

mod app_bootstrap;
mod cli;
mod logging;
mod settings;
mod settings_io;

use cli::CliCommand;
use mirrorframe_capture::{enumerate_windows, TickOutcome};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, options) = match cli::parse_args(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    match command {
        CliCommand::Help => {
            println!("{}", cli::USAGE);
            ExitCode::SUCCESS
        }
        CliCommand::ListWindows => list_windows(),
        CliCommand::Mirror => {
            let mut settings = app_bootstrap::load_initial_settings(options.config_dir.as_deref());
            app_bootstrap::init_logging(&settings);
            app_bootstrap::install_panic_hook();

            // Command line target applies to this run only
            if let Some(target) = options.target {
                settings.target = target;
            }
            app_bootstrap::log_active_settings(&settings);

            run_mirror(&settings, options.ticks);
            ExitCode::SUCCESS
        }
    }
}

fn list_windows() -> ExitCode {
    match enumerate_windows() {
        Ok(windows) => {
            if windows.is_empty() {
                println!("No capturable windows found");
            }
            for window in windows {
                println!("{:>12}  {}", window.id, window.title);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to enumerate windows: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Render loop stand-in: ticks at the target rate until `max_ticks` is reached
fn run_mirror(settings: &settings::Settings, max_ticks: Option<u64>) {
    let mut mirror = app_bootstrap::build_mirror_loop(settings);

    if let Err(e) = mirror.start() {
        tracing::warn!(error = %e, "Initial capture setup failed, will retry");
    }

    let frame_budget = Duration::from_secs_f64(1.0 / settings.target_fps.max(1) as f64);
    let mut ticks: u64 = 0;
    let mut last_size = None;

    while max_ticks.map_or(true, |max| ticks < max) {
        let started = Instant::now();
        ticks += 1;

        match mirror.tick() {
            TickOutcome::Reinitialized { success } => {
                tracing::info!(success, tick = ticks, "Capture re-initialized");
            }
            TickOutcome::Captured => {
                let size = mirror.latest_frame().map(|f| (f.width, f.height));
                if size != last_size {
                    if let Some((width, height)) = size {
                        tracing::info!(width, height, "Mirroring frames");
                    }
                    last_size = size;
                }
            }
            TickOutcome::Skipped | TickOutcome::Empty => {}
        }

        if let Some(remaining) = frame_budget.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    app_bootstrap::perform_cleanup(&mut mirror);
}

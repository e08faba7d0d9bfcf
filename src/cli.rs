//! Command line handling for the headless mirror driver
//!
//! Usage:
//!   mirrorframe                         Mirror the target from settings.json
//!   mirrorframe --window <title>        Mirror the window with this title
//!   mirrorframe --display               Mirror the primary display
//!   mirrorframe --list-windows          Print capturable windows and exit
//!
//! Options:
//!   --ticks <n>          Stop after n rendered frames
//!   --config-dir <path>  Read settings.json from this directory

use std::path::PathBuf;

use mirrorframe_capture::CaptureCriteria;

/// What the driver should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Mirror,
    ListWindows,
    Help,
}

/// Options that adjust the loaded settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub target: Option<CaptureCriteria>,
    pub ticks: Option<u64>,
    pub config_dir: Option<PathBuf>,
}

pub const USAGE: &str = "\
Usage: mirrorframe [--window <title> | --display] [--ticks <n>] [--config-dir <path>]
       mirrorframe --list-windows";

/// Parse arguments (without the program name)
pub fn parse_args(args: &[String]) -> Result<(CliCommand, CliOptions), String> {
    let mut options = CliOptions::default();
    let mut command = CliCommand::Mirror;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--window" => {
                i += 1;
                let title = args
                    .get(i)
                    .ok_or_else(|| "--window requires a title".to_string())?;
                if title.trim().is_empty() {
                    return Err("--window title must not be empty".to_string());
                }
                options.target = Some(CaptureCriteria::window(title.clone()));
            }
            "--display" => options.target = Some(CaptureCriteria::PrimaryDisplay),
            "--ticks" => {
                i += 1;
                let raw = args
                    .get(i)
                    .ok_or_else(|| "--ticks requires a value".to_string())?;
                let ticks = raw
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid tick count: {}", raw))?;
                options.ticks = Some(ticks);
            }
            "--config-dir" => {
                i += 1;
                let dir = args
                    .get(i)
                    .ok_or_else(|| "--config-dir requires a path".to_string())?;
                options.config_dir = Some(PathBuf::from(dir));
            }
            "--list-windows" => command = CliCommand::ListWindows,
            "-h" | "--help" => command = CliCommand::Help,
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
        i += 1;
    }

    Ok((command, options))
}

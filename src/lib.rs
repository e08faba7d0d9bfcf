//! MirrorFrame - Window Capture Library
//!
//! Finds a target window (or the primary display), keeps OS capture
//! resources sized to it, and hands out packed RGB frames on demand.

// Configuration constants
pub mod config;

// Platform window enumeration
pub mod platform;

pub mod capture;

// Caller-side cadence for the render loop
pub mod mirror_loop;

// Re-export commonly used types
pub use capture::{
    create_capture_engine, AcquirerState, CaptureCriteria, CaptureEngine, CaptureError,
    CapturePlatform, CaptureResult, CaptureSession, CaptureStats, CaptureTarget, Frame,
    FrameAcquirer, FrameSize, RowOrder,
};
pub use platform::{enumerate_windows, AvailableWindow};
pub use mirror_loop::{CaptureCadence, MirrorLoop, TickOutcome};

#[cfg(target_os = "windows")]
pub use capture::windows::GdiCapturePlatform;

// capture/mod.rs - Window/Screen Capture Module
//
// Platform-neutral capture types and the traits each OS backend implements.
// The frame acquirer drives a backend through resolve -> size -> session ->
// transfer and hands out packed RGB frames.

pub mod acquirer;
pub mod convert;
pub mod error;
pub mod frame;
pub mod target;

#[cfg(target_os = "windows")]
pub mod windows;
#[cfg(target_os = "windows")]
pub use self::windows::GdiCapturePlatform;

#[cfg(not(target_os = "windows"))]
pub mod unsupported;
#[cfg(not(target_os = "windows"))]
pub use unsupported::UnsupportedPlatform;

pub use acquirer::{AcquirerState, CaptureStats, FrameAcquirer};
pub use convert::RowOrder;
pub use error::{CaptureError, CaptureResult};
pub use frame::Frame;
pub use target::{CaptureCriteria, CaptureTarget, FrameSize};

/// OS capture resources sized to one target at one resolution.
///
/// Dropping a session releases everything it holds.
pub trait CaptureSession {
    /// Dimensions the session was allocated for
    fn size(&self) -> FrameSize;

    /// Row order of the staging buffer returned by `transfer`
    fn row_order(&self) -> RowOrder {
        RowOrder::BottomUp
    }

    /// Copy the target's current pixels into the staging buffer and return
    /// it (4 bytes per pixel, BGRX).
    fn transfer(&mut self) -> CaptureResult<&[u8]>;
}

/// Per-OS capture backend: target resolution plus session allocation
pub trait CapturePlatform {
    type Session: CaptureSession;

    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Find the target described by `criteria`. No retries.
    fn resolve(&self, criteria: &CaptureCriteria) -> CaptureResult<CaptureTarget>;

    /// Whether a previously resolved target still exists
    fn is_still_valid(&self, target: &CaptureTarget) -> bool;

    /// Client-area size for windows, pixel resolution for the display.
    /// `None` when the target is gone or reports an empty area.
    fn current_size(&self, target: &CaptureTarget) -> Option<FrameSize>;

    /// Allocate a session for `target` at `size`
    fn create_session(&self, target: &CaptureTarget, size: FrameSize)
        -> CaptureResult<Self::Session>;
}

/// Capture handle used by the render loop
pub trait CaptureEngine {
    /// Resolve the target and allocate a session (again, if already done)
    fn initialize(&mut self) -> CaptureResult<()>;

    /// Grab one frame; `None` when nothing could be captured this call
    fn capture_screen(&mut self) -> Option<Frame>;

    /// Grab one frame into `frame`, reusing its buffer.
    /// On error `frame` is left untouched.
    fn capture_into(&mut self, frame: &mut Frame) -> CaptureResult<()>;

    /// Current lifecycle state
    fn state(&self) -> AcquirerState;

    /// The resolved target, if any
    fn target(&self) -> Option<&CaptureTarget>;

    /// Counters since construction
    fn stats(&self) -> CaptureStats;

    /// Release all OS resources. Safe to call repeatedly.
    fn release(&mut self);
}

/// Create the capture handle for this platform
pub fn create_capture_engine(criteria: CaptureCriteria) -> Box<dyn CaptureEngine> {
    #[cfg(target_os = "windows")]
    {
        Box::new(FrameAcquirer::new(GdiCapturePlatform::new(), criteria))
    }

    #[cfg(not(target_os = "windows"))]
    {
        Box::new(FrameAcquirer::new(UnsupportedPlatform, criteria))
    }
}

// capture/unsupported.rs - Fallback for targets without a capture backend
//
// Every initialize fails with TargetUnavailable, so callers see the same
// failure shape as a missing window instead of a half-working handle.

use log::info;

use super::{
    CaptureCriteria, CaptureError, CapturePlatform, CaptureResult, CaptureSession, CaptureTarget,
    FrameSize,
};

pub struct UnsupportedPlatform;

/// Uninhabited: no session can ever be allocated here
pub enum UnsupportedSession {}

impl CaptureSession for UnsupportedSession {
    fn size(&self) -> FrameSize {
        match *self {}
    }

    fn transfer(&mut self) -> CaptureResult<&[u8]> {
        match *self {}
    }
}

impl CapturePlatform for UnsupportedPlatform {
    type Session = UnsupportedSession;

    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn resolve(&self, criteria: &CaptureCriteria) -> CaptureResult<CaptureTarget> {
        info!("Screen capture not implemented for {}", std::env::consts::OS);
        Err(CaptureError::TargetUnavailable(format!(
            "cannot capture {} on {}",
            criteria,
            std::env::consts::OS
        )))
    }

    fn is_still_valid(&self, _target: &CaptureTarget) -> bool {
        false
    }

    fn current_size(&self, _target: &CaptureTarget) -> Option<FrameSize> {
        None
    }

    fn create_session(
        &self,
        _target: &CaptureTarget,
        _size: FrameSize,
    ) -> CaptureResult<Self::Session> {
        Err(CaptureError::ResourceAllocationFailed(
            "screen capture not implemented for this platform".to_string(),
        ))
    }
}

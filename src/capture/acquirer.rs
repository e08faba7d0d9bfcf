//! Frame acquirer: capture session lifecycle and the per-call pixel pipeline
//!
//! ```text
//! Uninitialized --initialize--> Ready --target gone--> Degraded
//!                                 ^                       |
//!                                 +---- target back ------+
//! any state --release--> Released
//! ```
//!
//! Every failure is turned into a state transition plus an empty result.
//! The acquirer never blocks waiting for a target and never retries on its
//! own; the caller decides when to call `initialize` again.

use log::{debug, info, warn};

use super::convert::staging_to_rgb;
use super::{
    CaptureCriteria, CaptureEngine, CaptureError, CapturePlatform, CaptureResult, CaptureSession,
    CaptureTarget, Frame, FrameSize,
};

/// Lifecycle state of a [`FrameAcquirer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquirerState {
    /// No OS resources held
    Uninitialized,
    /// Session allocated, target reachable
    Ready,
    /// Session allocated but the target is currently unreachable
    Degraded,
    /// Torn down; `initialize` may start over
    Released,
}

impl std::fmt::Display for AcquirerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            AcquirerState::Uninitialized => "Uninitialized",
            AcquirerState::Ready => "Ready",
            AcquirerState::Degraded => "Degraded",
            AcquirerState::Released => "Released",
        };
        write!(f, "{}", value)
    }
}

/// Counters kept across the acquirer's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureStats {
    pub frames_captured: u64,
    pub empty_results: u64,
    pub sessions_allocated: u64,
    pub transfer_failures: u64,
    pub targets_lost: u64,
}

/// Owns the capture session for one criteria and produces RGB frames on demand
pub struct FrameAcquirer<P: CapturePlatform> {
    platform: P,
    criteria: CaptureCriteria,
    target: Option<CaptureTarget>,
    session: Option<P::Session>,
    state: AcquirerState,
    stats: CaptureStats,
}

impl<P: CapturePlatform> FrameAcquirer<P> {
    pub fn new(platform: P, criteria: CaptureCriteria) -> Self {
        debug!("Creating frame acquirer ({}) for {}", platform.name(), criteria);
        Self {
            platform,
            criteria,
            target: None,
            session: None,
            state: AcquirerState::Uninitialized,
            stats: CaptureStats::default(),
        }
    }

    pub fn criteria(&self) -> &CaptureCriteria {
        &self.criteria
    }

    /// Change what to look for; takes effect on the next `initialize`
    pub fn set_criteria(&mut self, criteria: CaptureCriteria) {
        self.criteria = criteria;
    }

    pub fn state(&self) -> AcquirerState {
        self.state
    }

    pub fn target(&self) -> Option<&CaptureTarget> {
        self.target.as_ref()
    }

    pub fn stats(&self) -> CaptureStats {
        self.stats
    }

    /// Size of the live session, if one is allocated
    pub fn session_size(&self) -> Option<FrameSize> {
        self.session.as_ref().map(|s| s.size())
    }

    /// Resolve the criteria and allocate a session sized to the target.
    ///
    /// On failure the previous state is kept as it was: resources allocated
    /// during the failed attempt are dropped before returning.
    pub fn initialize(&mut self) -> CaptureResult<()> {
        match self.try_initialize() {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    "Capture initialize failed for {} [{}]: {}",
                    self.criteria,
                    e.kind(),
                    e
                );
                Err(e)
            }
        }
    }

    fn try_initialize(&mut self) -> CaptureResult<()> {
        let target = self.platform.resolve(&self.criteria)?;
        let size = self.platform.current_size(&target).ok_or_else(|| {
            CaptureError::TargetUnavailable(format!("{} reports no usable size", target))
        })?;

        let session = self.platform.create_session(&target, size)?;
        self.stats.sessions_allocated += 1;

        // Replacing the option drops any previous session
        self.session = Some(session);
        info!("Capture ready: {} at {}", target, size);
        self.target = Some(target);
        self.state = AcquirerState::Ready;
        Ok(())
    }

    /// Grab one frame; `None` when nothing could be captured this call
    pub fn capture_screen(&mut self) -> Option<Frame> {
        let mut frame = Frame::empty();
        self.capture_into(&mut frame).ok()?;
        Some(frame)
    }

    /// Grab one frame into `frame`, reusing its pixel buffer.
    ///
    /// `frame` is only written on success, so on error it still holds the
    /// last good image.
    pub fn capture_into(&mut self, frame: &mut Frame) -> CaptureResult<()> {
        let result = self.try_capture_into(frame);
        match &result {
            Ok(()) => self.stats.frames_captured += 1,
            Err(e) => {
                self.stats.empty_results += 1;
                match e {
                    CaptureError::TransferFailed(_) | CaptureError::ResourceAllocationFailed(_) => {
                        warn!("Capture returned empty [{}]: {}", e.kind(), e)
                    }
                    // Lost targets are logged on the transition only
                    CaptureError::TargetLost => {}
                    _ => debug!("Capture returned empty [{}]: {}", e.kind(), e),
                }
            }
        }
        result
    }

    fn try_capture_into(&mut self, frame: &mut Frame) -> CaptureResult<()> {
        let target = match (self.state, self.target.as_ref()) {
            (AcquirerState::Ready | AcquirerState::Degraded, Some(target)) => target,
            _ => return Err(CaptureError::NotInitialized),
        };

        let size = if self.platform.is_still_valid(target) {
            self.platform.current_size(target)
        } else {
            None
        };

        let Some(size) = size else {
            if self.state != AcquirerState::Degraded {
                warn!("Capture target lost: {}", target);
                self.state = AcquirerState::Degraded;
                self.stats.targets_lost += 1;
            }
            return Err(CaptureError::TargetLost);
        };

        if self.state == AcquirerState::Degraded {
            info!("Capture target reachable again: {}", target);
            self.state = AcquirerState::Ready;
        }

        let session_size = self.session.as_ref().map(|s| s.size());
        if session_size != Some(size) {
            // Release the old resources before asking the OS for new ones
            if let Some(old) = self.session.take() {
                info!("Capture target resized {} -> {}, reallocating", old.size(), size);
                drop(old);
            }
            let session = self.platform.create_session(target, size)?;
            self.stats.sessions_allocated += 1;
            self.session = Some(session);
        }

        let Some(session) = self.session.as_mut() else {
            return Err(CaptureError::NotInitialized);
        };

        let size = session.size();
        let order = session.row_order();
        let staging = match session.transfer() {
            Ok(staging) => staging,
            Err(e) => {
                self.stats.transfer_failures += 1;
                return Err(e);
            }
        };

        staging_to_rgb(staging, size, order, &mut frame.data)?;
        frame.width = size.width();
        frame.height = size.height();
        Ok(())
    }

    /// Drop the session and forget the target. Idempotent.
    pub fn release(&mut self) {
        if self.state == AcquirerState::Released {
            return;
        }
        if let Some(session) = self.session.take() {
            debug!("Releasing capture session ({})", session.size());
            drop(session);
        }
        self.target = None;
        self.state = AcquirerState::Released;
        info!("Capture resources released");
    }
}

impl<P: CapturePlatform> CaptureEngine for FrameAcquirer<P> {
    fn initialize(&mut self) -> CaptureResult<()> {
        FrameAcquirer::initialize(self)
    }

    fn capture_screen(&mut self) -> Option<Frame> {
        FrameAcquirer::capture_screen(self)
    }

    fn capture_into(&mut self, frame: &mut Frame) -> CaptureResult<()> {
        FrameAcquirer::capture_into(self, frame)
    }

    fn state(&self) -> AcquirerState {
        self.state
    }

    fn target(&self) -> Option<&CaptureTarget> {
        self.target.as_ref()
    }

    fn stats(&self) -> CaptureStats {
        self.stats
    }

    fn release(&mut self) {
        FrameAcquirer::release(self)
    }
}

impl<P: CapturePlatform> Drop for FrameAcquirer<P> {
    fn drop(&mut self) {
        self.release();
    }
}

//! Caller-side capture cadence
//!
//! The capture handle never schedules itself. This module is the render
//! loop's side of the contract: sample a capture every few rendered frames,
//! keep the last good frame on screen while captures come back empty, and
//! blindly re-run `initialize` after a streak of empty captures.

use log::{debug, info};

use crate::capture::{CaptureEngine, CaptureResult, Frame};
use crate::config;

/// Decides which ticks capture and when to re-initialize
#[derive(Debug, Clone)]
pub struct CaptureCadence {
    capture_interval: u32,
    reinit_after_empty: u32,
    tick: u64,
    empty_streak: u32,
}

impl CaptureCadence {
    /// Both values are clamped to at least 1
    pub fn new(capture_interval: u32, reinit_after_empty: u32) -> Self {
        Self {
            capture_interval: capture_interval.max(1),
            reinit_after_empty: reinit_after_empty.max(1),
            tick: 0,
            empty_streak: 0,
        }
    }

    pub fn capture_interval(&self) -> u32 {
        self.capture_interval
    }

    pub fn reinit_after_empty(&self) -> u32 {
        self.reinit_after_empty
    }

    /// Advance one rendered frame; true when this frame should capture
    pub fn advance(&mut self) -> bool {
        self.tick += 1;
        self.tick % self.capture_interval as u64 == 0
    }

    /// Record a capture attempt; true when the caller should re-initialize now
    pub fn record(&mut self, captured: bool) -> bool {
        if captured {
            self.empty_streak = 0;
            return false;
        }
        self.empty_streak += 1;
        if self.empty_streak >= self.reinit_after_empty {
            self.empty_streak = 0;
            return true;
        }
        false
    }

    pub fn empty_streak(&self) -> u32 {
        self.empty_streak
    }
}

impl Default for CaptureCadence {
    fn default() -> Self {
        Self::new(
            config::capture::DEFAULT_CAPTURE_INTERVAL_FRAMES,
            config::capture::DEFAULT_REINIT_AFTER_EMPTY_CAPTURES,
        )
    }
}

/// What a single rendered frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not a capture frame
    Skipped,
    /// A new frame replaced the latest one
    Captured,
    /// Capture came back empty; the latest frame is unchanged
    Empty,
    /// The empty streak triggered a re-initialize
    Reinitialized { success: bool },
}

/// Drives a capture handle on behalf of the renderer
pub struct MirrorLoop {
    engine: Box<dyn CaptureEngine>,
    cadence: CaptureCadence,
    latest: Frame,
    has_frame: bool,
    reinit_attempts: u64,
}

impl MirrorLoop {
    pub fn new(engine: Box<dyn CaptureEngine>, cadence: CaptureCadence) -> Self {
        Self {
            engine,
            cadence,
            latest: Frame::empty(),
            has_frame: false,
            reinit_attempts: 0,
        }
    }

    /// First initialize. A failure is not fatal: the loop keeps ticking and
    /// retries on its cadence.
    pub fn start(&mut self) -> CaptureResult<()> {
        self.engine.initialize()
    }

    /// Run one rendered frame
    pub fn tick(&mut self) -> TickOutcome {
        if !self.cadence.advance() {
            return TickOutcome::Skipped;
        }

        match self.engine.capture_into(&mut self.latest) {
            Ok(()) => {
                self.cadence.record(true);
                self.has_frame = true;
                let stats = self.engine.stats();
                if stats.frames_captured % config::capture::STATS_LOG_INTERVAL_FRAMES == 0 {
                    debug!("Capture stats: {:?}", stats);
                }
                TickOutcome::Captured
            }
            Err(_) => {
                if !self.cadence.record(false) {
                    return TickOutcome::Empty;
                }
                self.reinit_attempts += 1;
                info!(
                    "No frame for {} captures, re-initializing (attempt {})",
                    self.cadence.reinit_after_empty(),
                    self.reinit_attempts
                );
                let success = self.engine.initialize().is_ok();
                TickOutcome::Reinitialized { success }
            }
        }
    }

    /// Last good frame, kept across empty captures
    pub fn latest_frame(&self) -> Option<&Frame> {
        self.has_frame.then_some(&self.latest)
    }

    pub fn engine(&self) -> &dyn CaptureEngine {
        self.engine.as_ref()
    }

    pub fn reinit_attempts(&self) -> u64 {
        self.reinit_attempts
    }

    /// Release the capture handle's resources
    pub fn shutdown(&mut self) {
        self.engine.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_every_nth_frame() {
        let mut cadence = CaptureCadence::new(3, 10);
        let pattern: Vec<bool> = (0..7).map(|_| cadence.advance()).collect();
        assert_eq!(pattern, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn zero_values_are_clamped() {
        let mut cadence = CaptureCadence::new(0, 0);
        assert_eq!(cadence.capture_interval(), 1);
        assert!(cadence.advance());
        assert!(cadence.record(false));
    }

    #[test]
    fn reinit_fires_after_empty_streak_and_resets() {
        let mut cadence = CaptureCadence::new(1, 3);
        assert!(!cadence.record(false));
        assert!(!cadence.record(false));
        assert!(cadence.record(false));
        assert_eq!(cadence.empty_streak(), 0);
        assert!(!cadence.record(false));
    }

    #[test]
    fn success_breaks_the_streak() {
        let mut cadence = CaptureCadence::new(1, 2);
        assert!(!cadence.record(false));
        assert!(!cadence.record(true));
        assert!(!cadence.record(false));
        assert!(cadence.record(false));
    }
}

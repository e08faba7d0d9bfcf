//! Capture error taxonomy
//!
//! Every variant is recoverable: the acquirer turns them into state
//! transitions plus an empty result and never propagates them past the
//! capture handle as a panic.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The window or display could not be resolved or reported no usable size.
    #[error("Capture target unavailable: {0}")]
    TargetUnavailable(String),

    /// The OS refused a drawing surface, bitmap or staging buffer.
    #[error("Capture resource allocation failed: {0}")]
    ResourceAllocationFailed(String),

    /// The pixel transfer for a single call failed; the session is kept.
    #[error("Pixel transfer failed: {0}")]
    TransferFailed(String),

    /// A previously valid target went away between calls.
    #[error("Capture target lost")]
    TargetLost,

    /// Capture was requested without a successful initialize.
    #[error("Capture not initialized")]
    NotInitialized,
}

impl CaptureError {
    /// Short label used in capture log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            CaptureError::TargetUnavailable(_) => "target_unavailable",
            CaptureError::ResourceAllocationFailed(_) => "resource_allocation_failed",
            CaptureError::TransferFailed(_) => "transfer_failed",
            CaptureError::TargetLost => "target_lost",
            CaptureError::NotInitialized => "not_initialized",
        }
    }
}

pub type CaptureResult<T> = Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_distinct() {
        let errors = [
            CaptureError::TargetUnavailable("gone".to_string()),
            CaptureError::ResourceAllocationFailed("no bitmap".to_string()),
            CaptureError::TransferFailed("blit".to_string()),
            CaptureError::TargetLost,
            CaptureError::NotInitialized,
        ];
        let mut kinds: Vec<_> = errors.iter().map(|e| e.kind()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
        assert_eq!(CaptureError::TargetLost.kind(), "target_lost");
    }

    #[test]
    fn messages_carry_detail() {
        let err = CaptureError::TargetUnavailable("no window titled \"Game\"".to_string());
        assert_eq!(
            err.to_string(),
            "Capture target unavailable: no window titled \"Game\""
        );
    }
}

//! Capture targets and the criteria used to find them

use serde::{Deserialize, Serialize};

use crate::config::pixel::{RGB_BYTES_PER_PIXEL, STAGING_BYTES_PER_PIXEL};

/// What the user asked to mirror
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CaptureCriteria {
    /// The primary display at its native resolution
    #[default]
    PrimaryDisplay,
    /// The first top-level window whose title matches
    Window { title: String },
}

impl CaptureCriteria {
    pub fn window(title: impl Into<String>) -> Self {
        CaptureCriteria::Window {
            title: title.into(),
        }
    }
}

impl std::fmt::Display for CaptureCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureCriteria::PrimaryDisplay => write!(f, "primary display"),
            CaptureCriteria::Window { title } => write!(f, "window \"{}\"", title),
        }
    }
}

/// A resolved capture target.
///
/// Window handles are opaque and may go stale at any time; liveness is
/// re-checked by the platform on every capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTarget {
    PrimaryDisplay,
    Window { handle: isize, title: String },
}

impl CaptureTarget {
    /// Whether a live target still answers to the title it was resolved by.
    ///
    /// `current_title` is what the OS reports for the handle now (`None` for
    /// an untitled window). The display always answers; a retitled or
    /// untitled window does not.
    pub fn still_answers_to(&self, current_title: Option<&str>) -> bool {
        match self {
            CaptureTarget::PrimaryDisplay => true,
            CaptureTarget::Window { title, .. } => {
                current_title.is_some_and(|current| title_matches(current, title))
            }
        }
    }
}

impl std::fmt::Display for CaptureTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureTarget::PrimaryDisplay => write!(f, "primary display"),
            CaptureTarget::Window { handle, title } => {
                write!(f, "window \"{}\" ({:#x})", title, handle)
            }
        }
    }
}

/// Pixel dimensions of a target. Both sides are always > 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    /// Build from raw OS dimensions; `None` for zero or negative sides.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Self {
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of a staging buffer at this size
    pub fn staging_len(&self) -> usize {
        self.pixel_count() * STAGING_BYTES_PER_PIXEL
    }

    /// Byte length of a packed RGB frame at this size
    pub fn rgb_len(&self) -> usize {
        self.pixel_count() * RGB_BYTES_PER_PIXEL
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Title comparison used by window resolution: exact, or equal once
/// surrounding whitespace is dropped. Empty wanted titles never match.
pub fn title_matches(candidate: &str, wanted: &str) -> bool {
    let wanted_trimmed = wanted.trim();
    if wanted_trimmed.is_empty() {
        return false;
    }
    candidate == wanted || candidate.trim() == wanted_trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_size_rejects_non_positive() {
        assert!(FrameSize::new(0, 0).is_none());
        assert!(FrameSize::new(0, 10).is_none());
        assert!(FrameSize::new(10, -1).is_none());
        assert!(FrameSize::new(-640, -480).is_none());

        let size = FrameSize::new(4, 3).unwrap();
        assert_eq!(size.width(), 4);
        assert_eq!(size.height(), 3);
        assert_eq!(size.staging_len(), 48);
        assert_eq!(size.rgb_len(), 36);
    }

    #[test]
    fn title_match_is_exact_or_trimmed() {
        assert!(title_matches("Minecraft 1.20", "Minecraft 1.20"));
        assert!(title_matches("  Minecraft 1.20 ", "Minecraft 1.20"));
        assert!(!title_matches("Minecraft 1.20.1", "Minecraft 1.20"));
        assert!(!title_matches("minecraft 1.20", "Minecraft 1.20"));
        assert!(!title_matches("", "   "));
    }

    #[test]
    fn retitled_window_no_longer_answers() {
        let target = CaptureTarget::Window {
            handle: 0x10,
            title: "Minecraft 1.20".to_string(),
        };
        assert!(target.still_answers_to(Some("Minecraft 1.20")));
        assert!(target.still_answers_to(Some(" Minecraft 1.20")));
        assert!(!target.still_answers_to(Some("Minecraft 1.20 - Paused")));
        assert!(!target.still_answers_to(None));

        assert!(CaptureTarget::PrimaryDisplay.still_answers_to(None));
    }

    #[test]
    fn criteria_serializes_with_mode_tag() {
        let json = serde_json::to_value(CaptureCriteria::window("Notepad")).unwrap();
        assert_eq!(json["mode"], "window");
        assert_eq!(json["title"], "Notepad");

        let parsed: CaptureCriteria =
            serde_json::from_str(r#"{"mode":"primary_display"}"#).unwrap();
        assert_eq!(parsed, CaptureCriteria::PrimaryDisplay);
    }
}

//! Captured RGB frames

use crate::config::pixel::RGB_BYTES_PER_PIXEL;

use super::FrameSize;

/// One still image returned by a capture call.
///
/// Packed RGB, 3 bytes per pixel, rows top to bottom with no padding.
/// The frame owns its buffer; nothing in the capture session aliases it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// RGB pixel data, `width * height * 3` bytes
    pub data: Vec<u8>,
}

impl Frame {
    /// A frame with no pixels, handy as a reusable target for `capture_into`
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width as usize * RGB_BYTES_PER_PIXEL
    }

    pub fn size(&self) -> Option<FrameSize> {
        FrameSize::new(i32::try_from(self.width).ok()?, i32::try_from(self.height).ok()?)
    }

    /// RGB triple at (x, y), top-left origin
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = y as usize * self.stride() + x as usize * RGB_BYTES_PER_PIXEL;
        let px = self.data.get(offset..offset + RGB_BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2]])
    }

    /// Hand the pixel buffer to the caller
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_lookup_uses_top_left_origin() {
        let frame = Frame {
            width: 2,
            height: 2,
            data: vec![
                1, 2, 3, 4, 5, 6, //
                7, 8, 9, 10, 11, 12,
            ],
        };

        assert_eq!(frame.stride(), 6);
        assert_eq!(frame.pixel(0, 0), Some([1, 2, 3]));
        assert_eq!(frame.pixel(1, 1), Some([10, 11, 12]));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn empty_frame_has_no_size() {
        let frame = Frame::empty();
        assert!(frame.is_empty());
        assert!(frame.size().is_none());
    }

    #[test]
    fn oversized_dimensions_have_no_size() {
        let frame = Frame {
            width: u32::MAX,
            height: 1,
            data: Vec::new(),
        };
        assert!(frame.size().is_none());

        let frame = Frame {
            width: 1,
            height: i32::MAX as u32 + 1,
            data: Vec::new(),
        };
        assert!(frame.size().is_none());
    }
}

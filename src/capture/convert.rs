//! Staging buffer to RGB conversion
//!
//! The OS hands back 4 bytes per pixel in B, G, R, X order. GDI device
//! independent bitmaps with a positive height are stored bottom-up, so the
//! last row in memory is the top row on screen. Conversion is a fixed
//! channel reorder plus optional row flip, one pass over the pixels.

use crate::config::pixel::{RGB_BYTES_PER_PIXEL, STAGING_BYTES_PER_PIXEL};

use super::{CaptureError, CaptureResult, FrameSize};

/// Row order of a staging buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowOrder {
    /// First row in memory is the bottom row of the image
    #[default]
    BottomUp,
    /// First row in memory is the top row of the image
    TopDown,
}

/// Convert a BGRX staging buffer into packed top-down RGB.
///
/// `out` is resized to exactly `size.rgb_len()` bytes; when it already has
/// that much capacity no allocation happens.
pub fn staging_to_rgb(
    staging: &[u8],
    size: FrameSize,
    order: RowOrder,
    out: &mut Vec<u8>,
) -> CaptureResult<()> {
    let src_len = size.staging_len();
    if staging.len() < src_len {
        return Err(CaptureError::TransferFailed(format!(
            "staging buffer holds {} bytes, {} needed for {}",
            staging.len(),
            src_len,
            size
        )));
    }

    let width = size.width() as usize;
    let src_stride = width * STAGING_BYTES_PER_PIXEL;
    let dst_stride = width * RGB_BYTES_PER_PIXEL;

    out.resize(size.rgb_len(), 0);

    let src_rows = staging[..src_len].chunks_exact(src_stride);
    let dst_rows = out.chunks_exact_mut(dst_stride);

    match order {
        RowOrder::BottomUp => {
            for (dst_row, src_row) in dst_rows.zip(src_rows.rev()) {
                convert_row(src_row, dst_row);
            }
        }
        RowOrder::TopDown => {
            for (dst_row, src_row) in dst_rows.zip(src_rows) {
                convert_row(src_row, dst_row);
            }
        }
    }

    Ok(())
}

#[inline]
fn convert_row(src: &[u8], dst: &mut [u8]) {
    for (rgb, bgrx) in dst
        .chunks_exact_mut(RGB_BYTES_PER_PIXEL)
        .zip(src.chunks_exact(STAGING_BYTES_PER_PIXEL))
    {
        rgb[0] = bgrx[2];
        rgb[1] = bgrx[1];
        rgb[2] = bgrx[0];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Distinct value per (x, y, channel) so any misplaced byte shows up
    fn expected_rgb(x: usize, y: usize) -> [u8; 3] {
        [
            (x * 10 + y) as u8,
            (100 + x * 10 + y) as u8,
            (200 + x + y) as u8,
        ]
    }

    fn bottom_up_source(width: usize, height: usize) -> Vec<u8> {
        let mut buf = Vec::with_capacity(width * height * 4);
        for mem_row in 0..height {
            let y = height - 1 - mem_row;
            for x in 0..width {
                let [r, g, b] = expected_rgb(x, y);
                buf.extend_from_slice(&[b, g, r, 0xFF]);
            }
        }
        buf
    }

    #[test]
    fn bottom_up_bgrx_becomes_top_down_rgb() {
        let (w, h) = (5, 4);
        let size = FrameSize::new(w as i32, h as i32).unwrap();
        let staging = bottom_up_source(w, h);

        let mut out = Vec::new();
        staging_to_rgb(&staging, size, RowOrder::BottomUp, &mut out).unwrap();

        assert_eq!(out.len(), w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let offset = (y * w + x) * 3;
                assert_eq!(&out[offset..offset + 3], &expected_rgb(x, y), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn top_down_keeps_row_order() {
        let size = FrameSize::new(1, 2).unwrap();
        let staging = [3, 2, 1, 0, 6, 5, 4, 0];

        let mut out = Vec::new();
        staging_to_rgb(&staging, size, RowOrder::TopDown, &mut out).unwrap();

        assert_eq!(out, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn padding_byte_is_dropped() {
        let size = FrameSize::new(1, 1).unwrap();
        let mut out = Vec::new();
        staging_to_rgb(&[30, 20, 10, 99], size, RowOrder::BottomUp, &mut out).unwrap();
        assert_eq!(out, vec![10, 20, 30]);
    }

    #[test]
    fn short_staging_buffer_is_a_transfer_failure() {
        let size = FrameSize::new(2, 2).unwrap();
        let mut out = vec![7u8; 3];
        let err = staging_to_rgb(&[0u8; 15], size, RowOrder::BottomUp, &mut out).unwrap_err();
        assert!(matches!(err, CaptureError::TransferFailed(_)));
        assert_eq!(out, vec![7u8; 3]);
    }

    #[test]
    fn reuses_existing_capacity() {
        let size = FrameSize::new(8, 8).unwrap();
        let staging = vec![0u8; size.staging_len()];
        let mut out = Vec::with_capacity(size.rgb_len());
        let ptr = out.as_ptr();

        staging_to_rgb(&staging, size, RowOrder::BottomUp, &mut out).unwrap();
        staging_to_rgb(&staging, size, RowOrder::BottomUp, &mut out).unwrap();

        assert_eq!(out.as_ptr(), ptr);
        assert_eq!(out.len(), size.rgb_len());
    }
}

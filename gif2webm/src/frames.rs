//! Frame sequence repetition and resampling.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Lanczos-class filter: quality over speed, it runs once per output frame.
pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

/// The sequence played `repeat_count` times back to back.
///
/// Yields borrows of `frames`; a long loop costs no extra frame buffers.
pub fn repeat_frames(
    frames: &[RgbaImage],
    repeat_count: usize,
) -> impl Iterator<Item = &RgbaImage> + Clone {
    frames.iter().cycle().take(frames.len() * repeat_count)
}

/// Resizes to exactly `size × size`, ignoring aspect ratio.
///
/// Works on straight RGBA: alpha is filtered like any other channel and never
/// premultiplied or dropped.
pub fn resize_frame(frame: &RgbaImage, size: u32) -> RgbaImage {
    if frame.dimensions() == (size, size) {
        return frame.clone();
    }
    imageops::resize(frame, size, size, RESIZE_FILTER)
}

pub fn resize_frames(frames: &[RgbaImage], size: u32) -> Vec<RgbaImage> {
    frames.iter().map(|f| resize_frame(f, size)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn marker_frame(i: u8) -> RgbaImage {
        RgbaImage::from_pixel(4, 4, Rgba([i, 0, 0, 255]))
    }

    #[test]
    fn test_repeat_preserves_order() {
        let frames: Vec<_> = (0..3).map(marker_frame).collect();
        let markers: Vec<u8> = repeat_frames(&frames, 4)
            .map(|f| f.get_pixel(0, 0).0[0])
            .collect();
        assert_eq!(markers, vec![0, 1, 2, 0, 1, 2, 0, 1, 2, 0, 1, 2]);
    }

    #[test]
    fn test_repeat_once_and_empty() {
        let frames: Vec<_> = (0..5).map(marker_frame).collect();
        let once: Vec<RgbaImage> = repeat_frames(&frames, 1).cloned().collect();
        assert_eq!(once, frames);
        assert_eq!(repeat_frames(&[], 3).count(), 0);
        assert_eq!(repeat_frames(&frames, 0).count(), 0);
    }

    #[test]
    fn test_resize_to_exact_square() {
        let wide = RgbaImage::from_pixel(40, 10, Rgba([10, 20, 30, 255]));
        let out = resize_frame(&wide, 512);
        assert_eq!(out.dimensions(), (512, 512));

        let big = RgbaImage::from_pixel(1024, 700, Rgba([10, 20, 30, 255]));
        assert_eq!(resize_frame(&big, 512).dimensions(), (512, 512));
    }

    #[test]
    fn test_resize_keeps_transparency() {
        // Left half fully transparent, right half opaque.
        let mut frame = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 0]));
        for y in 0..64 {
            for x in 32..64 {
                frame.put_pixel(x, y, Rgba([200, 50, 50, 255]));
            }
        }

        let out = resize_frame(&frame, 512);
        assert_eq!(out.get_pixel(10, 256).0[3], 0);
        assert_eq!(out.get_pixel(0, 0).0[3], 0);
        assert!(out.get_pixel(500, 256).0[3] >= 250);
    }

    #[test]
    fn test_resize_frames_all_target_size() {
        let frames: Vec<_> = (0..6).map(marker_frame).collect();
        let out = resize_frames(&frames, 32);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|f| f.dimensions() == (32, 32)));
    }
}

//! Binarization: Floyd-Steinberg error diffusion and flat thresholding.
//!
//! Both produce a strictly binary canvas (every pixel 0 or 255), ready for
//! strip partitioning and 1-bit wire encoding downstream.

use image::{GrayImage, Luma};
use tracing::debug;

/// Midpoint threshold used for binarization.
pub const THRESHOLD: u8 = 128;

/// Apply Floyd-Steinberg dithering to a grayscale canvas.
///
/// Quantization error propagates in raster order to unprocessed neighbors:
/// - Right:        7/16
/// - Bottom-left:  3/16
/// - Bottom:       5/16
/// - Bottom-right: 1/16
pub fn floyd_steinberg(img: &GrayImage) -> GrayImage {
    let (width, height) = img.dimensions();
    debug!(width, height, "Applying Floyd-Steinberg dithering");

    let w = width as usize;
    // i16 working buffer so accumulated error can exceed the u8 range
    let mut buffer: Vec<i16> = img.pixels().map(|p| i16::from(p.0[0])).collect();

    for y in 0..height as usize {
        for x in 0..w {
            let idx = y * w + x;
            let old = buffer[idx];
            let new = if old >= i16::from(THRESHOLD) { 255 } else { 0 };
            buffer[idx] = new;
            let error = old - new;

            if x + 1 < w {
                buffer[idx + 1] += error * 7 / 16;
            }
            if y + 1 < height as usize {
                if x > 0 {
                    buffer[idx + w - 1] += error * 3 / 16;
                }
                buffer[idx + w] += error * 5 / 16;
                if x + 1 < w {
                    buffer[idx + w + 1] += error / 16;
                }
            }
        }
    }

    let mut output = GrayImage::new(width, height);
    for (i, p) in output.pixels_mut().enumerate() {
        *p = Luma([buffer[i].clamp(0, 255) as u8]);
    }
    output
}

/// Flat threshold conversion without dithering.
///
/// Pixels with values >= `threshold` become white (255), others black (0).
pub fn threshold(img: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    debug!(width, height, threshold, "Applying flat threshold");

    let mut output = GrayImage::new(width, height);
    for (src, dst) in img.pixels().zip(output.pixels_mut()) {
        *dst = Luma([if src.0[0] >= threshold { 255 } else { 0 }]);
    }
    output
}

//! Geometry fitting: map a source image of arbitrary resolution onto the
//! target pixel canvas under one of three mutually exclusive policies.
//!
//! `Fill` crops, `Stretch` distorts, `Fit` letterboxes on white. All three
//! resample with Lanczos3.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use tracing::debug;

use crate::config::FitMode;

/// Intensity used for unprinted border area (white paper).
const BORDER_INTENSITY: u8 = 255;

/// Reduce the source to grayscale and map it onto a `target_w` x `target_h`
/// canvas according to `mode`.
pub fn fit_to_canvas(img: &DynamicImage, target_w: u32, target_h: u32, mode: FitMode) -> GrayImage {
    let gray = DynamicImage::ImageLuma8(img.to_luma8());
    debug!(
        source_w = gray.width(),
        source_h = gray.height(),
        target_w,
        target_h,
        ?mode,
        "Fitting source onto target canvas"
    );

    match mode {
        FitMode::Fill => gray
            .resize_to_fill(target_w, target_h, FilterType::Lanczos3)
            .into_luma8(),
        FitMode::Stretch => gray
            .resize_exact(target_w, target_h, FilterType::Lanczos3)
            .into_luma8(),
        FitMode::Fit => pad_to_canvas(&gray, target_w, target_h),
    }
}

/// Uniform scale preserving aspect ratio, centered on an all-white canvas.
fn pad_to_canvas(gray: &DynamicImage, target_w: u32, target_h: u32) -> GrayImage {
    let scaled = gray
        .resize(target_w, target_h, FilterType::Lanczos3)
        .into_luma8();
    let (scaled_w, scaled_h) = scaled.dimensions();

    let mut canvas = GrayImage::from_pixel(target_w, target_h, Luma([BORDER_INTENSITY]));
    let x = i64::from((target_w - scaled_w) / 2);
    let y = i64::from((target_h - scaled_h) / 2);
    imageops::replace(&mut canvas, &scaled, x, y);

    debug!(scaled_w, scaled_h, x, y, "Padded scaled image onto white canvas");
    canvas
}

//! Strip partitioning: slice the binary canvas into printable strips and
//! persist each one as a PNG immediately.
//!
//! Strips are numbered from 1 in traversal order. The numeric index is
//! zero-padded to `max(2, digits(strip_count))` so a lexicographic listing
//! of the output folder always reproduces print order, whatever the count.

use std::path::{Path, PathBuf};

use image::{GrayImage, imageops};
use tracing::{debug, info};

use crate::config::FeedDirection;
use crate::{PipelineError, Result};

/// Slice `img` into strips no longer than `strip_px` along the feed axis,
/// saving each to `folder`. Returns the ordered list of file paths.
///
/// Vertical strips are columns spanning the full canvas height, unrotated.
/// Horizontal strips are rows spanning the full canvas width, each rotated
/// 90 degrees counter-clockwise so the strip width after rotation equals
/// the row height. The last strip along either axis is the remainder.
pub fn partition(
    img: &GrayImage,
    strip_px: u32,
    direction: FeedDirection,
    folder: &Path,
) -> Result<Vec<PathBuf>> {
    if strip_px == 0 {
        return Err(PipelineError::InvalidConfig(
            "strip length must be at least one pixel".into(),
        ));
    }
    std::fs::create_dir_all(folder)?;

    let (width, height) = img.dimensions();
    let files = match direction {
        FeedDirection::Vertical => {
            let count = width.div_ceil(strip_px);
            let pad = index_pad(count);
            let mut files = Vec::with_capacity(count as usize);
            for idx in 0..count {
                let x0 = idx * strip_px;
                let strip_w = strip_px.min(width - x0);
                let strip = imageops::crop_imm(img, x0, 0, strip_w, height).to_image();
                let path = folder.join(format!("vstrip_{:0pad$}.png", idx + 1));
                debug!(path = %path.display(), x0, strip_w, "Saving vertical strip");
                strip.save(&path)?;
                files.push(path);
            }
            files
        }
        FeedDirection::Horizontal => {
            let count = height.div_ceil(strip_px);
            let pad = index_pad(count);
            let mut files = Vec::with_capacity(count as usize);
            for idx in 0..count {
                let y0 = idx * strip_px;
                let strip_h = strip_px.min(height - y0);
                let row = imageops::crop_imm(img, 0, y0, width, strip_h).to_image();
                let strip = imageops::rotate270(&row);
                let path = folder.join(format!("hstrip_{:0pad$}.png", idx + 1));
                debug!(path = %path.display(), y0, strip_h, "Saving horizontal strip");
                strip.save(&path)?;
                files.push(path);
            }
            files
        }
    };

    info!(
        count = files.len(),
        folder = %folder.display(),
        "Canvas partitioned into strips"
    );
    Ok(files)
}

/// Zero-pad width for strip indices: two digits minimum, widened as needed
/// so lexicographic filename order matches print order at any strip count.
fn index_pad(count: u32) -> usize {
    count.max(1).to_string().len().max(2)
}

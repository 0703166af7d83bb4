//! Tesselation orchestration: source -> geometry fit -> optional invert ->
//! binarization -> strip partitioning.

use std::path::{Path, PathBuf};

use image::imageops;
use tracing::info;

use crate::config::{DitherMode, RenderConfig};
use crate::{Result, dither, geometry, halftone, source, strips};

/// Run the full tesselation pipeline for `source_ref` (path or URL),
/// writing strip files into `output_folder`.
///
/// Any failure aborts the run; strips already written are left on disk but
/// the partial set is not considered valid output.
pub fn tesselate(
    source_ref: &str,
    output_folder: &Path,
    config: &RenderConfig,
) -> Result<Vec<PathBuf>> {
    config.validate()?;

    let target_w = config.target_width_px();
    let target_h = config.target_height_px();
    info!(
        source = source_ref,
        target_w,
        target_h,
        strip_px = config.strip_px(),
        dither_mode = ?config.dither_mode,
        direction = ?config.direction,
        "Starting tesselation"
    );

    let img = source::load(source_ref)?;
    let mut canvas = geometry::fit_to_canvas(&img, target_w, target_h, config.fit_mode);

    if config.invert {
        imageops::invert(&mut canvas);
    }

    let binary = match config.dither_mode {
        DitherMode::Floyd => dither::floyd_steinberg(&canvas),
        DitherMode::Halftone => halftone::screen(&canvas, config.halftone_cell_size),
        DitherMode::None => dither::threshold(&canvas, dither::THRESHOLD),
    };

    strips::partition(&binary, config.strip_px(), config.direction, output_folder)
}

//! Halftone screening: represent local intensity as the area of a dot
//! grown inside a fixed cell.
//!
//! Unlike error diffusion this is spatially local; no error crosses cell
//! boundaries, so output depends only on each cell's own mean intensity.

use image::{GrayImage, Luma};
use tracing::debug;

/// Screen a grayscale canvas into a binary canvas using `cell_size` cells.
///
/// The canvas is partitioned into non-overlapping `cell_size` x `cell_size`
/// cells; trailing cells at the right/bottom edges may be partial and are
/// averaged over their actual pixels. Each cell's mean intensity selects a
/// dot radius (`round((1 - mean/255) * cell_size/2)`), and a filled circle
/// of that radius is drawn at the cell midpoint into an all-white output.
///
/// The circle membership grid is `[-radius, radius)` on both axes. The
/// asymmetry about the center is intentional and must not be "fixed":
/// output is kept pixel-identical to the established rendition.
pub fn screen(img: &GrayImage, cell_size: u32) -> GrayImage {
    let (width, height) = img.dimensions();
    debug!(width, height, cell_size, "Applying halftone screen");

    let mut output = GrayImage::from_pixel(width, height, Luma([255]));
    let half_cell = f64::from(cell_size) / 2.0;

    for cell_y in (0..height).step_by(cell_size as usize) {
        for cell_x in (0..width).step_by(cell_size as usize) {
            let cell_w = cell_size.min(width - cell_x);
            let cell_h = cell_size.min(height - cell_y);

            let mut sum: u64 = 0;
            for y in cell_y..cell_y + cell_h {
                for x in cell_x..cell_x + cell_w {
                    sum += u64::from(img.get_pixel(x, y).0[0]);
                }
            }
            let mean = sum as f64 / f64::from(cell_w * cell_h);
            let radius = ((1.0 - mean / 255.0) * half_cell).round() as i64;

            // Dot center sits at the full-cell midpoint even for partial
            // edge cells; drawing is clipped to the canvas.
            let center_x = i64::from(cell_x) + i64::from(cell_size / 2);
            let center_y = i64::from(cell_y) + i64::from(cell_size / 2);
            draw_dot(&mut output, center_x, center_y, radius);
        }
    }

    output
}

/// Fill the circle `i*i + j*j <= radius*radius` over the offset grid
/// `[-radius, radius)`, clipped to canvas bounds.
fn draw_dot(canvas: &mut GrayImage, center_x: i64, center_y: i64, radius: i64) {
    let (width, height) = canvas.dimensions();
    for i in -radius..radius {
        for j in -radius..radius {
            if i * i + j * j <= radius * radius {
                let x = center_x + j;
                let y = center_y + i;
                if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                    canvas.put_pixel(x as u32, y as u32, Luma([0]));
                }
            }
        }
    }
}

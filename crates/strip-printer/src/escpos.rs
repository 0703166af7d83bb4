//! ESC/POS command builders for raster printing.
//!
//! Pure functions returning wire bytes; transports concatenate and send
//! them. Raster encoding is where the binary canvas becomes genuine 1-bit
//! data: 8 pixels per byte, MSB first, a set bit prints dark.

use image::GrayImage;
use tracing::debug;

/// Pixels below this intensity are encoded as printed (dark) dots.
const DARK_THRESHOLD: u8 = 128;

/// ESC @: initialize the printer.
pub fn init() -> Vec<u8> {
    vec![0x1B, 0x40]
}

/// ESC d: feed `lines` text lines of paper.
pub fn feed(lines: u8) -> Vec<u8> {
    vec![0x1B, 0x64, lines]
}

/// GS V: partial cut with a 16-dot feed, leaving the strip attached for
/// manual tear-off.
pub fn cut() -> Vec<u8> {
    vec![0x1D, 0x56, 0x41, 0x10]
}

/// GS v 0: raster bit image, normal density.
///
/// Rows are padded to a whole number of bytes; padding bits stay unset
/// (white). Both dimensions are encoded little-endian in the header.
pub fn raster_image(img: &GrayImage) -> Vec<u8> {
    let (width, height) = img.dimensions();
    let bytes_per_row = width.div_ceil(8);
    debug!(width, height, bytes_per_row, "Encoding raster image");

    let mut data = Vec::with_capacity(8 + (bytes_per_row * height) as usize);
    data.extend_from_slice(&[0x1D, 0x76, 0x30, 0x00]);
    data.extend_from_slice(&[(bytes_per_row & 0xFF) as u8, (bytes_per_row >> 8) as u8]);
    data.extend_from_slice(&[(height & 0xFF) as u8, (height >> 8) as u8]);

    for y in 0..height {
        for byte_idx in 0..bytes_per_row {
            let mut packed = 0u8;
            for bit in 0..8 {
                let x = byte_idx * 8 + bit;
                if x < width && img.get_pixel(x, y).0[0] < DARK_THRESHOLD {
                    packed |= 0x80 >> bit;
                }
            }
            data.push(packed);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_init_and_cut_bytes() {
        assert_eq!(init(), [0x1B, 0x40]);
        assert_eq!(cut(), [0x1D, 0x56, 0x41, 0x10]);
        assert_eq!(feed(3), [0x1B, 0x64, 3]);
    }

    #[test]
    fn test_raster_header_dimensions() {
        // 16x2 image: 2 bytes per row, 2 rows
        let img = GrayImage::from_pixel(16, 2, Luma([255]));
        let data = raster_image(&img);

        assert_eq!(&data[..4], &[0x1D, 0x76, 0x30, 0x00]);
        assert_eq!(&data[4..6], &[2, 0]); // bytes per row, little-endian
        assert_eq!(&data[6..8], &[2, 0]); // rows, little-endian
        assert_eq!(data.len(), 8 + 4);
    }

    #[test]
    fn test_raster_header_wide_image() {
        // 300 rows: yL=44, yH=1
        let img = GrayImage::from_pixel(8, 300, Luma([255]));
        let data = raster_image(&img);
        assert_eq!(&data[6..8], &[44, 1]);
    }

    #[test]
    fn test_raster_packs_msb_first() {
        // Dark pixel at x=0 sets the high bit; x=7 sets the low bit.
        let mut img = GrayImage::from_pixel(8, 1, Luma([255]));
        img.put_pixel(0, 0, Luma([0]));
        img.put_pixel(7, 0, Luma([0]));

        let data = raster_image(&img);
        assert_eq!(data[8], 0b1000_0001);
    }

    #[test]
    fn test_raster_pads_partial_byte_with_white() {
        // Width 10 -> 2 bytes per row; all-dark row leaves the 6 padding
        // bits of the second byte unset.
        let img = GrayImage::from_pixel(10, 1, Luma([0]));
        let data = raster_image(&img);

        assert_eq!(&data[4..6], &[2, 0]);
        assert_eq!(data[8], 0b1111_1111);
        assert_eq!(data[9], 0b1100_0000);
    }

    #[test]
    fn test_raster_white_image_is_all_zero_bits() {
        let img = GrayImage::from_pixel(24, 4, Luma([255]));
        let data = raster_image(&img);
        assert!(data[8..].iter().all(|&b| b == 0));
        assert_eq!(data.len(), 8 + 3 * 4);
    }
}

//! Render configuration for a tesselation run.
//!
//! A [`RenderConfig`] is built once, validated, and consumed by
//! [`crate::tesselate`]. Physical millimeter measurements plus the printer's
//! dot density fully determine the pixel dimensions of the working canvas.

use crate::{PipelineError, Result};

/// DIN A-series paper sizes in millimeters (width, height).
pub const DIN_SIZES_MM: [(&str, (f64, f64)); 7] = [
    ("A0", (841.0, 1189.0)),
    ("A1", (594.0, 841.0)),
    ("A2", (420.0, 594.0)),
    ("A3", (297.0, 420.0)),
    ("A4", (210.0, 297.0)),
    ("A5", (148.0, 210.0)),
    ("A6", (105.0, 148.0)),
];

/// Look up a DIN size by name (case-insensitive).
pub fn din_size_mm(name: &str) -> Option<(f64, f64)> {
    DIN_SIZES_MM
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, dims)| *dims)
}

/// How the source image is mapped onto the target canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FitMode {
    /// Crop-and-scale so the image covers the whole canvas, center-anchored.
    Fill,
    /// Non-uniform resize to exactly the target dimensions, aspect ignored.
    Stretch,
    /// Uniform scale preserving aspect ratio, centered, borders padded white.
    #[default]
    Fit,
}

/// Binarization algorithm applied to the fitted grayscale canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Floyd-Steinberg error-diffusion dithering.
    #[default]
    Floyd,
    /// Cell-based halftone screening with radius-grown dots.
    Halftone,
    /// Flat threshold at the midpoint, no dithering.
    None,
}

/// Axis along which the canvas is cut into strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedDirection {
    /// Cut into columns; strips print unrotated.
    #[default]
    Vertical,
    /// Cut into rows; strips are rotated 90 degrees for the feed.
    Horizontal,
}

/// Immutable configuration for one tesselation run.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Target canvas width in millimeters.
    pub width_mm: f64,

    /// Target canvas height in millimeters.
    pub height_mm: f64,

    /// Printer dot density in dots per millimeter.
    pub dots_per_mm: u32,

    /// Maximum strip length in millimeters.
    pub strip_mm: f64,

    /// Geometry fit policy.
    pub fit_mode: FitMode,

    /// Binarization policy.
    pub dither_mode: DitherMode,

    /// Halftone cell edge length in pixels (used only by `DitherMode::Halftone`).
    pub halftone_cell_size: u32,

    /// Invert the grayscale canvas before binarization.
    pub invert: bool,

    /// Strip cutting axis.
    pub direction: FeedDirection,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            dots_per_mm: 8,
            strip_mm: 60.0,
            fit_mode: FitMode::default(),
            dither_mode: DitherMode::default(),
            halftone_cell_size: 8,
            invert: false,
            direction: FeedDirection::default(),
        }
    }
}

impl RenderConfig {
    /// Create a config with A4 defaults (210x297 mm, 8 dots/mm, 60 mm strips).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the target size in millimeters.
    pub fn with_size_mm(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.width_mm = width_mm;
        self.height_mm = height_mm;
        self
    }

    /// Builder: set the printer dot density.
    pub fn with_dots_per_mm(mut self, dots_per_mm: u32) -> Self {
        self.dots_per_mm = dots_per_mm;
        self
    }

    /// Builder: set the strip length in millimeters.
    pub fn with_strip_mm(mut self, strip_mm: f64) -> Self {
        self.strip_mm = strip_mm;
        self
    }

    /// Builder: set the geometry fit policy.
    pub fn with_fit_mode(mut self, mode: FitMode) -> Self {
        self.fit_mode = mode;
        self
    }

    /// Builder: set the binarization policy.
    pub fn with_dither_mode(mut self, mode: DitherMode) -> Self {
        self.dither_mode = mode;
        self
    }

    /// Builder: set the halftone cell size in pixels.
    pub fn with_halftone_cell_size(mut self, cell_size: u32) -> Self {
        self.halftone_cell_size = cell_size;
        self
    }

    /// Builder: set the invert flag.
    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    /// Builder: set the strip cutting axis.
    pub fn with_direction(mut self, direction: FeedDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Target canvas width in pixels: `round(width_mm * dots_per_mm)`.
    pub fn target_width_px(&self) -> u32 {
        (self.width_mm * f64::from(self.dots_per_mm)).round() as u32
    }

    /// Target canvas height in pixels: `round(height_mm * dots_per_mm)`.
    pub fn target_height_px(&self) -> u32 {
        (self.height_mm * f64::from(self.dots_per_mm)).round() as u32
    }

    /// Maximum strip length in pixels: `round(strip_mm * dots_per_mm)`.
    pub fn strip_px(&self) -> u32 {
        (self.strip_mm * f64::from(self.dots_per_mm)).round() as u32
    }

    /// Reject invalid geometry before any canvas is allocated.
    ///
    /// Every pixel dimension derived from this config must come out positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.width_mm > 0.0) || !(self.height_mm > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "target size must be positive, got {}x{} mm",
                self.width_mm, self.height_mm
            )));
        }
        if self.dots_per_mm == 0 {
            return Err(PipelineError::InvalidConfig(
                "dots per millimeter must be positive".into(),
            ));
        }
        if !(self.strip_mm > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "strip length must be positive, got {} mm",
                self.strip_mm
            )));
        }
        if self.target_width_px() == 0 || self.target_height_px() == 0 || self.strip_px() == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "pixel dimensions round to zero at {} dots/mm",
                self.dots_per_mm
            )));
        }
        if self.dither_mode == DitherMode::Halftone && self.halftone_cell_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "halftone cell size must be positive".into(),
            ));
        }
        Ok(())
    }
}

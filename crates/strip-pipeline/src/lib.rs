//! Image-to-strip tesselation pipeline for continuous-feed thermal printers.
//!
//! Converts an arbitrary raster image into an ordered sequence of monochrome
//! strip files sized to the printer's feed width: geometry fitting into a
//! physical target canvas, binarization (Floyd-Steinberg error diffusion,
//! flat thresholding, or halftone screening), and strip partitioning with
//! orientation handling for horizontal feeds.

pub mod config;
pub mod dither;
pub mod geometry;
pub mod halftone;
pub mod pipeline;
pub mod source;
pub mod strips;

// Re-exports for convenience
pub use config::{DitherMode, FeedDirection, FitMode, RenderConfig};
pub use pipeline::tesselate;

/// Errors that can occur during a tesselation run.
///
/// All of these abort the run; a partial strip set is never valid output.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Source image not found: {0}")]
    SourceNotFound(std::path::PathBuf),

    #[error("Failed to fetch image from {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

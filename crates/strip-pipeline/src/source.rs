//! Source image loading from the filesystem or an HTTP(S) URL.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::{PipelineError, Result};

/// Load a source image from a local path or an `http://`/`https://` URL.
///
/// A missing local file fails with [`PipelineError::SourceNotFound`];
/// network and non-success HTTP responses fail with [`PipelineError::Fetch`].
pub fn load(source: &str) -> Result<DynamicImage> {
    if source.starts_with("http://") || source.starts_with("https://") {
        load_url(source)
    } else {
        load_path(source)
    }
}

fn load_url(url: &str) -> Result<DynamicImage> {
    debug!(url, "Fetching source image");
    let fetch_err = |reason: String| PipelineError::Fetch {
        url: url.to_string(),
        reason,
    };

    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_err(e.to_string()))?;
    let bytes = response.bytes().map_err(|e| fetch_err(e.to_string()))?;

    debug!(url, len = bytes.len(), "Decoding fetched image");
    Ok(image::load_from_memory(&bytes)?)
}

fn load_path(source: &str) -> Result<DynamicImage> {
    let path = Path::new(source);
    if !path.exists() {
        return Err(PipelineError::SourceNotFound(path.to_path_buf()));
    }
    debug!(path = %path.display(), "Loading source image");
    Ok(image::open(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_missing_local_file_is_not_found() {
        let err = load("/nonexistent/surely_missing.png").unwrap_err();
        assert!(matches!(err, PipelineError::SourceNotFound(_)));
    }

    #[test]
    fn test_loads_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.png");
        GrayImage::from_pixel(3, 2, Luma([200]))
            .save(&path)
            .unwrap();

        let img = load(path.to_str().unwrap()).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
    }

    #[test]
    fn test_corrupt_file_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let err = load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PipelineError::Image(_)));
    }
}

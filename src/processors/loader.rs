// watermarker/src/processors/loader.rs
use crate::core::{Result, WatermarkError};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::path::Path;

#[derive(Clone)]
pub struct Loader {
    max_dimensions: Option<(u32, u32)>,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    /// Decodes by content, not by extension.
    pub fn load(&self, path: &Path) -> Result<DynamicImage> {
        log::debug!("Loading image from: {}", path.display());

        self.validate_path(path)?;

        let image = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| unreadable(path, format!("unreadable image format ({})", e)))?;

        let (width, height) = image.dimensions();
        if let Some((max_w, max_h)) = self.max_dimensions {
            if width > max_w || height > max_h {
                return Err(unreadable(
                    path,
                    format!(
                        "image dimensions {}x{} exceed maximum {}x{}",
                        width, height, max_w, max_h
                    ),
                ));
            }
        }

        log::debug!(
            "Loaded image: {}x{} pixels, format: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    fn validate_path(&self, path: &Path) -> Result<()> {
        let metadata = path.metadata()?;
        if metadata.len() == 0 {
            return Err(unreadable(path, "file is empty".to_string()));
        }

        Ok(())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn unreadable(path: &Path, reason: String) -> WatermarkError {
    WatermarkError::UnreadableImage {
        path: path.to_path_buf(),
        reason,
    }
}

// watermarker/src/processors/compressor.rs
use crate::core::{Result, WatermarkError};
use crate::utils::format_file_size;
use image::{DynamicImage, ImageFormat};
use oxipng::{optimize_from_memory, Options};
use std::io::Cursor;
use std::path::Path;

/// PNG encoder for watermarked output.
///
/// Output is always PNG regardless of the source format or the target file
/// name.
pub struct Compressor {
    optimize_png: bool,
}

impl Compressor {
    pub fn new() -> Self {
        Self {
            optimize_png: false,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    pub fn save_png(&self, image: &DynamicImage, path: &Path) -> Result<()> {
        log::debug!(
            "Saving PNG to {} (optimize: {})",
            path.display(),
            self.optimize_png
        );

        let data = self.encode_png(image)?;
        std::fs::write(path, &data)?;

        log::debug!(
            "Saved image: {} ({})",
            path.display(),
            format_file_size(data.len() as u64)
        );
        Ok(())
    }

    pub fn encode_png(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;

        if self.optimize_png {
            return self.optimize_png_bytes(&buffer.into_inner());
        }

        Ok(buffer.into_inner())
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        optimize_from_memory(data, &Options::default())
            .map_err(|e| WatermarkError::Encoding(format!("PNG optimization failed: {}", e)))
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

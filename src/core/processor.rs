// watermarker/src/core/processor.rs
use super::{Result, WatermarkConfig, WatermarkError};
use crate::processors::{Compressor, DateResolver, FontRenderer, Loader, PlacementEngine, TextRenderer};
use image::{DynamicImage, Rgba, RgbaImage};
use std::path::{Path, PathBuf};

/// Stamps one image with its date and writes the PNG result.
pub struct WatermarkApplier {
    config: WatermarkConfig,
    color: Rgba<u8>,
    loader: Loader,
    date_resolver: DateResolver,
    renderer: Box<dyn TextRenderer>,
    compressor: Compressor,
}

impl WatermarkApplier {
    pub fn new(config: WatermarkConfig, renderer: Box<dyn TextRenderer>) -> Result<Self> {
        config.validate()?;
        let color = config.color.to_rgba()?;
        let compressor = Compressor::new().with_png_optimization(config.optimize_png);

        Ok(Self {
            config,
            color,
            loader: Loader::new(),
            date_resolver: DateResolver::new(),
            renderer,
            compressor,
        })
    }

    /// Builds an applier that draws with `config.font_path`, or a bold
    /// sans-serif system font when no path is set.
    pub fn with_system_font(config: WatermarkConfig) -> Result<Self> {
        let renderer = FontRenderer::load(config.font_path.as_deref())?;
        Self::new(config, Box::new(renderer))
    }

    /// Watermarks `source` into `output_dir`, keeping the source file name.
    ///
    /// The written bytes are PNG even when the name ends in `.jpg`.
    pub fn apply(&self, source: &Path, output_dir: &Path) -> Result<PathBuf> {
        let file_name = source.file_name().ok_or_else(|| {
            WatermarkError::InvalidParameter(format!("Invalid file name: {}", source.display()))
        })?;

        let image = self.loader.load(source)?;
        let date = self.date_resolver.resolve(source);
        let stamped = self.stamp(&image, date.as_str());

        let output = if image.color().has_alpha() {
            DynamicImage::ImageRgba8(stamped)
        } else {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(stamped).to_rgb8())
        };

        let output_path = output_dir.join(file_name);
        self.compressor.save_png(&output, &output_path)?;

        Ok(output_path)
    }

    /// Draws `text` onto an RGBA copy of `image` at the configured anchor.
    pub fn stamp(&self, image: &DynamicImage, text: &str) -> RgbaImage {
        let mut canvas = image.to_rgba8();
        let font_size = self.config.font_size;

        let metrics = self.renderer.measure(text, font_size);
        // The loader caps dimensions well below i32::MAX.
        let origin = PlacementEngine::compute_origin(
            canvas.width() as i32,
            canvas.height() as i32,
            &metrics,
            font_size,
            self.config.anchor,
        );

        log::debug!(
            "Drawing {:?} at ({}, {}) anchored {}",
            text,
            origin.0,
            origin.1,
            self.config.anchor
        );

        self.renderer
            .draw(&mut canvas, text, font_size, origin, self.color);
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Anchor, Color, TextMetrics};
    use image::{GenericImageView, Rgb, RgbImage};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Records draw calls and marks the origin pixel.
    struct RecordingRenderer {
        calls: Rc<RefCell<Vec<(String, (i32, i32))>>>,
    }

    impl TextRenderer for RecordingRenderer {
        fn measure(&self, text: &str, _font_size: u32) -> TextMetrics {
            TextMetrics {
                width: 10 * text.len() as i32,
                ascent: 30,
                descent: 8,
                height: 40,
            }
        }

        fn draw(
            &self,
            canvas: &mut RgbaImage,
            text: &str,
            _font_size: u32,
            origin: (i32, i32),
            color: Rgba<u8>,
        ) {
            self.calls.borrow_mut().push((text.to_string(), origin));
            if let (Ok(x), Ok(y)) = (u32::try_from(origin.0), u32::try_from(origin.1)) {
                if x < canvas.width() && y < canvas.height() {
                    canvas.put_pixel(x, y, color);
                }
            }
        }
    }

    fn applier(anchor: Anchor) -> (WatermarkApplier, Rc<RefCell<Vec<(String, (i32, i32))>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let config = WatermarkConfig {
            font_size: 48,
            color: Color::new(255, 0, 0),
            anchor,
            ..Default::default()
        };
        let renderer = RecordingRenderer {
            calls: Rc::clone(&calls),
        };
        (WatermarkApplier::new(config, Box::new(renderer)).unwrap(), calls)
    }

    #[test]
    fn test_new_rejects_out_of_range_color() {
        let config = WatermarkConfig {
            color: Color::new(0, 0, 999),
            ..Default::default()
        };
        let renderer = RecordingRenderer {
            calls: Rc::new(RefCell::new(Vec::new())),
        };
        assert!(WatermarkApplier::new(config, Box::new(renderer)).is_err());
    }

    #[test]
    fn test_stamp_uses_placement() {
        let (applier, calls) = applier(Anchor::BottomRight);
        let image = DynamicImage::ImageRgb8(RgbImage::new(1000, 800));

        let stamped = applier.stamp(&image, "2021-03-15");

        // width 100, descent 8, margin 24
        assert_eq!(calls.borrow()[0], ("2021-03-15".to_string(), (876, 768)));
        assert_eq!(stamped.get_pixel(876, 768), &Rgba([255, 0, 0, 255]));
        assert_eq!(stamped.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_stamp_leaves_source_untouched() {
        let (applier, _calls) = applier(Anchor::TopLeft);
        let image = DynamicImage::ImageRgb8(RgbImage::new(100, 100));

        let stamped = applier.stamp(&image, "2021-03-15");

        assert_eq!(stamped.get_pixel(24, 30), &Rgba([255, 0, 0, 255]));
        assert_eq!(image.get_pixel(24, 30), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_apply_writes_png_under_original_name() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("beach.jpg");
        RgbImage::from_pixel(120, 90, Rgb([200, 200, 200]))
            .save(&source)
            .unwrap();
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        let (applier, calls) = applier(Anchor::Center);
        let written = applier.apply(&source, &out_dir).unwrap();

        assert_eq!(written, out_dir.join("beach.jpg"));
        let bytes = std::fs::read(&written).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        assert_eq!(
            image::guess_format(&bytes).unwrap(),
            image::ImageFormat::Png
        );

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (120, 90));
        assert!(!decoded.color().has_alpha());

        let (text, _) = &calls.borrow()[0];
        assert_eq!(text.len(), "YYYY-MM-DD".len());
    }

    #[test]
    fn test_apply_unreadable_image() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("corrupt.png");
        std::fs::write(&source, b"garbage bytes").unwrap();

        let (applier, calls) = applier(Anchor::Center);
        let result = applier.apply(&source, dir.path());

        assert!(matches!(result, Err(WatermarkError::UnreadableImage { .. })));
        assert!(calls.borrow().is_empty());
    }
}

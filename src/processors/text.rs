// watermarker/src/processors/text.rs
use crate::core::{Result, TextMetrics, WatermarkError};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use std::path::Path;

/// Text measurement and drawing used to stamp the watermark.
pub trait TextRenderer {
    fn measure(&self, text: &str, font_size: u32) -> TextMetrics;

    /// Draws `text` with its baseline starting at `origin`.
    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        font_size: u32,
        origin: (i32, i32),
        color: Rgba<u8>,
    );
}

// Families tried in order when the system's generic sans-serif mapping
// points at a font that isn't installed.
const SANS_SERIF_FALLBACKS: [&str; 5] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Helvetica",
    "Arial",
    "Noto Sans",
];

/// Renders with a single outline font, anti-aliased.
pub struct FontRenderer {
    font: FontVec,
}

impl FontRenderer {
    /// Uses `font_path` when given, otherwise a bold sans-serif system face.
    pub fn load(font_path: Option<&Path>) -> Result<Self> {
        match font_path {
            Some(path) => Self::from_file(path),
            None => Self::from_system(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let font = FontVec::try_from_vec(data).map_err(|_| {
            WatermarkError::Font(format!("Failed to parse font: {}", path.display()))
        })?;

        log::debug!("Loaded font from {}", path.display());
        Ok(Self { font })
    }

    pub fn from_system() -> Result<Self> {
        let mut db = Database::new();
        db.load_system_fonts();

        let mut families = vec![Family::SansSerif];
        families.extend(SANS_SERIF_FALLBACKS.iter().map(|name| Family::Name(*name)));

        let query = Query {
            families: &families,
            weight: Weight::BOLD,
            stretch: Stretch::Normal,
            style: Style::Normal,
        };

        let id = db
            .query(&query)
            .or_else(|| db.faces().next().map(|face| face.id))
            .ok_or_else(|| WatermarkError::Font("No system fonts found".to_string()))?;

        let font = db
            .with_face_data(id, |data, index| {
                FontVec::try_from_vec_and_index(data.to_vec(), index)
            })
            .ok_or_else(|| WatermarkError::Font("Failed to load system font data".to_string()))?
            .map_err(|_| WatermarkError::Font("Failed to parse system font".to_string()))?;

        if let Some(face) = db.face(id) {
            log::debug!(
                "Using system font {:?} (weight {})",
                face.families.first().map(|(name, _)| name.as_str()),
                face.weight.0
            );
        }

        Ok(Self { font })
    }

    /// Scale whose em square is exactly `font_size` pixels.
    fn scale(&self, font_size: u32) -> PxScale {
        em_scale(&self.font, font_size as f32)
    }
}

// ab_glyph scales by `ascent - descent`, not by the em size.
fn em_scale(font: &impl Font, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if units_per_em > 0.0 => {
            PxScale::from(size * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(size),
    }
}

// Absorbs f32 noise so exact whole-pixel metrics don't round up.
fn ceil_px(value: f32) -> i32 {
    (value - 1e-3).ceil() as i32
}

impl TextRenderer for FontRenderer {
    fn measure(&self, text: &str, font_size: u32) -> TextMetrics {
        let scaled = self.font.as_scaled(self.scale(font_size));

        let mut width = 0.0f32;
        let mut previous = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }

        let ascent = ceil_px(scaled.ascent());
        let descent = ceil_px(-scaled.descent());
        let line_gap = ceil_px(scaled.line_gap().max(0.0));

        TextMetrics {
            width: width.round() as i32,
            ascent,
            descent,
            height: ascent + descent + line_gap,
        }
    }

    fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        font_size: u32,
        origin: (i32, i32),
        color: Rgba<u8>,
    ) {
        let scale = self.scale(font_size);
        let ascent = ceil_px(self.font.as_scaled(scale).ascent());

        // imageproc positions text by the top of the line box.
        draw_text_mut(
            canvas,
            color,
            origin.0,
            origin.1 - ascent,
            scale,
            &self.font,
            text,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system_renderer() -> Option<FontRenderer> {
        match FontRenderer::from_system() {
            Ok(renderer) => Some(renderer),
            Err(e) => {
                eprintln!("skipping: {}", e);
                None
            }
        }
    }

    #[test]
    fn test_missing_font_file() {
        let result = FontRenderer::from_file(Path::new("no/such/font.ttf"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_font_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bogus.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        assert!(matches!(
            FontRenderer::from_file(&path),
            Err(WatermarkError::Font(_))
        ));
    }

    #[test]
    fn test_measure_scales_with_font_size() {
        let Some(renderer) = system_renderer() else {
            return;
        };

        let small = renderer.measure("2021-03-15", 24);
        let large = renderer.measure("2021-03-15", 48);

        assert!(small.width > 0);
        assert!(small.ascent > 0);
        assert!(small.height >= small.ascent + small.descent);
        assert!(large.width > small.width);
        assert!(large.ascent > small.ascent);
    }

    #[test]
    fn test_font_size_is_em_size_in_pixels() {
        let Some(renderer) = system_renderer() else {
            return;
        };
        let font = &renderer.font;
        let units_per_em = font.units_per_em().unwrap();

        let metrics = renderer.measure("2021-03-15", 48);
        let expected_ascent = ceil_px(48.0 * font.ascent_unscaled() / units_per_em);
        let expected_descent = ceil_px(48.0 * -font.descent_unscaled() / units_per_em);
        assert_eq!(metrics.ascent, expected_ascent);
        assert_eq!(metrics.descent, expected_descent);

        // A glyph advance never exceeds a couple of ems.
        assert!(metrics.width < 10 * 48 * 2);
        let scale = renderer.scale(48);
        assert!((scale.y * units_per_em / font.height_unscaled() - 48.0).abs() < 1e-3);
    }

    #[test]
    fn test_ceil_px_tolerates_float_noise() {
        assert_eq!(ceil_px(36.000_002), 36);
        assert_eq!(ceil_px(44.55), 45);
        assert_eq!(ceil_px(0.0), 0);
    }

    #[test]
    fn test_draw_changes_pixels_in_color() {
        let Some(renderer) = system_renderer() else {
            return;
        };

        let mut canvas = RgbaImage::from_pixel(200, 80, Rgba([0, 0, 0, 255]));
        let metrics = renderer.measure("2021", 32);
        renderer.draw(&mut canvas, "2021", 32, (10, 10 + metrics.ascent), Rgba([255, 0, 0, 255]));

        let touched = canvas.pixels().filter(|p| p[0] > 0).count();
        assert!(touched > 0);
        assert!(canvas.pixels().all(|p| p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn test_draw_out_of_frame_is_harmless() {
        let Some(renderer) = system_renderer() else {
            return;
        };

        let mut canvas = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        renderer.draw(&mut canvas, "2021-03-15", 48, (-500, -500), Rgba([255, 255, 255, 255]));
        assert!(canvas.pixels().all(|p| p[0] == 0));
    }
}

// watermarker/src/processors/placement.rs
use crate::core::{Anchor, TextMetrics};

/// Integer text placement on a canvas.
///
/// Origins are baseline origins: `x` is where the first glyph starts and `y`
/// is the text baseline, both measured from the top-left corner of the
/// canvas with `y` growing downwards. Results are never clamped, so text
/// larger than the canvas yields negative or out-of-frame coordinates.
pub struct PlacementEngine;

impl PlacementEngine {
    /// Padding used by the corner anchors: half the font size, rounded down.
    pub fn margin(font_size: u32) -> i32 {
        (font_size / 2) as i32
    }

    pub fn compute_origin(
        canvas_width: i32,
        canvas_height: i32,
        text: &TextMetrics,
        font_size: u32,
        anchor: Anchor,
    ) -> (i32, i32) {
        let margin = Self::margin(font_size);

        match anchor {
            Anchor::TopLeft => (margin, text.ascent),
            // `/` truncates toward zero, same as the reference geometry.
            Anchor::Center => (
                (canvas_width - text.width) / 2,
                (canvas_height - text.height) / 2 + text.ascent,
            ),
            Anchor::BottomRight => (
                canvas_width - text.width - margin,
                canvas_height - text.descent - margin,
            ),
        }
    }
}

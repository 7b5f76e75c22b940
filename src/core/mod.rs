// watermarker/src/core/mod.rs
pub mod color;
pub mod processor;

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub use color::{Color, ColorError};

/// Named placement of the watermark on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
    BottomRight,
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Anchor::TopLeft => "TOP_LEFT",
            Anchor::Center => "CENTER",
            Anchor::BottomRight => "BOTTOM_RIGHT",
        };
        f.write_str(name)
    }
}

/// A calendar date rendered as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DateString(String);

impl DateString {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DateString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Pixel measurements of a run of text at a given font size.
///
/// `height` is the full line height (`ascent + descent + line gap`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: i32,
    pub ascent: i32,
    pub descent: i32,
    pub height: i32,
}

#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    pub font_size: u32,
    pub color: Color,
    pub anchor: Anchor,
    pub font_path: Option<PathBuf>,
    pub optimize_png: bool,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: 48,
            color: Color::WHITE,
            anchor: Anchor::BottomRight,
            font_path: None,
            optimize_png: false,
        }
    }
}

impl WatermarkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.font_size == 0 {
            return Err(WatermarkError::InvalidParameter(
                "Font size must be at least 1".to_string(),
            ));
        }

        if self.font_size > 10_000 {
            return Err(WatermarkError::InvalidParameter(
                "Font size too large (max 10,000 pixels)".to_string(),
            ));
        }

        if let Some(path) = &self.font_path {
            if !path.is_file() {
                return Err(WatermarkError::Font(format!(
                    "Font file does not exist: {}",
                    path.display()
                )));
            }
        }

        self.color.to_rgba()?;

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Success,
    Skipped(String),
    Failed(String),
}

/// Per-file results of one batch run, in processing order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub output_dir: PathBuf,
    pub outcomes: Vec<(String, BatchOutcome)>,
}

impl BatchReport {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, file_name: impl Into<String>, outcome: BatchOutcome) {
        self.outcomes.push((file_name.into(), outcome));
    }

    pub fn success_count(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Success))
    }

    pub fn failure_count(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Failed(_)))
    }

    pub fn skipped_count(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Skipped(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|(name, outcome)| match outcome {
            BatchOutcome::Failed(reason) => Some((name.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn outcome_for(&self, file_name: &str) -> Option<&BatchOutcome> {
        self.outcomes
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, outcome)| outcome)
    }

    fn count(&self, pred: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

#[derive(Error, Debug)]
pub enum WatermarkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Provided path is not a directory: {}", .0.display())]
    InvalidInputDirectory(PathBuf),

    #[error("Could not create output directory {}: {source}", .path.display())]
    OutputDirCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not list directory {}: {source}", .path.display())]
    DirectoryListing {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid color: {0}")]
    InvalidColor(#[from] ColorError),

    #[error("Unreadable image {}: {reason}", .path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    #[error("Font error: {0}")]
    Font(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

pub type Result<T> = std::result::Result<T, WatermarkError>;

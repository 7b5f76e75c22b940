// watermarker/src/cli.rs
use crate::core::Anchor;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "watermarker",
    version,
    about = "Adds a date watermark to images based on EXIF data."
)]
pub struct Cli {
    /// The directory containing images to watermark.
    pub input_dir: PathBuf,

    /// Font size of the watermark text.
    #[arg(short = 's', long, default_value_t = 48, value_parser = clap::value_parser!(u32).range(1..))]
    pub font_size: u32,

    /// Color of the watermark text in R,G,B format.
    #[arg(short, long, default_value = "255,255,255")]
    pub color: String,

    /// Position of the watermark.
    #[arg(short, long, value_enum, default_value_t = Position::BottomRight)]
    pub position: Position,

    /// TrueType/OpenType font to use instead of the system sans-serif.
    #[arg(short, long)]
    pub font: Option<PathBuf>,

    /// Losslessly recompress output PNGs.
    #[arg(long)]
    pub optimize: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    #[value(name = "TOP_LEFT")]
    TopLeft,
    #[value(name = "CENTER")]
    Center,
    #[value(name = "BOTTOM_RIGHT")]
    BottomRight,
}

impl From<Position> for Anchor {
    fn from(position: Position) -> Self {
        match position {
            Position::TopLeft => Anchor::TopLeft,
            Position::Center => Anchor::Center,
            Position::BottomRight => Anchor::BottomRight,
        }
    }
}

// watermarker/src/core/color.rs
use image::Rgba;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("expected 3 comma-separated components (R,G,B), got {0}")]
    WrongArity(usize),

    #[error("component {0:?} is not an integer")]
    NotANumber(String),

    #[error("component {channel} = {value} is outside 0..=255")]
    OutOfRange { channel: char, value: i32 },
}

/// Watermark color as parsed from `R,G,B` text.
///
/// Parsing accepts any integers. The 0..=255 check only happens in
/// [`Color::to_rgba`], when the value is about to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: i32,
    pub g: i32,
    pub b: i32,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: i32, g: i32, b: i32) -> Self {
        Self { r, g, b }
    }

    pub fn parse(text: &str) -> Result<Self, ColorError> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 3 {
            return Err(ColorError::WrongArity(parts.len()));
        }

        let component = |raw: &str| -> Result<i32, ColorError> {
            let raw = raw.trim();
            raw.parse::<i32>()
                .map_err(|_| ColorError::NotANumber(raw.to_string()))
        };

        Ok(Self {
            r: component(parts[0])?,
            g: component(parts[1])?,
            b: component(parts[2])?,
        })
    }

    pub fn to_rgba(&self) -> Result<Rgba<u8>, ColorError> {
        let to_u8 = |channel: char, value: i32| {
            u8::try_from(value).map_err(|_| ColorError::OutOfRange { channel, value })
        };

        Ok(Rgba([
            to_u8('R', self.r)?,
            to_u8('G', self.g)?,
            to_u8('B', self.b)?,
            255,
        ]))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

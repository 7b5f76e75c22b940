pub mod cli;
mod core;
mod processors;
mod utils;

pub use cli::{Cli, Position};
pub use crate::core::processor::WatermarkApplier;
pub use crate::core::{
    Anchor, BatchOutcome, BatchReport, Color, ColorError, DateString, Result,
    TextMetrics, WatermarkConfig, WatermarkError,
};
pub use crate::processors::{
    capture_date, parse_exif_datetime, BatchRunner, Compressor, DateResolver, FontRenderer, Loader,
    MetadataDate, PlacementEngine, TextRenderer,
};
pub use crate::utils::{format_file_size, is_supported_image_name, output_dir_for, SUPPORTED_EXTENSIONS};

pub mod prelude {
    pub use crate::{
        Anchor, BatchRunner, Color, DateResolver, PlacementEngine, TextRenderer, WatermarkApplier,
        WatermarkConfig,
    };
}

// Re-export commonly used types
pub use image::{DynamicImage, Rgba, RgbaImage};

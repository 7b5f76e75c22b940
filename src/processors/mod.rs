// watermarker/src/processors/mod.rs
mod batch;
mod compressor;
mod loader;
mod metadata;
mod placement;
mod text;

pub use batch::BatchRunner;
pub use compressor::Compressor;
pub use loader::Loader;
pub use metadata::{capture_date, parse_exif_datetime, DateResolver, MetadataDate};
pub use placement::PlacementEngine;
pub use text::{FontRenderer, TextRenderer};


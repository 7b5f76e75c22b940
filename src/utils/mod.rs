// watermarker/src/utils/mod.rs
use std::path::{Path, PathBuf};

pub const SUPPORTED_EXTENSIONS: [&str; 3] = [".jpg", ".jpeg", ".png"];

pub const OUTPUT_DIR_SUFFIX: &str = "_watermark";

/// Case-insensitive suffix match against [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_image_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Output directory for a batch: nested inside `input_dir` and named after
/// its last path component as given, e.g. `photos/photos_watermark`.
///
/// Only inputs without a final name (`.`, `..`) are resolved first, so a
/// symlinked directory keeps the link's own name.
pub fn output_dir_for(input_dir: &Path) -> PathBuf {
    if let Some(name) = input_dir.file_name() {
        return input_dir.join(format!("{}{}", name.to_string_lossy(), OUTPUT_DIR_SUFFIX));
    }

    let resolved = std::fs::canonicalize(input_dir).unwrap_or_else(|_| input_dir.to_path_buf());
    let base = resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    resolved.join(format!("{}{}", base, OUTPUT_DIR_SUFFIX))
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let base = 1024_f64;
    let bytes_f64 = bytes as f64;
    let exponent = ((bytes_f64.log10() / base.log10()).floor() as usize).min(UNITS.len() - 1);
    let size = bytes_f64 / base.powi(exponent as i32);

    format!("{:.2} {}", size, UNITS[exponent])
}

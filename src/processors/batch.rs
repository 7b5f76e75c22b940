use crate::core::processor::WatermarkApplier;
use crate::core::{BatchOutcome, BatchReport, Result, WatermarkError};
use crate::utils::{is_supported_image_name, output_dir_for};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Watermarks every supported image directly inside a directory.
///
/// Files are processed one after another. A failure on one file is logged
/// and recorded in the report; it never stops the rest of the batch.
pub struct BatchRunner {
    applier: WatermarkApplier,
    show_progress: bool,
}

/// Directory entries sorted by name: everything seen, the regular image
/// files to stamp, and image-named entries that are not regular files.
#[derive(Debug, Default)]
struct Candidates {
    listed: Vec<String>,
    files: Vec<PathBuf>,
    skipped: Vec<String>,
}

impl BatchRunner {
    pub fn new(applier: WatermarkApplier) -> Self {
        Self {
            applier,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn run(&self, input_dir: &Path) -> Result<BatchReport> {
        Self::validate_input_dir(input_dir)?;

        let output_dir = Self::prepare_output_dir(input_dir)?;
        log::info!("Output directory: {}", output_dir.display());

        let candidates = Self::collect_candidates(input_dir)?;

        let mut report = BatchReport::new(output_dir.clone());
        for name in candidates.skipped {
            log::debug!("Skipping {}: not a regular file", name);
            report.record(name, BatchOutcome::Skipped("not a regular file".to_string()));
        }

        if candidates.files.is_empty() {
            log::info!(
                "No supported image files found in {}",
                input_dir.display()
            );
            return Ok(report);
        }

        log::info!(
            "Watermarking {} images from {}",
            candidates.files.len(),
            input_dir.display()
        );

        let pb = self.create_progress_bar(candidates.files.len());

        for path in &candidates.files {
            let name = file_name_of(path);
            pb.set_message(name.clone());

            let outcome = match self.applier.apply(path, &output_dir) {
                Ok(_) => {
                    log::info!("Watermarked: {}", name);
                    BatchOutcome::Success
                }
                Err(e) => {
                    log::error!("Failed to watermark {}: {}", name, e);
                    BatchOutcome::Failed(e.to_string())
                }
            };

            report.record(name, outcome);
            pb.inc(1);
        }

        pb.finish_with_message(format!(
            "Watermarked {} of {} images",
            report.success_count(),
            candidates.files.len()
        ));

        Ok(report)
    }

    pub fn validate_input_dir(input_dir: &Path) -> Result<()> {
        if !input_dir.is_dir() {
            return Err(WatermarkError::InvalidInputDirectory(
                input_dir.to_path_buf(),
            ));
        }

        Ok(())
    }

    /// Creates `<input_dir>/<input base name>_watermark`.
    fn prepare_output_dir(input_dir: &Path) -> Result<PathBuf> {
        let output_dir = output_dir_for(input_dir);

        std::fs::create_dir_all(&output_dir).map_err(|source| {
            WatermarkError::OutputDirCreation {
                path: output_dir.clone(),
                source,
            }
        })?;

        Ok(output_dir)
    }

    fn collect_candidates(input_dir: &Path) -> Result<Candidates> {
        let walker = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        let mut candidates = Candidates::default();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                // The directory itself could not be read.
                Err(e) if e.depth() == 0 => {
                    return Err(WatermarkError::DirectoryListing {
                        path: input_dir.to_path_buf(),
                        source: e,
                    })
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable entry: {}", e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            log::debug!("Found entry: {}", name);
            candidates.listed.push(name.clone());

            if !is_supported_image_name(&name) {
                continue;
            }

            if entry.file_type().is_file() {
                candidates.files.push(entry.into_path());
            } else {
                candidates.skipped.push(name);
            }
        }

        log::debug!(
            "Listed {} entries in {}",
            candidates.listed.len(),
            input_dir.display()
        );

        Ok(candidates)
    }

    fn create_progress_bar(&self, total: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_candidates_lists_every_entry() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("photo.jpg"), b"jpeg").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();
        std::fs::write(dir.path().join("Scan.PNG"), b"png").unwrap();
        std::fs::create_dir(dir.path().join("album.png")).unwrap();

        let candidates = BatchRunner::collect_candidates(dir.path()).unwrap();

        assert_eq!(
            candidates.listed,
            vec!["Scan.PNG", "album.png", "notes.txt", "photo.jpg"]
        );
        assert_eq!(
            candidates.files,
            vec![dir.path().join("Scan.PNG"), dir.path().join("photo.jpg")]
        );
        assert_eq!(candidates.skipped, vec!["album.png"]);
    }

    #[test]
    fn test_collect_candidates_empty_directory() {
        let dir = TempDir::new().unwrap();

        let candidates = BatchRunner::collect_candidates(dir.path()).unwrap();

        assert!(candidates.listed.is_empty());
        assert!(candidates.files.is_empty());
        assert!(candidates.skipped.is_empty());
    }

    #[test]
    fn test_collect_candidates_unreadable_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        assert!(matches!(
            BatchRunner::collect_candidates(&missing),
            Err(WatermarkError::DirectoryListing { .. })
        ));
    }
}

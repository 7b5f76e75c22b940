// watermarker/src/processors/metadata.rs
use crate::core::DateString;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use exif::{Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::SystemTime;

/// Result of looking for a capture date in embedded metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataDate {
    Found(DateString),
    Missing,
    Unreadable(String),
}

/// Picks the date stamped onto an image.
///
/// The EXIF `DateTimeOriginal` tag wins when it can be read and parsed.
/// Anything else falls back to the file modification time, so
/// [`DateResolver::resolve`] always produces a date.
#[derive(Debug, Clone, Default)]
pub struct DateResolver;

impl DateResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, path: &Path) -> DateString {
        match self.metadata_date(path) {
            MetadataDate::Found(date) => {
                log::debug!("Using EXIF capture date {} for {}", date, path.display());
                return date;
            }
            MetadataDate::Missing => {
                log::warn!(
                    "No EXIF capture date in {}. Using file modification date.",
                    display_name(path)
                );
            }
            MetadataDate::Unreadable(reason) => {
                log::warn!(
                    "Could not read EXIF date for {} ({}). Using file modification date.",
                    display_name(path),
                    reason
                );
            }
        }

        self.modified_date(path)
    }

    pub fn metadata_date(&self, path: &Path) -> MetadataDate {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return MetadataDate::Unreadable(e.to_string()),
        };
        let mut bufreader = BufReader::new(&file);

        match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => capture_date(&exif),
            Err(exif::Error::NotFound(_)) => MetadataDate::Missing,
            Err(e) => MetadataDate::Unreadable(e.to_string()),
        }
    }

    pub fn modified_date(&self, path: &Path) -> DateString {
        let modified = std::fs::metadata(path)
            .and_then(|meta| meta.modified())
            .unwrap_or_else(|e| {
                log::warn!(
                    "Could not read modification time of {}: {}",
                    path.display(),
                    e
                );
                SystemTime::UNIX_EPOCH
            });

        let local: DateTime<Local> = modified.into();
        DateString::from_date(local.date_naive())
    }
}

/// Extracts `DateTimeOriginal` from already-parsed EXIF data.
pub fn capture_date(exif: &Exif) -> MetadataDate {
    let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
        return MetadataDate::Missing;
    };

    let raw = match &field.value {
        Value::Ascii(values) => match values.first() {
            Some(raw) => raw,
            None => return MetadataDate::Missing,
        },
        other => {
            return MetadataDate::Unreadable(format!(
                "DateTimeOriginal has unexpected type {:?}",
                other
            ))
        }
    };

    let text = String::from_utf8_lossy(raw);
    match parse_exif_datetime(&text) {
        // EXIF timestamps carry no zone; they are wall-clock time where the
        // photo was taken, so the local calendar date is the naive date.
        Some(timestamp) => MetadataDate::Found(DateString::from_date(timestamp.date())),
        None => MetadataDate::Unreadable(format!("unparseable DateTimeOriginal {:?}", text)),
    }
}

// Layouts seen in the wild for DateTimeOriginal, most common first.
const DATETIME_FORMATS: [&str; 8] = [
    "%Y:%m:%d %H:%M:%S",
    "%Y:%m:%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y:%m:%d"];

pub fn parse_exif_datetime(text: &str) -> Option<NaiveDateTime> {
    let cleaned = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    let cleaned = strip_subseconds(cleaned);

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(cleaned, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(cleaned, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Drops a `.fff` fraction following the seconds field.
fn strip_subseconds(text: &str) -> &str {
    let Some(colon) = text.rfind(':') else {
        return text;
    };
    let tail = &text[colon + 1..];

    match tail.find('.') {
        Some(2) if tail[..2].bytes().all(|b| b.is_ascii_digit()) => &text[..colon + 3],
        _ => text,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

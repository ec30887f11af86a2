use super::FileMetadataReport;
use crate::{Error, Result};
use chrono::{DateTime, Local};
use exif::{Context, Exif, Field, In, Value};
use image::ImageReader;
use std::{
    fs::{self, File, Metadata},
    io::BufReader,
    path::Path,
    time::SystemTime,
};
use tracing::{debug, error, warn};

/// Lower-cased extensions that get the EXIF and image property sections.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".tiff", ".heic", ".png"];

/// Tags carrying binary blobs or file-system noise rather than descriptive data.
pub const EXCLUDED_EXIF_TAGS: &[&str] =
    &["JPEGThumbnail", "TIFFThumbnail", "Filename", "EXIF MakerNote"];

pub const MAX_EXIF_VALUE_CHARS: usize = 100;
pub const ELLIPSIS: &str = "...";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Builds a [`FileMetadataReport`] for a single file.
///
/// Line order is fixed: name, size, modified, created, then for images the
/// EXIF section followed by the image properties section. The report ends up
/// verbatim in the prompt, so the order matters.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    excluded_tags: Vec<String>,
    max_value_chars: usize,
}

impl MetadataExtractor {
    pub fn new(excluded_tags: Vec<String>, max_value_chars: usize) -> Self {
        Self {
            excluded_tags,
            max_value_chars,
        }
    }

    pub fn extract(&self, path: &Path) -> Result<FileMetadataReport> {
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }

        let stat = fs::metadata(path).map_err(|e| {
            error!("Error getting metadata for {}: {}", path.display(), e);
            Error::metadata(e.to_string())
        })?;

        let mut report = FileMetadataReport::new();
        self.append_file_attributes(path, &stat, &mut report)?;

        if is_image(path) {
            self.append_exif(path, &mut report);
            append_image_properties(path, &mut report);
        }

        Ok(report)
    }

    fn append_file_attributes(
        &self,
        path: &Path,
        stat: &Metadata,
        report: &mut FileMetadataReport,
    ) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        report.push(format!("File Name: {}", name));
        report.push(format!("File Size: {} bytes", stat.len()));

        let modified = stat.modified().map_err(|e| {
            error!("Error reading modification time of {}: {}", path.display(), e);
            Error::metadata(e.to_string())
        })?;
        report.push(format!("Last Modified: {}", format_timestamp(modified)));

        match stat.created() {
            Ok(created) => report.push(format!("Created Date: {}", format_timestamp(created))),
            Err(e) => match status_change_time(stat) {
                Some(changed) => report.push(format!("Created Date (ctime): {}", changed)),
                None => debug!("Creation time unavailable for {}: {}", path.display(), e),
            },
        }

        Ok(())
    }

    fn append_exif(&self, path: &Path, report: &mut FileMetadataReport) {
        match read_exif(path) {
            Ok(Some(exif)) if exif.fields().next().is_some() => {
                // The header stays even when every tag is excluded.
                report.push("EXIF Data:");
                for line in exif.fields().filter_map(|field| self.exif_line(&exif, field)) {
                    report.push(line);
                }
            }
            Ok(_) => report.push("No EXIF data found."),
            Err(e) => {
                warn!("Could not read EXIF data from {}: {}", path.display(), e);
                report.push(format!("Could not read EXIF data: {}", e));
            }
        }
    }

    fn exif_line(&self, exif: &Exif, field: &Field) -> Option<String> {
        let name = exif_tag_name(field);
        if self.excluded_tags.iter().any(|excluded| *excluded == name) {
            return None;
        }
        let value = exif_value(exif, field);
        Some(format!(
            "  - {}: {}",
            name,
            truncate_value(&value, self.max_value_chars)
        ))
    }
}

impl Default for MetadataExtractor {
    fn default() -> Self {
        Self::new(
            EXCLUDED_EXIF_TAGS.iter().map(|t| t.to_string()).collect(),
            MAX_EXIF_VALUE_CHARS,
        )
    }
}

/// Whether `path` has one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Cuts `value` to `max_chars` characters and marks the cut with [`ELLIPSIS`].
pub fn truncate_value(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// `Ok(None)` when the container holds no EXIF block at all.
fn read_exif(path: &Path) -> std::result::Result<Option<Exif>, exif::Error> {
    let file = File::open(path).map_err(exif::Error::Io)?;
    let mut reader = BufReader::new(file);
    match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => Ok(Some(exif)),
        Err(exif::Error::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Group-qualified tag name, e.g. `Image Make` or `EXIF ExposureTime`.
fn exif_tag_name(field: &Field) -> String {
    let group = match field.tag.context() {
        Context::Tiff if field.ifd_num == In::PRIMARY => "Image".to_string(),
        Context::Tiff if field.ifd_num == In::THUMBNAIL => "Thumbnail".to_string(),
        Context::Tiff => format!("IFD{}", field.ifd_num.index()),
        Context::Exif => "EXIF".to_string(),
        Context::Gps => "GPS".to_string(),
        _ => "Interoperability".to_string(),
    };
    format!("{} {}", group, field.tag)
}

/// ASCII values are taken as stored, without the quotes `display_value` adds.
fn exif_value(exif: &Exif, field: &Field) -> String {
    match &field.value {
        Value::Ascii(parts) => parts
            .iter()
            .map(|part| String::from_utf8_lossy(part))
            .collect::<Vec<_>>()
            .join(", "),
        _ => field.display_value().with_unit(exif).to_string(),
    }
}

fn append_image_properties(path: &Path, report: &mut FileMetadataReport) {
    match read_image_properties(path) {
        Ok((width, height, format)) => {
            report.push(format!("Image Dimensions: {}x{}", width, height));
            report.push(format!("Image Format: {}", format));
        }
        Err(e) => {
            warn!("Could not read image properties of {}: {}", path.display(), e);
            report.push(format!("Could not read image properties: {}", e));
        }
    }
}

fn read_image_properties(path: &Path) -> std::result::Result<(u32, u32, String), String> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| e.to_string())?;
    let format = reader
        .format()
        .ok_or_else(|| "unrecognized image format".to_string())?;
    let (width, height) = reader.into_dimensions().map_err(|e| e.to_string())?;
    Ok((width, height, format!("{:?}", format).to_uppercase()))
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(unix)]
fn status_change_time(stat: &Metadata) -> Option<String> {
    use std::os::unix::fs::MetadataExt;

    DateTime::from_timestamp(stat.ctime(), stat.ctime_nsec() as u32)
        .map(|t| t.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string())
}

#[cfg(not(unix))]
fn status_change_time(_stat: &Metadata) -> Option<String> {
    None
}

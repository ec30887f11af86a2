mod extractor;
mod report;

pub use extractor::{
    ELLIPSIS, EXCLUDED_EXIF_TAGS, IMAGE_EXTENSIONS, MAX_EXIF_VALUE_CHARS, MetadataExtractor,
    is_image, truncate_value,
};
pub use report::FileMetadataReport;

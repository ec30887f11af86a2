use super::mocks::MockGenerator;
use exif::experimental::Writer;
use exif::{Field, In, Tag, Value};
use filechat::{llm::EngineManager, query::QueryOrchestrator};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Create a temporary data root
pub fn create_data_root() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write a plain file below `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Write a black RGB PNG of the given size; PNGs written this way carry no EXIF
pub fn write_png(root: &Path, relative: &str, width: u32, height: u32) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    image::RgbImage::new(width, height).save(&path).unwrap();
    path
}

/// Write a bare TIFF structure holding only the given primary-IFD ASCII tags
pub fn write_exif_tiff(root: &Path, relative: &str, tags: &[(Tag, &str)]) -> PathBuf {
    let fields: Vec<Field> = tags
        .iter()
        .map(|(tag, value)| Field {
            tag: *tag,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![value.as_bytes().to_vec()]),
        })
        .collect();

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut buf = Cursor::new(Vec::new());
    writer.write(&mut buf, false).unwrap();

    write_file(root, relative, &buf.into_inner())
}

/// Ready engine backed by `generator`
pub fn ready_engine(generator: MockGenerator) -> Arc<EngineManager> {
    Arc::new(EngineManager::ready(Box::new(generator)))
}

/// Engine that never loaded
pub fn failed_engine() -> Arc<EngineManager> {
    Arc::new(EngineManager::failed("model artifact missing"))
}

pub fn orchestrator(engine: Arc<EngineManager>, root: &Path) -> QueryOrchestrator {
    QueryOrchestrator::new(engine, root)
}

use std::fmt;

/// Ordered `key: value` lines describing one file, built fresh per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileMetadataReport {
    lines: Vec<String>,
}

impl FileMetadataReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for FileMetadataReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

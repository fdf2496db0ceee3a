//! Timeline stored as a single JSON array document.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::backend::TimelineBackend;
use crate::entry::TimelineEntry;
use crate::error::TimelineError;

/// A persistent timeline kept in one JSON file.
///
/// Every append rewrites the document through a temporary file in the same
/// directory followed by a rename, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl TimelineBackend for JsonFileBackend {
    type Error = TimelineError;

    fn load(&self) -> Result<Vec<TimelineEntry>, Self::Error> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn append(&mut self, history: &[TimelineEntry]) -> Result<(), Self::Error> {
        let dir = self.directory();
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer(&mut file, history)?;
        file.flush()?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }
}

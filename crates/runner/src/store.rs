//! Persistence of the last delivered revision.
//!
//! The marker is the only state that outlives a run. It is read once at
//! the start of a run and written only after delivery succeeded.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use svitlo_core::Fingerprint;

use crate::error::StoreError;

pub trait RevisionStore: Send + Sync {
    /// Last delivered fingerprint, `None` if nothing was delivered yet.
    /// A delivered feed without a hash reads back as the empty fingerprint.
    fn read(&self) -> Result<Option<Fingerprint>, StoreError>;

    fn write(&self, fingerprint: &Fingerprint) -> Result<(), StoreError>;
}

impl<T: RevisionStore + ?Sized> RevisionStore for Arc<T> {
    fn read(&self) -> Result<Option<Fingerprint>, StoreError> {
        (**self).read()
    }

    fn write(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        (**self).write(fingerprint)
    }
}

/// Marker kept in a small text file. Only a missing file means "no marker";
/// an empty file holds the empty fingerprint.
#[derive(Debug)]
pub struct FileRevisionStore {
    path: PathBuf,
}

impl FileRevisionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl RevisionStore for FileRevisionStore {
    fn read(&self) -> Result<Option<Fingerprint>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(Fingerprint::new(contents.trim()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Writes through a sibling temp file so a crash never leaves a
    /// truncated marker behind.
    fn write(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, fingerprint.as_str()).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;
        tracing::debug!(path = %self.path.display(), "Revision marker written");
        Ok(())
    }
}

/// In-process marker, for tests and one-shot tooling.
#[derive(Debug, Default)]
pub struct MemoryRevisionStore {
    marker: Mutex<Option<Fingerprint>>,
}

impl MemoryRevisionStore {
    pub fn new(initial: Option<Fingerprint>) -> Self {
        Self {
            marker: Mutex::new(initial),
        }
    }

    pub fn current(&self) -> Option<Fingerprint> {
        self.marker.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl RevisionStore for MemoryRevisionStore {
    fn read(&self) -> Result<Option<Fingerprint>, StoreError> {
        Ok(self.current())
    }

    fn write(&self, fingerprint: &Fingerprint) -> Result<(), StoreError> {
        *self.marker.lock().unwrap_or_else(|e| e.into_inner()) = Some(fingerprint.clone());
        Ok(())
    }
}

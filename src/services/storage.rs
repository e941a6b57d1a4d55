//! Persistence adapter for the DSM document
//!
//! The document lives under a single key. `read` distinguishes "never
//! written" (`Ok(None)`) from "written but unreadable", which the store
//! treats differently at startup.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the single key the document is stored under
pub const STORAGE_KEY: &str = "dsm-editor-data";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Key-value backing for one document
pub trait Storage {
    /// Read the stored document, `None` if nothing was ever written
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored document
    fn write(&mut self, contents: &str) -> Result<(), StorageError>;
}

/// Document stored as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// File storage named after [`STORAGE_KEY`] inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{}.json", STORAGE_KEY)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        // Write beside the target and rename over it so a reader never sees half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, contents).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        Ok(())
    }
}

/// In-memory storage; clones share the same slot
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: std::rc::Rc<std::cell::RefCell<Option<String>>>,
    writes: std::rc::Rc<std::cell::Cell<usize>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_contents(contents: &str) -> Self {
        let storage = Self::default();
        *storage.slot.borrow_mut() = Some(contents.to_string());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&mut self, contents: &str) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(contents.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

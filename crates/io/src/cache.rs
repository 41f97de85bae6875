//! Normalized record sets cached by source-file identity.
//!
//! Identity is the canonical path plus the file's modification time and
//! length. An entry is reused until either changes; the cached set itself is
//! never mutated.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use log::debug;

use liftboard_records::Record;

use crate::csv::{load_records, TextEncoding};
use crate::error::IoError;

/// Modification signal for a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSignature {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl FileSignature {
    pub fn of(path: &Path) -> Result<Self, IoError> {
        let meta = std::fs::metadata(path).map_err(|e| read_error(path, e))?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct CachedSet {
    signature: FileSignature,
    records: Arc<Vec<Record>>,
}

pub struct RecordCache {
    encoding: TextEncoding,
    entries: HashMap<PathBuf, CachedSet>,
}

impl RecordCache {
    pub fn new(encoding: TextEncoding) -> Self {
        Self {
            encoding,
            entries: HashMap::new(),
        }
    }

    /// Records for `path`, re-reading the file only if it changed since the last load.
    pub fn load(&mut self, path: &Path) -> Result<Arc<Vec<Record>>, IoError> {
        let key = path.canonicalize().map_err(|e| read_error(path, e))?;
        let signature = FileSignature::of(&key)?;

        if let Some(entry) = self.entries.get(&key) {
            if entry.signature == signature {
                debug!("record cache hit: {}", key.display());
                return Ok(Arc::clone(&entry.records));
            }
            debug!("record cache stale: {}", key.display());
        }

        let records = Arc::new(load_records(&key, self.encoding)?);
        self.entries.insert(
            key,
            CachedSet {
                signature,
                records: Arc::clone(&records),
            },
        );
        Ok(records)
    }

    /// Drop the entry for `path`, if any.
    pub fn invalidate(&mut self, path: &Path) {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.remove(&key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn read_error(path: &Path, e: std::io::Error) -> IoError {
    IoError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

//! Storage engine for taskdeck
//!
//! All state lives under a single data directory:
//!
//! ```text
//! <data-dir>/
//!   projects.jsonl   # one project record per line, in creation order
//!   tasks.jsonl      # one task record per line, in creation order
//! ```
//!
//! Each collection is a JSONL snapshot: reads parse line by line and skip
//! records that fail to deserialize (logged, never a collection-level
//! failure); mutations read-modify-write the whole file under an exclusive
//! lock and replace it atomically, so a batch rewrite is all-or-nothing and
//! readers never observe partial state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::Result;
use crate::lock::{self, FileLock, DEFAULT_LOCK_TIMEOUT_MS};

const PROJECTS_FILE: &str = "projects.jsonl";
const TASKS_FILE: &str = "tasks.jsonl";

/// Handle on the data directory, injected into each store at construction
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn projects_file(&self) -> PathBuf {
        self.data_dir.join(PROJECTS_FILE)
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Read every record in a JSONL collection.
    ///
    /// A missing file is an empty collection. Lines that fail to parse are
    /// skipped with a warning so one corrupt record cannot take down every
    /// listing.
    pub fn read_records<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(path)?;
        let mut records = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        line = idx + 1,
                        error = %err,
                        "skipping unreadable record"
                    );
                }
            }
        }
        Ok(records)
    }

    /// Read-modify-write a JSONL collection under its exclusive lock.
    ///
    /// The mutator sees the full record list in file order; the list is
    /// written back in one atomic replace after it returns.
    pub fn update_records<T, F, R>(&self, path: &Path, mutate: F) -> Result<R>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>) -> Result<R>,
    {
        self.ensure_dirs()?;
        let _lock = FileLock::acquire(collection_lock_path(path), DEFAULT_LOCK_TIMEOUT_MS)?;

        let mut records: Vec<T> = self.read_records(path)?;
        let result = mutate(&mut records)?;

        let mut buffer = Vec::new();
        for record in &records {
            let json = serde_json::to_string(record)?;
            buffer.extend_from_slice(json.as_bytes());
            buffer.push(b'\n');
        }
        lock::write_atomic(path, &buffer)?;

        Ok(result)
    }
}

fn collection_lock_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

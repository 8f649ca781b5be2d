use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::PipelineError;

/// The record sequence handed from one pipeline stage to the next.
/// The on-disk format is an implementation detail of the store, so tests
/// can swap in `MemoryStore` without touching stage code.
pub trait RecordStore<T> {
    fn append(&mut self, record: &T) -> Result<(), PipelineError>;

    /// All records in append order.
    fn read_all(&self) -> Result<Vec<T>, PipelineError>;
}

/// File-backed store, one JSON object per line.
pub struct JsonlStore<T> {
    path: PathBuf,
    _record: PhantomData<T>,
}

impl<T> JsonlStore<T> {
    /// Create the file, truncating any previous contents. Writers use
    /// this so a re-run replaces the prior run's output.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref().to_path_buf();
        File::create(&path).map_err(|e| persistence(&path, &e))?;
        Ok(Self {
            path,
            _record: PhantomData,
        })
    }

    /// Attach to an existing file without touching it.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            _record: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> RecordStore<T> for JsonlStore<T> {
    fn append(&mut self, record: &T) -> Result<(), PipelineError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| persistence(&self.path, &e))?;
        let line = serde_json::to_string(record).map_err(|e| persistence(&self.path, &e))?;
        writeln!(file, "{line}").map_err(|e| persistence(&self.path, &e))?;
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<T>, PipelineError> {
        let file = File::open(&self.path).map_err(|e| persistence(&self.path, &e))?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| persistence(&self.path, &e))?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line).map_err(|e| persistence(&self.path, &e))?);
        }
        Ok(records)
    }
}

fn persistence(path: &Path, err: &dyn std::fmt::Display) -> PipelineError {
    PipelineError::Persistence(format!("{}: {err}", path.display()))
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    records: Vec<T>,
}

#[cfg(test)]
impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

#[cfg(test)]
impl<T: Clone> RecordStore<T> for MemoryStore<T> {
    fn append(&mut self, record: &T) -> Result<(), PipelineError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<T>, PipelineError> {
        Ok(self.records.clone())
    }
}

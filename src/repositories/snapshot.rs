//! JSON snapshot files.
//!
//! A snapshot is the full state of a store, rewritten after every mutation.
//! Writes go to a sibling temp file that is then renamed over the target so
//! a crash never leaves a half-written snapshot behind.

use crate::error::RepositoryResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, or `None` if the file does not exist yet.
    pub fn load<T: DeserializeOwned>(&self) -> RepositoryResult<Option<T>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the snapshot with `state`.
    pub fn save<T: Serialize>(&self, state: &T) -> RepositoryResult<()> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        tracing::trace!(path = %self.path.display(), "Snapshot written");
        Ok(())
    }
}

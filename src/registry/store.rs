//! Artifact storage backends.
//!
//! A store only answers "bytes for this code, or not found". Decoding and
//! validation are the registry's job.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::ProductLineCode;

pub trait ArtifactStore: Send + Sync {
    /// Human-readable location of the artifact for `code` (for error messages).
    fn location(&self, code: ProductLineCode) -> String;

    /// Raw artifact bytes, or `Ok(None)` if nothing is stored for `code`.
    fn fetch(&self, code: ProductLineCode) -> io::Result<Option<Vec<u8>>>;
}

/// Artifact file name for a code, e.g. `HD_model.json`.
pub fn artifact_file_name(code: ProductLineCode) -> String {
    format!("{}_model.json", code.as_str())
}

/// Reads `<dir>/<CODE>_model.json`.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, code: ProductLineCode) -> PathBuf {
        self.dir.join(artifact_file_name(code))
    }
}

impl ArtifactStore for DirectoryStore {
    fn location(&self, code: ProductLineCode) -> String {
        self.path_for(code).display().to_string()
    }

    fn fetch(&self, code: ProductLineCode) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.path_for(code)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Shared count of `fetch` calls made against a `MemoryStore`.
#[derive(Debug, Clone, Default)]
pub struct FetchCounter(Arc<AtomicUsize>);

impl FetchCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// In-process artifacts, for tests and embedders that ship models in the binary.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    artifacts: HashMap<ProductLineCode, Vec<u8>>,
    fetches: FetchCounter,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_artifact(mut self, code: ProductLineCode, bytes: impl Into<Vec<u8>>) -> Self {
        self.artifacts.insert(code, bytes.into());
        self
    }

    /// Handle that keeps counting after the store is moved into a registry.
    pub fn fetch_counter(&self) -> FetchCounter {
        self.fetches.clone()
    }
}

impl ArtifactStore for MemoryStore {
    fn location(&self, code: ProductLineCode) -> String {
        format!("memory://{code}")
    }

    fn fetch(&self, code: ProductLineCode) -> io::Result<Option<Vec<u8>>> {
        self.fetches.bump();
        Ok(self.artifacts.get(&code).cloned())
    }
}

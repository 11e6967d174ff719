//! Model registry: product-line code -> loaded artifact.
//!
//! Artifacts are fetched from an `ArtifactStore` the first time a code is
//! requested and cached for the life of the registry. The cache lock is never
//! held across a fetch, so two threads asking for the same uncached code may
//! both load it; artifacts are read-only, and the first one inserted wins.

pub mod store;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::domain::ProductLineCode;
use crate::error::PredictError;
use crate::models::ModelArtifact;

pub use store::*;

pub struct ModelRegistry {
    store: Box<dyn ArtifactStore>,
    cache: RwLock<HashMap<ProductLineCode, Arc<ModelArtifact>>>,
}

impl ModelRegistry {
    pub fn new(store: impl ArtifactStore + 'static) -> Self {
        Self {
            store: Box::new(store),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Registry reading `<CODE>_model.json` files from `dir`.
    pub fn from_dir(dir: impl Into<std::path::PathBuf>) -> Self {
        Self::new(DirectoryStore::new(dir))
    }

    /// Artifact for `code`, loading it on first use.
    pub fn get(&self, code: ProductLineCode) -> Result<Arc<ModelArtifact>, PredictError> {
        if let Some(artifact) = self.cached(code) {
            debug!(%code, "model artifact cache hit");
            return Ok(artifact);
        }

        let artifact = Arc::new(self.load(code)?);

        let mut cache = self.cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(Arc::clone(cache.entry(code).or_insert(artifact)))
    }

    /// Declared columns of the artifact for `code`.
    pub fn declared_columns(&self, code: ProductLineCode) -> Result<Vec<String>, PredictError> {
        Ok(self.get(code)?.declared_columns().to_vec())
    }

    /// Codes whose artifacts are currently cached.
    pub fn loaded_codes(&self) -> Vec<ProductLineCode> {
        let cache = self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut codes: Vec<_> = cache.keys().copied().collect();
        codes.sort();
        codes
    }

    pub fn location(&self, code: ProductLineCode) -> String {
        self.store.location(code)
    }

    fn cached(&self, code: ProductLineCode) -> Option<Arc<ModelArtifact>> {
        let cache = self.cache.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        cache.get(&code).cloned()
    }

    fn load(&self, code: ProductLineCode) -> Result<ModelArtifact, PredictError> {
        let location = self.store.location(code);
        let unavailable = |reason: String| PredictError::ArtifactUnavailable {
            code,
            location: location.clone(),
            reason,
        };

        let bytes = self
            .store
            .fetch(code)
            .map_err(|e| unavailable(format!("read failed: {e}")))?
            .ok_or_else(|| unavailable("not found".to_string()))?;

        let artifact = ModelArtifact::from_json_slice(code, &bytes).map_err(unavailable)?;

        info!(
            %code,
            location = %location,
            columns = artifact.declared_columns().len(),
            estimator = artifact.estimator().kind_name(),
            "loaded model artifact"
        );
        Ok(artifact)
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("loaded", &self.loaded_codes())
            .finish()
    }
}

//! In-memory embedding cache keyed by `(embedder_id, blake3(content))`.
//!
//! The cache is consulted before calling the wrapped provider and written
//! through on misses, so rebuilding an index over unchanged chunks costs no
//! provider calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::debug;

use policyqa_core::traits::Embedder;
use policyqa_core::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

pub struct CachedEmbedder {
    inner: Arc<dyn Embedder>,
    entries: Mutex<HashMap<String, Vec<f32>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl CachedEmbedder {
    pub fn new(inner: Arc<dyn Embedder>) -> Self {
        Self { inner, entries: Mutex::new(HashMap::new()), hits: AtomicUsize::new(0), misses: AtomicUsize::new(0) }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats { hits: self.hits.load(Ordering::Relaxed), misses: self.misses.load(Ordering::Relaxed) }
    }

    fn key(&self, text: &str) -> String {
        format!("{}:{}", self.inner.embedder_id(), blake3::hash(text.as_bytes()).to_hex())
    }
}

impl Embedder for CachedEmbedder {
    fn embedder_id(&self) -> &str {
        self.inner.embedder_id()
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| self.key(t)).collect();
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::EmbeddingFailure("embedding cache lock poisoned".into()))?;

        let mut missing_keys: Vec<&String> = Vec::new();
        let mut missing_texts: Vec<String> = Vec::new();
        for (key, text) in keys.iter().zip(texts) {
            if !entries.contains_key(key) && !missing_keys.contains(&key) {
                missing_keys.push(key);
                missing_texts.push(text.clone());
            }
        }
        self.hits.fetch_add(texts.len() - missing_texts.len(), Ordering::Relaxed);
        self.misses.fetch_add(missing_texts.len(), Ordering::Relaxed);

        if !missing_texts.is_empty() {
            let fresh = self.inner.embed_batch(&missing_texts)?;
            if fresh.len() != missing_texts.len() {
                return Err(Error::EmbeddingFailure(format!(
                    "provider returned {} vectors for {} texts",
                    fresh.len(),
                    missing_texts.len()
                )));
            }
            for (key, vector) in missing_keys.into_iter().zip(fresh) {
                entries.insert(key.clone(), vector);
            }
        }
        debug!(requested = texts.len(), fetched = missing_texts.len(), "embedding cache lookup");

        keys.iter()
            .map(|k| {
                entries
                    .get(k)
                    .cloned()
                    .ok_or_else(|| Error::EmbeddingFailure("embedding cache lost an entry".into()))
            })
            .collect()
    }
}

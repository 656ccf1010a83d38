use std::sync::Arc;

use tracing::info;

use policyqa_core::config::DistanceMetric;
use policyqa_core::traits::Embedder;
use policyqa_core::types::Chunk;
use policyqa_core::{Error, Result};

/// A chunk paired with its embedding. Never mutated after build.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

pub struct FlatVectorIndex {
    pub(crate) entries: Vec<IndexEntry>,
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) metric: DistanceMetric,
}

impl FlatVectorIndex {
    /// Embed `chunks` in batches of `batch_size` and keep them in ingestion order.
    pub fn build(chunks: &[Chunk], embedder: Arc<dyn Embedder>, metric: DistanceMetric, batch_size: usize) -> Result<Self> {
        let mut entries = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(batch_size.max(1)) {
            let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let vectors = embedder.embed_batch(&texts)?;
            if vectors.len() != batch.len() {
                return Err(Error::EmbeddingFailure(format!(
                    "provider returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }
            for (chunk, vector) in batch.iter().zip(vectors) {
                check_dim(&vector, embedder.dim())?;
                entries.push(IndexEntry { chunk: chunk.clone(), vector });
            }
        }
        info!(entries = entries.len(), embedder = embedder.embedder_id(), ?metric, "built vector index");
        Ok(Self { entries, embedder, metric })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }
}

pub(crate) fn check_dim(vector: &[f32], expected: usize) -> Result<()> {
    if vector.len() != expected {
        return Err(Error::EmbeddingFailure(format!(
            "embedding has dimension {}, expected {}",
            vector.len(),
            expected
        )));
    }
    Ok(())
}

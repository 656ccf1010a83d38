use tracing::debug;

use policyqa_core::config::DistanceMetric;
use policyqa_core::types::Chunk;
use policyqa_core::{Error, Result};

use crate::index::{check_dim, FlatVectorIndex};

/// One retrieved chunk. Smaller `distance` is closer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub chunk: Chunk,
    pub distance: f32,
}

impl FlatVectorIndex {
    /// Embed `query_text` and return the `k` nearest chunks.
    pub fn query(&self, query_text: &str, k: usize) -> Result<Vec<VectorHit>> {
        if self.entries.is_empty() || k == 0 {
            return Ok(vec![]);
        }
        let query_vec = self
            .embedder
            .embed_batch(&[query_text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::EmbeddingFailure("provider returned no vector for the query".into()))?;
        check_dim(&query_vec, self.embedder.dim())?;
        let hits = self.search_vec(&query_vec, k);
        debug!(query = query_text, hits = hits.len(), "vector query");
        Ok(hits)
    }

    /// Exhaustive scan; ties keep ingestion order.
    pub fn search_vec(&self, query_vec: &[f32], k: usize) -> Vec<VectorHit> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (i, distance(self.metric, query_vec, &e.vector)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored
            .into_iter()
            .take(k)
            .map(|(i, d)| VectorHit { chunk: self.entries[i].chunk.clone(), distance: d })
            .collect()
    }
}

pub fn distance(metric: DistanceMetric, a: &[f32], b: &[f32]) -> f32 {
    match metric {
        DistanceMetric::L2 => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum(),
        DistanceMetric::Cosine => {
            let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
            let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
            let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
            if na == 0.0 || nb == 0.0 { 1.0 } else { 1.0 - dot / (na * nb) }
        }
    }
}

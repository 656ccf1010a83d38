use std::hash::{Hash, Hasher};

use twox_hash::XxHash64;

use policyqa_core::traits::Embedder;
use policyqa_core::Result;

/// Offline bag-of-words embedder: every lower-cased alphanumeric token is
/// hashed with xxHash64 into one of `dim` buckets, then the vector is
/// L2-normalized. Deterministic across runs and platforms. A dimension of
/// zero is raised to one.
pub struct HashEmbedder {
    dim: usize,
    id: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        let dim = dim.max(1);
        Self { dim, id: format!("hash:xxh64:d{}", dim) }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            v[idx] += 0.5 + ((h >> 32) as u32 as f32) / (u32::MAX as f32);
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Embedder for HashEmbedder {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

use std::collections::BTreeMap;

use tracing::info;

use policyqa_core::types::{Category, Chunk};

use crate::classify::classify_chunk;

/// Chunks bucketed by category. Each bucket keeps insertion order, which is
/// the order extraction scans it in.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    pub(crate) buckets: BTreeMap<Category, Vec<Chunk>>,
}

impl CategoryIndex {
    pub fn build(chunks: &[Chunk]) -> Self {
        let mut buckets: BTreeMap<Category, Vec<Chunk>> = BTreeMap::new();
        for chunk in chunks {
            buckets.entry(classify_chunk(chunk)).or_default().push(chunk.clone());
        }
        for (category, bucket) in &buckets {
            info!(category = %category, chunks = bucket.len(), "category bucket built");
        }
        Self { buckets }
    }

    pub fn bucket(&self, category: Category) -> &[Chunk] {
        self.buckets.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.buckets.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

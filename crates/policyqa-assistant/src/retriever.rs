use tracing::debug;

use policyqa_core::types::{Category, Topic};
use policyqa_core::Result;
use policyqa_text::{classify_query, CategoryIndex};
use policyqa_vector::{FlatVectorIndex, VectorHit};

/// The index a deployment was configured with.
pub enum KnowledgeIndex {
    Vector(FlatVectorIndex),
    Keyword(CategoryIndex),
}

impl KnowledgeIndex {
    pub fn len(&self) -> usize {
        match self {
            KnowledgeIndex::Vector(index) => index.len(),
            KnowledgeIndex::Keyword(index) => index.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RetrievalResult {
    /// Nearest chunks, closest first.
    Chunks(Vec<VectorHit>),
    /// Lines or sections pulled from the query's category bucket.
    Extract { category: Category, topic: Topic, segments: Vec<String> },
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        match self {
            RetrievalResult::Chunks(hits) => hits.is_empty(),
            RetrievalResult::Extract { segments, .. } => segments.is_empty(),
        }
    }

    /// Retrieved text joined with blank lines, ready to hand to a generator.
    pub fn context(&self) -> String {
        match self {
            RetrievalResult::Chunks(hits) => hits.iter().map(|h| h.chunk.text.as_str()).collect::<Vec<_>>().join("\n\n"),
            RetrievalResult::Extract { segments, .. } => segments.join("\n\n"),
        }
    }
}

pub struct Retriever {
    index: KnowledgeIndex,
    k: usize,
}

impl Retriever {
    pub fn new(index: KnowledgeIndex, k: usize) -> Self {
        Self { index, k }
    }

    pub fn retrieve(&self, query: &str) -> Result<RetrievalResult> {
        let result = match &self.index {
            KnowledgeIndex::Vector(index) => RetrievalResult::Chunks(index.query(query, self.k)?),
            KnowledgeIndex::Keyword(index) => {
                let (category, topic) = classify_query(query);
                RetrievalResult::Extract { category, topic, segments: index.query(category, topic, self.k) }
            }
        };
        debug!(k = self.k, empty = result.is_empty(), "retrieved");
        Ok(result)
    }
}

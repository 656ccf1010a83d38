use std::path::Path;

use crate::error::Result;
use crate::types::ChatTurn;

pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g., `hash:xxh64:d384`).
    fn embedder_id(&self) -> &str;
    fn dim(&self) -> usize;
    /// One vector per input text, in input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Everything a generation provider needs for one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_prompt: String,
    pub history: Vec<ChatTurn>,
    pub context: String,
    pub question: String,
}

pub trait Generator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<String>;
    /// Bare completion of one prompt, no persona, history or context.
    fn complete(&self, prompt: &str) -> Result<String>;
}

/// Turns a file on disk into raw text.
pub trait TextExtractor: Send + Sync {
    /// Lower-case file extensions this extractor understands.
    fn extensions(&self) -> &[&str];
    fn extract(&self, path: &Path) -> Result<String>;
}

//! policyqa-embed
//!
//! Embedding providers behind the core `Embedder` trait: a deterministic
//! hashing embedder for offline use and tests, and an OpenAI-compatible HTTP
//! client.

mod hash;
mod openai;

pub use hash::HashEmbedder;
pub use openai::OpenAiEmbedder;

use policyqa_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use policyqa_core::traits::Embedder;
use tracing::info;

/// Build the configured provider. `APP_USE_FAKE_EMBEDDINGS=1` forces the
/// hashing embedder regardless of configuration.
pub fn get_default_embedder(config: &EmbeddingConfig) -> Box<dyn Embedder> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake || config.provider == EmbeddingProviderKind::Hash {
        info!(dim = config.dimension, "using hashing embedder");
        return Box::new(HashEmbedder::new(config.dimension));
    }
    info!(model = %config.model, "using OpenAI-compatible embedder");
    Box::new(OpenAiEmbedder::new(config))
}

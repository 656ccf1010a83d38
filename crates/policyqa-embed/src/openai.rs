//! Embeddings from any OpenAI-compatible `/embeddings` endpoint.

use serde_json::{json, Value};
use tracing::debug;

use policyqa_core::config::EmbeddingConfig;
use policyqa_core::traits::Embedder;
use policyqa_core::{Error, Result};

pub struct OpenAiEmbedder {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
    dim: usize,
    id: String,
}

impl OpenAiEmbedder {
    /// API key resolution: `embedding.api_key` > `OPENAI_API_KEY` > empty.
    pub fn new(config: &EmbeddingConfig) -> Self {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_default();
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            dim: config.dimension,
            id: format!("openai:{}:d{}", config.model, config.dimension),
        }
    }

    fn request_body(&self, texts: &[String]) -> Value {
        json!({
            "model": self.model,
            "input": texts,
            "dimensions": self.dim,
        })
    }
}

impl Embedder for OpenAiEmbedder {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        if self.api_key.is_empty() {
            return Err(Error::EmbeddingFailure("no API key configured (set OPENAI_API_KEY)".into()));
        }
        let url = format!("{}/embeddings", self.base_url);
        debug!(url = %url, batch = texts.len(), "requesting embeddings");
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(texts))
            .send()
            .map_err(|e| Error::EmbeddingFailure(format!("connection failed ({}): {}", url, e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(Error::EmbeddingFailure(format!("API error {}: {}", status, text)));
        }
        let json: Value = resp.json().map_err(|e| Error::EmbeddingFailure(e.to_string()))?;
        parse_embeddings(&json, texts.len())
    }
}

/// Pull `data[].embedding` out of a response, ordered by each item's `index`.
fn parse_embeddings(json: &Value, expected: usize) -> Result<Vec<Vec<f32>>> {
    let data = json["data"]
        .as_array()
        .ok_or_else(|| Error::EmbeddingFailure("response has no data array".into()))?;
    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let index = item["index"].as_u64().map(|i| i as usize).unwrap_or(position);
        let vector = item["embedding"]
            .as_array()
            .ok_or_else(|| Error::EmbeddingFailure(format!("item {} has no embedding", position)))?
            .iter()
            .map(|x| x.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<f32>>>()
            .ok_or_else(|| Error::EmbeddingFailure(format!("item {} has a non-numeric component", position)))?;
        indexed.push((index, vector));
    }
    if indexed.len() != expected {
        return Err(Error::EmbeddingFailure(format!("expected {} embeddings, got {}", expected, indexed.len())));
    }
    indexed.sort_by_key(|(i, _)| *i);
    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}

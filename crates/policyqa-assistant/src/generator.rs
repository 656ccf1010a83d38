//! Chat completions from any OpenAI-compatible endpoint.

use serde_json::{json, Value};
use tracing::debug;

use policyqa_core::config::GenerationConfig;
use policyqa_core::traits::{GenerationRequest, Generator};
use policyqa_core::{Error, Result};

pub struct OpenAiGenerator {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    temperature: f32,
    api_key: String,
}

impl OpenAiGenerator {
    /// API key resolution: `generation.api_key` > `OPENAI_API_KEY` > empty.
    pub fn new(config: &GenerationConfig) -> Self {
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
            temperature: config.temperature,
            api_key,
        }
    }

    fn request_body(&self, messages: &[Value]) -> Value {
        json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": messages,
        })
    }

    fn chat(&self, messages: &[Value]) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(Error::GenerationFailure("no API key configured (set OPENAI_API_KEY)".into()));
        }
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, messages = messages.len(), "requesting completion");
        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(messages))
            .send()
            .map_err(|e| Error::GenerationFailure(format!("connection failed ({}): {}", url, e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(Error::GenerationFailure(format!("API error {}: {}", status, text)));
        }
        let json: Value = resp.json().map_err(|e| Error::GenerationFailure(e.to_string()))?;
        parse_completion(&json)
    }
}

impl Generator for OpenAiGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.chat(&build_messages(request))
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&[json!({ "role": "user", "content": prompt })])
    }
}

/// System prompt, prior turns as user/assistant pairs, then the question
/// with the retrieved context.
fn build_messages(request: &GenerationRequest) -> Vec<Value> {
    let mut messages = Vec::with_capacity(request.history.len() * 2 + 2);
    messages.push(json!({ "role": "system", "content": request.system_prompt }));
    for turn in &request.history {
        messages.push(json!({ "role": "user", "content": turn.query }));
        messages.push(json!({ "role": "assistant", "content": turn.answer }));
    }
    messages.push(json!({
        "role": "user",
        "content": format!(
            "Use the following pieces of context to answer the question at the end.\n\n{}\n\nQuestion: {}",
            request.context, request.question
        ),
    }));
    messages
}

fn parse_completion(json: &Value) -> Result<String> {
    if let Some(message) = json["error"]["message"].as_str() {
        return Err(Error::GenerationFailure(message.to_string()));
    }
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::GenerationFailure("response has no choices[0].message.content".into()))
}

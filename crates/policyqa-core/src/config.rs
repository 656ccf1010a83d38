use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::chunker::ChunkingConfig;
use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(dir, &env_name)
    }

    pub fn load_for_env(dir: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            other => tracing::debug!(env = other, "no environment-specific config layer"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        Ok(Self { figment })
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Extract and validate the typed settings.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataConfig,
    pub chunking: ChunkingConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub escalation: EscalationConfig,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.retrieval.k == 0 {
            return Err(Error::InvalidConfig("retrieval.k must be at least 1".into()));
        }
        if self.embedding.batch_size == 0 {
            return Err(Error::InvalidConfig("embedding.batch_size must be at least 1".into()));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig("embedding.dimension must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub documents_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { documents_dir: "insurance_data".to_string() }
    }
}

impl DataConfig {
    pub fn documents_dir(&self, base: &Path) -> PathBuf {
        resolve_with_base(base, &self.documents_dir)
    }
}

/// Which index backs retrieval, fixed for the lifetime of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Vector,
    Keyword,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    L2,
    Cosine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub strategy: Strategy,
    pub k: usize,
    pub history_window: usize,
    pub metric: DistanceMetric,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { strategy: Strategy::Vector, k: 4, history_window: 5, metric: DistanceMetric::L2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    Hash,
    OpenAi,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub model: String,
    pub dimension: usize,
    pub base_url: String,
    pub api_key: Option<String>,
    pub batch_size: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::OpenAi,
            model: "text-embedding-3-small".to_string(),
            dimension: 384,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            batch_size: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub base_url: String,
    pub api_key: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub phone: String,
    pub email: String,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self { phone: "1-800-INS-HELP".to_string(), email: "support@insurancecompany.com".to_string() }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

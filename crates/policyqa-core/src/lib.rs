//! Core types, configuration and ingestion for the policy Q&A workspace.
//!
//! Configuration merges `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! with Figment. Ingestion walks a document directory (seeding the sample
//! policies when it is missing) and cuts each document into overlapping
//! chunks.

pub mod chunker;
pub mod config;
pub mod data_processor;
pub mod error;
pub mod seed;
pub mod traits;
pub mod types;

pub use error::{Error, Result};

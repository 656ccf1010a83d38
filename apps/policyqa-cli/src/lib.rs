//! Plumbing shared by the `policyqa-*` binaries.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::ValueEnum;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use policyqa_core::config::{Config, Settings, Strategy};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Vector,
    Keyword,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Vector => Strategy::Vector,
            StrategyArg::Keyword => Strategy::Keyword,
        }
    }
}

/// Logs go to stderr so answers on stdout stay clean. `RUST_LOG` wins.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn load_settings(config_dir: &Path, strategy: Option<StrategyArg>) -> anyhow::Result<Settings> {
    let config = Config::load_from(config_dir).context("loading configuration")?;
    let mut settings = config.settings().context("invalid configuration")?;
    if let Some(strategy) = strategy {
        settings.retrieval.strategy = strategy.into();
    }
    Ok(settings)
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.green} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

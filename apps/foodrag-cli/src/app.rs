use std::path::PathBuf;

use anyhow::Context;

use foodrag_core::config::{AppConfig, GroqConfig, UpstashConfig};
use foodrag_core::dataset::load_foods;
use foodrag_core::enrich::{enrich_all, FieldSet};
use foodrag_core::types::EnrichedDocument;
use foodrag_llm::GroqClient;
use foodrag_vector::{SyncOptions, UpstashIndex};

/// Everything a program needs before talking to a remote service: the merged
/// configuration and the enriched dataset.
#[derive(Debug, Clone)]
pub struct App {
    pub config: AppConfig,
    pub fields: FieldSet,
    pub docs: Vec<EnrichedDocument>,
}

impl App {
    /// Load `.env`, then configuration for `RUST_ENV`, then the dataset.
    pub fn bootstrap() -> anyhow::Result<Self> {
        Self::from_config(load_config()?)
    }

    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let path = config.dataset_path();
        let records = load_foods(&path).with_context(|| format!("loading dataset {}", path.display()))?;
        let fields = config.field_set();
        let docs = enrich_all(&records, &fields);
        tracing::info!(path = %path.display(), records = docs.len(), fields = ?fields.names(), "documents enriched");
        Ok(Self { config, fields, docs })
    }

    pub fn sync_options(&self, show_progress: bool) -> SyncOptions {
        SyncOptions { batch_size: self.config.index.upsert_batch_size, show_progress }
    }

    pub fn upstash(&self) -> anyhow::Result<UpstashIndex> {
        upstash_index(&self.config)
    }

    pub fn groq(&self) -> anyhow::Result<GroqClient> {
        groq_client(&self.config)
    }
}

/// Load `.env`, then configuration for `RUST_ENV`. The dataset is not read.
pub fn load_config() -> anyhow::Result<AppConfig> {
    load_env_file().log();
    AppConfig::load().context("loading configuration")
}

pub fn upstash_index(config: &AppConfig) -> anyhow::Result<UpstashIndex> {
    Ok(UpstashIndex::new(&UpstashConfig::from_env(config)?)?)
}

pub fn groq_client(config: &AppConfig) -> anyhow::Result<GroqClient> {
    let client = GroqClient::new(&GroqConfig::from_env(config)?)?;
    tracing::debug!(model = client.model(), "chat model ready");
    Ok(client)
}

/// What happened when looking for a `.env` file.
#[derive(Debug)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing,
    Unreadable(String),
}

impl EnvFile {
    pub fn from_result(result: dotenv::Result<PathBuf>) -> Self {
        match result {
            Ok(path) => EnvFile::Loaded(path),
            Err(e) if e.not_found() => EnvFile::Missing,
            Err(e) => EnvFile::Unreadable(e.to_string()),
        }
    }

    /// Report the outcome. Call once logging is initialised.
    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            EnvFile::Missing => tracing::debug!("no .env file"),
            EnvFile::Unreadable(e) => tracing::warn!("ignoring unreadable .env: {}", e),
        }
    }
}

/// Populate the process environment from `.env` if one exists.
pub fn load_env_file() -> EnvFile {
    EnvFile::from_result(dotenv::dotenv())
}

//! Configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults + `config.toml` + `config.<env>.toml`
//! + `APP_*` env vars (`__` separates sections, e.g. `APP_RETRIEVAL__TOP_K=5`).
//! Service credentials are not part of the merged config; they are read from
//! the process environment by [`UpstashConfig::from_env`] and
//! [`GroqConfig::from_env`].

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::enrich::{EnrichField, FieldSet};
use crate::error::{Error, Result};

pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const UPSTASH_VECTOR_REST_URL: &str = "UPSTASH_VECTOR_REST_URL";
pub const UPSTASH_VECTOR_REST_TOKEN: &str = "UPSTASH_VECTOR_REST_TOKEN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub enrichment: EnrichmentConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub fields: Vec<EnrichField>,
}

/// How ingestion decides whether the index needs loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncGuard {
    /// Load only when the index holds no vectors.
    EmptyIndex,
    /// Load whenever the stored marker does not match the dataset.
    Fingerprint,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub upsert_batch_size: usize,
    pub sync_guard: SyncGuard,
    pub marker_namespace: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout. Unset means the client default (none).
    pub request_timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig { path: "foods.json".to_string() },
            enrichment: EnrichmentConfig { fields: FieldSet::full().fields().to_vec() },
            index: IndexConfig {
                upsert_batch_size: 100,
                sync_guard: SyncGuard::Fingerprint,
                marker_namespace: "foodrag-meta".to_string(),
            },
            retrieval: RetrievalConfig { top_k: 3 },
            llm: LlmConfig {
                base_url: "https://api.groq.com/openai/v1".to_string(),
                model: "llama-3.1-8b-instant".to_string(),
                temperature: 0.7,
                top_p: 1.0,
                max_completion_tokens: 1024,
            },
            http: HttpConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let config: Self = Self::figment_for_env(env_name)
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        tracing::debug!(env = env_name, ?config, "configuration loaded");
        Ok(config)
    }

    fn figment_for_env(env_name: &str) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment.merge(Env::prefixed("APP_").split("__"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.retrieval.top_k == 0 {
            return Err(Error::InvalidConfig("retrieval.top_k must be at least 1".to_string()));
        }
        if self.index.upsert_batch_size == 0 {
            return Err(Error::InvalidConfig("index.upsert_batch_size must be at least 1".to_string()));
        }
        if self.index.marker_namespace.trim().is_empty() {
            return Err(Error::InvalidConfig("index.marker_namespace must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(Error::InvalidConfig(format!(
                "llm.temperature must be within [0, 2], got {}",
                self.llm.temperature
            )));
        }
        if !(self.llm.top_p > 0.0 && self.llm.top_p <= 1.0) {
            return Err(Error::InvalidConfig(format!("llm.top_p must be within (0, 1], got {}", self.llm.top_p)));
        }
        if self.llm.max_completion_tokens == 0 {
            return Err(Error::InvalidConfig("llm.max_completion_tokens must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn dataset_path(&self) -> PathBuf {
        expand_path(&self.dataset.path)
    }

    pub fn field_set(&self) -> FieldSet {
        FieldSet::new(&self.enrichment.fields)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.http.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Connection settings for the Upstash Vector REST API.
#[derive(Debug, Clone)]
pub struct UpstashConfig {
    pub rest_url: String,
    pub rest_token: String,
    pub marker_namespace: String,
    pub request_timeout: Option<Duration>,
}

impl UpstashConfig {
    pub fn from_env(app: &AppConfig) -> Result<Self> {
        Ok(Self {
            rest_url: required_env(UPSTASH_VECTOR_REST_URL)?,
            rest_token: required_env(UPSTASH_VECTOR_REST_TOKEN)?,
            marker_namespace: app.index.marker_namespace.clone(),
            request_timeout: app.request_timeout(),
        })
    }
}

/// Connection and sampling settings for the Groq chat-completion API.
#[derive(Debug, Clone)]
pub struct GroqConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
    pub request_timeout: Option<Duration>,
}

impl GroqConfig {
    pub fn from_env(app: &AppConfig) -> Result<Self> {
        Ok(Self::with_api_key(required_env(GROQ_API_KEY)?, app))
    }

    pub fn with_api_key(api_key: String, app: &AppConfig) -> Self {
        Self {
            api_key,
            base_url: app.llm.base_url.clone(),
            model: app.llm.model.clone(),
            temperature: app.llm.temperature,
            top_p: app.llm.top_p,
            max_completion_tokens: app.llm.max_completion_tokens,
            request_timeout: app.request_timeout(),
        }
    }
}

fn required_env(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingEnv(name)),
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

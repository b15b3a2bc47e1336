use serde::{Deserialize, Serialize};

use crate::engine::ScoringTables;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub scoring: ScoringTables,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatasetConfig {
    /// CSV file with the historical listings pool.
    #[serde(default = "default_dataset_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    /// Number of nearest comparables fed into the blend.
    #[serde(default = "default_comparables_k")]
    pub comparables_k: usize,
    /// How long one market-search round trip may take before the
    /// engine continues without web quotes.
    #[serde(default = "default_market_timeout")]
    pub market_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            comparables_k: default_comparables_k(),
            market_timeout_seconds: default_market_timeout(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: default_llm_base_url(),
            api_key: String::new(),
            model: default_llm_model(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dataset_path() -> String {
    "data/listings.csv".to_string()
}

fn default_comparables_k() -> usize {
    5
}

fn default_market_timeout() -> u64 {
    12
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_llm_timeout() -> u64 {
    30
}

pub fn load_config(path: &str) -> anyhow::Result<Config> {
    let config = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("RESALE_PRICER").separator("__"))
        .build()?;

    let cfg: Config = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn validate_config(cfg: &Config) -> anyhow::Result<()> {
    if cfg.engine.comparables_k == 0 {
        anyhow::bail!("engine.comparables_k must be at least 1");
    }

    if cfg.dataset.path.trim().is_empty() {
        anyhow::bail!("dataset.path cannot be empty");
    }

    if cfg.llm.enabled {
        if cfg.llm.api_key.trim().is_empty() {
            anyhow::bail!("LLM provider is enabled but llm.api_key is not set");
        }
        if cfg.llm.model.trim().is_empty() {
            anyhow::bail!("LLM provider is enabled but llm.model is not set");
        }
    }

    Ok(())
}

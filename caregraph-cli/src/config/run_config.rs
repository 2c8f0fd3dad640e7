//! Run config: OpenAI endpoint, data files, session database and engine tunables.
//!
//! Filled from env / `.env` by [`RunConfig::from_env`], then overridden by
//! [`RunOptions`](super::RunOptions). Consumed by [`build_engine`](crate::build_engine).

use std::path::PathBuf;

use async_openai::config::OpenAIConfig;
use caregraph::EngineConfig;
use thiserror::Error;

/// Patient data file used when neither `PATIENTS_PATH` nor `--patients` is given.
pub const DEFAULT_PATIENTS_PATH: &str = "data/patients.json";

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Error loading the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY is not set; please configure it in .env")]
    MissingApiKey,
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Everything the binary needs to wire a [`ConversationEngine`](caregraph::ConversationEngine).
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// OpenAI API base URL, e.g. `https://api.openai.com/v1`.
    pub api_base: String,
    pub api_key: String,
    /// Chat model name, e.g. `gpt-4o-mini`.
    pub model: String,
    /// Sampling temperature 0–2. Default: unset (use API default).
    pub temperature: Option<f32>,
    /// Embeddings API key. If not set, uses `api_key`.
    pub embedding_api_key: Option<String>,
    /// Embeddings API base URL. If not set, uses `api_base`.
    pub embedding_api_base: Option<String>,
    pub embedding_model: Option<String>,
    /// JSON array of patient discharge records.
    pub patients_path: PathBuf,
    /// JSON array of reference passages for the knowledge base. Unset means an empty base.
    pub knowledge_path: Option<PathBuf>,
    /// SQLite file for sessions. Unset keeps sessions in memory.
    pub db_path: Option<PathBuf>,
    pub verbose: bool,
    pub engine: EngineConfig,
}

impl RunConfig {
    /// Fill config from env vars. Call `dotenv::dotenv().ok()` first to pick up `.env`.
    ///
    /// `OPENAI_API_KEY` required; `OPENAI_API_BASE`, `OPENAI_MODEL` have defaults.
    /// `OPENAI_TEMPERATURE` optional. For embeddings: `EMBEDDING_API_KEY`,
    /// `EMBEDDING_API_BASE`, `EMBEDDING_MODEL`. Data: `PATIENTS_PATH`, `KNOWLEDGE_PATH`,
    /// `DB_PATH`. Engine tunables come from [`EngineConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;
        let api_base =
            std::env::var("OPENAI_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let temperature = match std::env::var("OPENAI_TEMPERATURE") {
            Ok(raw) => Some(raw.trim().parse::<f32>().map_err(|_| ConfigError::Invalid {
                key: "OPENAI_TEMPERATURE",
                value: raw.clone(),
            })?),
            Err(_) => None,
        };
        let patients_path = std::env::var("PATIENTS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PATIENTS_PATH));

        Ok(Self {
            api_base,
            api_key,
            model,
            temperature,
            embedding_api_key: std::env::var("EMBEDDING_API_KEY").ok(),
            embedding_api_base: std::env::var("EMBEDDING_API_BASE").ok(),
            embedding_model: std::env::var("EMBEDDING_MODEL").ok(),
            patients_path,
            knowledge_path: std::env::var("KNOWLEDGE_PATH").ok().map(PathBuf::from),
            db_path: std::env::var("DB_PATH").ok().map(PathBuf::from),
            verbose: false,
            engine: EngineConfig::from_env(),
        })
    }

    /// Apply overrides from `RunOptions`; only set fields replace the env values.
    pub fn apply_options(&mut self, options: &super::RunOptions) {
        if let Some(t) = options.temperature {
            self.temperature = Some(t);
        }
        if let Some(p) = &options.patients_path {
            self.patients_path = p.clone();
        }
        if let Some(p) = &options.knowledge_path {
            self.knowledge_path = Some(p.clone());
        }
        if let Some(p) = &options.db_path {
            self.db_path = Some(p.clone());
        }
        self.verbose = options.verbose;
    }

    /// Effective embedding API key (falls back to the chat API key).
    pub fn embedding_api_key(&self) -> &str {
        self.embedding_api_key.as_deref().unwrap_or(&self.api_key)
    }

    /// Effective embedding API base URL (falls back to the chat API base).
    pub fn embedding_api_base(&self) -> &str {
        self.embedding_api_base.as_deref().unwrap_or(&self.api_base)
    }

    pub fn embedding_model(&self) -> &str {
        self.embedding_model
            .as_deref()
            .unwrap_or(DEFAULT_EMBEDDING_MODEL)
    }

    pub fn chat_openai_config(&self) -> OpenAIConfig {
        OpenAIConfig::new()
            .with_api_base(&self.api_base)
            .with_api_key(&self.api_key)
    }

    pub fn embedding_openai_config(&self) -> OpenAIConfig {
        OpenAIConfig::new()
            .with_api_base(self.embedding_api_base())
            .with_api_key(self.embedding_api_key())
    }
}

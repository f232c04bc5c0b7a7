//! Layered configuration loader.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` environment variables (nested keys separated by `__`, e.g.
//! `APP_CHUNKING__CHUNK_SIZE=400`). The environment name comes from `RUST_ENV`.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::error::{Error, Result};
use crate::types::EMBEDDING_DIM;

pub const ENV_PREFIX: &str = "APP_";

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Load from the working directory using `RUST_ENV` (default `dev`).
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    pub fn load_from(dir: &Path, env_name: &str) -> Result<Self> {
        Self::layered(dir, env_name, ENV_PREFIX)
    }

    /// Build the full provider stack with a custom environment prefix.
    pub fn layered(dir: &Path, env_name: &str, env_prefix: &str) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            other => tracing::warn!(env = other, "unknown RUST_ENV, skipping env-specific config file"),
        }
        figment = figment.merge(Env::prefixed(env_prefix).split("__"));
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

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub chunking: ChunkingSettings,
    pub embedding: EmbeddingSettings,
    pub search: SearchSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_CHUNK_OVERLAP }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Deterministic hash-seeded vectors.
    Hash,
    /// OpenAI-compatible `/v1/embeddings` endpoint.
    OpenAi,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbedderKind,
    pub dimension: usize,
    pub model: String,
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbedderKind::Hash,
            dimension: EMBEDDING_DIM,
            model: "text-embedding-3-small".to_string(),
            endpoint: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_k: usize,
    /// Hits fetched when assembling the context of an application.
    pub context_k: usize,
    /// Hits kept per source in an assembled context.
    pub per_source: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_k: 5, context_k: 15, per_source: 5 }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let ChunkingSettings { chunk_size, overlap } = self.chunking;
        if chunk_size == 0 || chunk_size <= overlap {
            return Err(Error::InvalidConfig(format!(
                "chunking.chunk_size ({chunk_size}) must be greater than chunking.overlap ({overlap})"
            )));
        }
        if self.embedding.dimension == 0 {
            return Err(Error::InvalidConfig("embedding.dimension must be non-zero".to_string()));
        }
        if self.embedding.timeout_secs == 0 {
            return Err(Error::InvalidConfig("embedding.timeout_secs must be non-zero".to_string()));
        }
        if self.search.default_k == 0 || self.search.context_k == 0 || self.search.per_source == 0 {
            return Err(Error::InvalidConfig("search limits must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Config {
        Config::from_figment(
            Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml)),
        )
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = from_toml("").settings().expect("settings");
        assert_eq!(settings.chunking.chunk_size, 500);
        assert_eq!(settings.chunking.overlap, 50);
        assert_eq!(settings.embedding.dimension, 1536);
        assert_eq!(settings.embedding.provider, EmbedderKind::Hash);
        assert_eq!(settings.search.default_k, 5);
        assert_eq!(settings.search.context_k, 15);
        assert_eq!(settings.search.per_source, 5);
    }

    #[test]
    fn toml_overrides_single_keys() {
        let config = from_toml(
            r#"
            [chunking]
            chunk_size = 200

            [embedding]
            provider = "openai"
            "#,
        );
        let settings = config.settings().expect("settings");
        assert_eq!(settings.chunking.chunk_size, 200);
        assert_eq!(settings.chunking.overlap, 50, "untouched keys keep defaults");
        assert_eq!(settings.embedding.provider, EmbedderKind::OpenAi);
        assert_eq!(config.get::<usize>("chunking.chunk_size").expect("get"), 200);
    }

    #[test]
    fn overlap_not_below_size_is_rejected() {
        let err = from_toml("[chunking]\nchunk_size = 50\noverlap = 50\n").settings().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)), "got {err:?}");
    }

    #[test]
    fn missing_key_is_invalid_config() {
        let err = from_toml("").get::<String>("nope.nothing").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}

//! Embeddings from an OpenAI-compatible `/v1/embeddings` endpoint.
//!
//! Calls are blocking and bounded by the client timeout. Blank inputs never
//! leave the process; they are answered with zero vectors locally.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use underwrite_core::config::EmbeddingSettings;
use underwrite_core::{Error, Result, TextEmbedder};

use crate::norm::l2_normalize;

pub struct OpenAiEmbedder {
    endpoint: String,
    key: String,
    model: String,
    dim: usize,
    id: String,
    client: reqwest::blocking::Client,
}

impl OpenAiEmbedder {
    pub fn new(endpoint: &str, api_key: &str, model: &str, dim: usize, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Embedding(format!("http client: {e}")))?;
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key: api_key.to_string(),
            model: model.to_string(),
            dim,
            id: format!("openai:{model}:d{dim}"),
            client,
        })
    }

    /// Build from settings, reading the API key from `settings.api_key_env`.
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let key = std::env::var(&settings.api_key_env).map_err(|_| {
            Error::InvalidConfig(format!("missing API key; set {}", settings.api_key_env))
        })?;
        Self::new(
            &settings.endpoint,
            &key,
            &settings.model,
            settings.dimension,
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn request(&self, input: Vec<String>) -> Result<EmbeddingResponse> {
        let request = EmbeddingRequest { model: self.model.clone(), input };
        let response = self
            .client
            .post(format!("{}/v1/embeddings", self.endpoint))
            .bearer_auth(&self.key)
            .json(&request)
            .send()
            .map_err(|e| {
                error!("Error in embedding request: {e}");
                if e.is_timeout() {
                    Error::Embedding(format!("request timed out: {e}"))
                } else {
                    Error::Embedding(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = match serde_json::from_str::<OpenAiError>(&body) {
                Ok(err) => err.to_string(),
                Err(_) => body,
            };
            error!(%status, "embedding request failed: {message}");
            return Err(Error::Embedding(format!("status {status}: {message}")));
        }

        response
            .json::<EmbeddingResponse>()
            .map_err(|e| Error::Embedding(format!("decode response: {e}")))
    }
}

impl TextEmbedder for OpenAiEmbedder {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let positions: Vec<usize> = texts
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.trim().is_empty())
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            return Ok(vec![vec![0.0; self.dim]; texts.len()]);
        }
        let input = positions.iter().map(|&i| texts[i].clone()).collect();
        let response = self.request(input)?;
        if let Some(usage) = &response.usage {
            debug!(
                "Embedded {} input(s) with '{}', used tokens {}-{} (prompt-total)",
                positions.len(),
                response.model,
                usage.prompt_tokens,
                usage.total_tokens
            );
        }
        assemble(texts.len(), &positions, response.data, self.dim)
    }
}

/// Place returned embeddings at their input positions, zero-filling blanks.
///
/// `positions[i]` is the batch slot of the `i`-th text sent to the endpoint;
/// the endpoint reports that text back under `index == i`.
pub(crate) fn assemble(
    len: usize,
    positions: &[usize],
    data: Vec<EmbeddingObject>,
    dim: usize,
) -> Result<Vec<Vec<f32>>> {
    if data.len() != positions.len() {
        return Err(Error::Embedding(format!(
            "expected {} embeddings, got {}",
            positions.len(),
            data.len()
        )));
    }
    let mut out = vec![vec![0.0; dim]; len];
    let mut filled = vec![false; positions.len()];
    for object in data {
        let Some(&slot) = positions.get(object.index) else {
            return Err(Error::Embedding(format!("unexpected embedding index {}", object.index)));
        };
        if filled[object.index] {
            return Err(Error::Embedding(format!("duplicate embedding index {}", object.index)));
        }
        if object.embedding.len() != dim {
            return Err(Error::DimensionMismatch { expected: dim, actual: object.embedding.len() });
        }
        let mut v = object.embedding;
        l2_normalize(&mut v);
        out[slot] = v;
        filled[object.index] = true;
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingObject>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddingObject {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: usize,
    total_tokens: usize,
}

#[derive(Debug, Deserialize, thiserror::Error)]
#[error("{message}, type: {r#type}, param: {param:?}, code: {code:?}")]
struct OpenAiErrorParams {
    message: String,
    r#type: String,
    param: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize, thiserror::Error)]
#[error("OpenAI error response {{ {error} }}")]
struct OpenAiError {
    error: OpenAiErrorParams,
}

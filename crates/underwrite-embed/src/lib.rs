//! Embedding strategies behind [`underwrite_core::TextEmbedder`].
//!
//! - [`HashEmbedder`]: deterministic, offline, used by default and in tests.
//! - [`OpenAiEmbedder`]: a real model behind an OpenAI-compatible API.

use std::sync::Arc;

use tracing::info;
use underwrite_core::config::{EmbedderKind, EmbeddingSettings};
use underwrite_core::{Result, TextEmbedder};

mod hash;
mod norm;
pub mod remote;

pub use hash::HashEmbedder;
pub use norm::{l2_norm, l2_normalize};
pub use remote::OpenAiEmbedder;

/// Environment switch that forces the hash embedder regardless of settings.
pub const FAKE_EMBEDDINGS_ENV: &str = "APP_USE_FAKE_EMBEDDINGS";

/// Build the embedder selected by `settings.provider`.
pub fn embedder_from_settings(settings: &EmbeddingSettings) -> Result<Arc<dyn TextEmbedder>> {
    if use_fake_embeddings() {
        info!("{FAKE_EMBEDDINGS_ENV} set, using hash embedder");
        return Ok(Arc::new(HashEmbedder::new(settings.dimension)));
    }
    let embedder: Arc<dyn TextEmbedder> = match settings.provider {
        EmbedderKind::Hash => Arc::new(HashEmbedder::new(settings.dimension)),
        EmbedderKind::OpenAi => Arc::new(OpenAiEmbedder::from_settings(settings)?),
    };
    info!(embedder = embedder.embedder_id(), "embedder ready");
    Ok(embedder)
}

fn use_fake_embeddings() -> bool {
    std::env::var(FAKE_EMBEDDINGS_ENV)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

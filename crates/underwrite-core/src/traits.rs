use crate::error::Result;

/// Strategy that turns text into fixed-width vectors.
///
/// Implementations must return one vector per input, in input order, each
/// exactly `dim()` long. Blank input maps to the zero vector and everything
/// else to a unit-length vector.
pub trait TextEmbedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `hash:xxh64:d1536`).
    fn embedder_id(&self) -> &str;
    /// Embedding dimensionality.
    fn dim(&self) -> usize;
    /// Compute embeddings for a batch of input texts.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

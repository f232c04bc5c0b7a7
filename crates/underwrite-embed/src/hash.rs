use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twox_hash::XxHash64;

use underwrite_core::{Result, TextEmbedder, EMBEDDING_DIM};

use crate::norm::l2_normalize;

/// Deterministic stand-in for a real embedding model.
///
/// Each text seeds a PRNG with its XxHash64 digest and draws `dim` uniform
/// values in `[0, 1)`, normalised to unit length. Identical text always gives
/// a bit-identical vector; blank text gives the zero vector. Similarity
/// between different texts carries no meaning.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
    id: String,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim, id: format!("hash:xxh64:d{dim}") }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        if text.trim().is_empty() {
            return vec![0.0; self.dim];
        }
        let mut rng = StdRng::seed_from_u64(seed_for(text));
        let mut v: Vec<f32> = (0..self.dim).map(|_| rng.gen::<f32>()).collect();
        l2_normalize(&mut v);
        v
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIM)
    }
}

impl TextEmbedder for HashEmbedder {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

fn seed_for(text: &str) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(text.as_bytes());
    hasher.finish()
}

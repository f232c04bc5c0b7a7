//! Domain types shared by the chunker, the index and the context layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Embedding width used across the application.
pub const EMBEDDING_DIM: usize = 1536;

/// Source label for policy documents.
pub const POLICY: &str = "policy";
/// Source label for claim histories.
pub const CLAIMS: &str = "claims";
/// Source label for regulations of a line of business.
pub const REGULATIONS: &str = "regulations";

/// Metadata stored alongside every vector in the index.
///
/// - `source`: caller-defined category (e.g. "policy")
/// - `doc_id`: document identity within its source
/// - `chunk_index`: position of the chunk within the batch produced by one `add`
/// - `text`: the chunk payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub doc_id: String,
    pub chunk_index: usize,
    pub text: String,
}

/// One hit returned by a similarity search.
///
/// `distance` is the squared Euclidean distance to the query vector;
/// smaller is more relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub source: String,
    pub doc_id: String,
    pub chunk_index: usize,
    pub text: String,
    pub distance: f32,
}

impl SearchResult {
    pub fn from_metadata(meta: &ChunkMetadata, distance: f32) -> Self {
        Self {
            source: meta.source.clone(),
            doc_id: meta.doc_id.clone(),
            chunk_index: meta.chunk_index,
            text: meta.text.clone(),
            distance,
        }
    }
}

/// Snapshot of index counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_vectors: usize,
    pub total_chunks: usize,
    pub chunks_by_source: BTreeMap<String, usize>,
    pub dimension: usize,
}

impl IndexStats {
    /// Chunk count for `source`, zero when the source was never added.
    pub fn source_count(&self, source: &str) -> usize {
        self.chunks_by_source.get(source).copied().unwrap_or(0)
    }
}

/// A document read from disk, tagged with its source category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub source: String,
    pub doc_id: String,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_result_serializes_with_flat_fields() {
        let meta = ChunkMetadata {
            source: POLICY.to_string(),
            doc_id: "XYZ".to_string(),
            chunk_index: 2,
            text: "Coverage".to_string(),
        };
        let value = serde_json::to_value(SearchResult::from_metadata(&meta, 0.5)).expect("json");
        assert_eq!(
            value,
            serde_json::json!({
                "source": "policy",
                "doc_id": "XYZ",
                "chunk_index": 2,
                "text": "Coverage",
                "distance": 0.5
            })
        );
    }

    #[test]
    fn missing_source_counts_as_zero() {
        let stats = IndexStats {
            total_vectors: 3,
            total_chunks: 3,
            chunks_by_source: BTreeMap::from([(CLAIMS.to_string(), 3)]),
            dimension: EMBEDDING_DIM,
        };
        assert_eq!(stats.source_count(CLAIMS), 3);
        assert_eq!(stats.source_count(REGULATIONS), 0);
    }
}

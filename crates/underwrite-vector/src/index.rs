use std::collections::BTreeMap;

use underwrite_core::{ChunkMetadata, Error, IndexStats, Result};

use crate::search::{nearest, Neighbor};

/// Append-only flat vector store with parallel metadata.
///
/// Vectors live in one contiguous buffer of `len() * dimension` floats; row
/// `i` of the buffer belongs to `metadata[i]`. Batches are validated in full
/// before anything is written, so a failed append leaves the index as it was.
/// `dimension` must be non-zero.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
    metadata: Vec<ChunkMetadata>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self { dimension, data: Vec::new(), metadata: Vec::new() }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.metadata.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.is_empty()
    }

    /// Number of stored vectors, derived from the raw buffer.
    pub fn vector_count(&self) -> usize {
        self.data.len().checked_div(self.dimension).unwrap_or(0)
    }

    pub fn vector(&self, i: usize) -> Option<&[f32]> {
        let start = i.checked_mul(self.dimension)?;
        self.data.get(start..start + self.dimension)
    }

    pub fn metadata(&self, i: usize) -> Option<&ChunkMetadata> {
        self.metadata.get(i)
    }

    /// Append a batch of vectors and their metadata as one unit.
    pub fn append(&mut self, vectors: Vec<Vec<f32>>, metadata: Vec<ChunkMetadata>) -> Result<()> {
        if vectors.len() != metadata.len() {
            return Err(Error::Storage(format!(
                "batch shape mismatch: {} vectors for {} metadata records",
                vectors.len(),
                metadata.len()
            )));
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dimension) {
            return Err(Error::DimensionMismatch { expected: self.dimension, actual: bad.len() });
        }
        self.data.reserve(vectors.len() * self.dimension);
        for v in vectors {
            self.data.extend_from_slice(&v);
        }
        self.metadata.extend(metadata);
        Ok(())
    }

    /// Exact k nearest neighbours of `query` by squared L2 distance.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimension {
            return Err(Error::DimensionMismatch { expected: self.dimension, actual: query.len() });
        }
        Ok(nearest(query, self.data.chunks_exact(self.dimension), k))
    }

    pub fn stats(&self) -> IndexStats {
        let mut chunks_by_source: BTreeMap<String, usize> = BTreeMap::new();
        for meta in &self.metadata {
            *chunks_by_source.entry(meta.source.clone()).or_insert(0) += 1;
        }
        IndexStats {
            total_vectors: self.vector_count(),
            total_chunks: self.metadata.len(),
            chunks_by_source,
            dimension: self.dimension,
        }
    }
}

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error, info, warn};

use underwrite_core::config::Settings;
use underwrite_core::{ChunkMetadata, Chunker, Error, IndexStats, Result, SearchResult, TextEmbedder};

use crate::index::FlatIndex;

/// Default number of hits returned by [`VectorIndexService::search`].
pub const DEFAULT_K: usize = 5;

/// Handle shared by every consumer of the process-wide index.
pub type SharedIndex = Arc<VectorIndexService>;

/// Chunks, embeds and stores texts; answers similarity queries.
///
/// The flat index sits behind a single `RwLock`. Chunking and embedding run
/// before the lock is taken, so the write lock is only held for the append
/// and readers never wait on the embedding model.
pub struct VectorIndexService {
    embedder: Arc<dyn TextEmbedder>,
    chunker: Chunker,
    index: RwLock<FlatIndex>,
}

impl VectorIndexService {
    pub fn new(embedder: Arc<dyn TextEmbedder>, chunker: Chunker) -> Result<Self> {
        let dimension = embedder.dim();
        if dimension == 0 {
            return Err(Error::InvalidConfig(format!(
                "embedder '{}' reports zero dimension",
                embedder.embedder_id()
            )));
        }
        info!(embedder = embedder.embedder_id(), dimension, "vector index initialized");
        Ok(Self { embedder, chunker, index: RwLock::new(FlatIndex::new(dimension)) })
    }

    /// Service with the default 500/50 chunker.
    pub fn with_embedder(embedder: Arc<dyn TextEmbedder>) -> Result<Self> {
        Self::new(embedder, Chunker::default())
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let embedder = underwrite_embed::embedder_from_settings(&settings.embedding)?;
        let chunker = Chunker::new(settings.chunking.chunk_size, settings.chunking.overlap)?;
        Self::new(embedder, chunker)
    }

    pub fn shared(self) -> SharedIndex {
        Arc::new(self)
    }

    pub fn dimension(&self) -> usize {
        self.read().dimension()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn embedder(&self) -> &dyn TextEmbedder {
        self.embedder.as_ref()
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    /// Chunk every non-blank text and concatenate the chunks in order.
    pub fn chunk_texts<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>> {
        let mut all_chunks = Vec::new();
        for text in texts.iter().map(AsRef::as_ref).filter(|t| !t.trim().is_empty()) {
            all_chunks.extend(self.chunker.chunk(text)?.map(str::to_owned));
        }
        Ok(all_chunks)
    }

    /// Index `texts` under `source`/`doc_id`, returning the number of chunks added.
    ///
    /// Nothing is stored unless every chunk was embedded and validated.
    pub fn try_add<S: AsRef<str>>(&self, texts: &[S], source: &str, doc_id: &str) -> Result<usize> {
        let all_chunks = self.chunk_texts(texts)?;
        if all_chunks.is_empty() {
            warn!(source, doc_id, "no valid chunks created");
            return Ok(0);
        }

        let vectors = self.embedder.embed_batch(&all_chunks)?;
        if vectors.len() != all_chunks.len() {
            return Err(Error::Storage(format!(
                "embedder returned {} vectors for {} chunks",
                vectors.len(),
                all_chunks.len()
            )));
        }

        let added = all_chunks.len();
        let metadata = all_chunks
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| ChunkMetadata {
                source: source.to_string(),
                doc_id: doc_id.to_string(),
                chunk_index,
                text,
            })
            .collect();

        let mut index = self.write();
        index.append(vectors, metadata)?;
        info!(source, doc_id, added, total = index.len(), "added chunks to index");
        Ok(added)
    }

    /// Like [`try_add`](Self::try_add) but fails closed: errors are logged
    /// and reported as zero chunks added.
    pub fn add<S: AsRef<str>>(&self, texts: &[S], source: &str, doc_id: &str) -> usize {
        match self.try_add(texts, source, doc_id) {
            Ok(added) => added,
            Err(e) => {
                error!(source, doc_id, transient = e.is_transient(), "failed to add to index: {e}");
                0
            }
        }
    }

    /// Exact k-nearest-neighbour search for `query`.
    pub fn try_search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            warn!("empty query provided for search");
            return Ok(Vec::new());
        }
        if self.is_empty() {
            warn!("search called on empty index");
            return Ok(Vec::new());
        }

        let query_vec = self
            .embedder
            .embed_batch(&[query.to_string()])?
            .pop()
            .ok_or_else(|| Error::Embedding("embedder returned no vector for query".to_string()))?;

        let index = self.read();
        let k = k.min(index.len());
        let results: Vec<SearchResult> = index
            .search(&query_vec, k)?
            .into_iter()
            .filter_map(|hit| {
                index
                    .metadata(hit.position)
                    .map(|meta| SearchResult::from_metadata(meta, hit.distance))
            })
            .collect();
        debug!(query = %preview(query), k, hits = results.len(), "search complete");
        Ok(results)
    }

    /// Like [`try_search`](Self::try_search) but fails closed.
    pub fn search(&self, query: &str, k: usize) -> Vec<SearchResult> {
        self.try_search(query, k).unwrap_or_else(|e| {
            error!(query = %preview(query), transient = e.is_transient(), "search failed: {e}");
            Vec::new()
        })
    }

    pub fn stats(&self) -> IndexStats {
        self.read().stats()
    }

    /// Raw embeddings from the configured embedder.
    pub fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embedder.embed_batch(texts)
    }

    // Appends are all-or-nothing, so a poisoned lock still guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, FlatIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, FlatIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn preview(query: &str) -> String {
    query.chars().take(30).collect()
}

#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod error;
pub mod tokenize;
pub mod traits;
pub mod types;

pub use chunker::{Chunker, Chunks};
pub use error::{Error, Result};
pub use traits::TextEmbedder;
pub use types::{ChunkMetadata, IndexStats, SearchResult, SourceDocument, EMBEDDING_DIM};

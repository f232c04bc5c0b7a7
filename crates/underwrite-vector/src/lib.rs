//! In-memory vector index for underwriting retrieval.
//!
//! [`VectorIndexService`] chunks source texts, embeds the chunks and keeps
//! them in a [`FlatIndex`] for exact L2 nearest-neighbour search. One service
//! is built at startup and shared as a [`SharedIndex`].

pub mod index;
pub mod search;
pub mod service;

pub use index::FlatIndex;
pub use search::{nearest, squared_l2, Neighbor};
pub use service::{SharedIndex, VectorIndexService, DEFAULT_K};

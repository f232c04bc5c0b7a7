//! Context retrieval for one insurance application.
//!
//! Turns the application's attributes into a search query, indexes the
//! policy, claims and regulation texts that come with it, and groups the
//! closest chunks by source.

pub mod query;
pub mod retriever;

pub use query::{build_query, ApplicationProfile};
pub use retriever::{ApplicationContext, ContextRetriever, RetrievedContext};

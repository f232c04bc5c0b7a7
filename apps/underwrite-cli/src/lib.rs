//! Operator CLI: load a corpus into a fresh index and query it.

pub mod cli;
pub mod ingest;
pub mod run;

pub use cli::{Cli, Commands};
pub use run::{init_tracing, run};

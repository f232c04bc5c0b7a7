use std::env;
use std::io::IsTerminal;
use std::path::Path;

use anyhow::Context as _;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use underwrite_context::{ApplicationContext, ApplicationProfile, ContextRetriever};
use underwrite_core::config::{Config, Settings};
use underwrite_core::corpus::load_corpus_limited;
use underwrite_core::types::{CLAIMS, POLICY, REGULATIONS};
use underwrite_core::SourceDocument;
use underwrite_vector::{SharedIndex, VectorIndexService};

use crate::cli::{Cli, Commands};
use crate::ingest::{find_document, ingest};

/// Install the stderr subscriber. `filter` wins over `RUST_LOG`; `info` is the fallback.
pub fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_settings(config_dir: &Path) -> anyhow::Result<Settings> {
    let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    let settings = Config::load_from(config_dir, &env_name)?
        .settings()
        .with_context(|| format!("loading settings from {}", config_dir.display()))?;
    Ok(settings)
}

/// Execute one command and return its JSON output.
pub fn run(cli: Cli) -> anyhow::Result<Value> {
    let settings = load_settings(&cli.config_dir)?;
    let index = VectorIndexService::from_settings(&settings)?.shared();

    match cli.command {
        Commands::Search { query, k, data_dir, limit } => {
            if let Some(dir) = data_dir {
                ingest(&index, &load_documents(&dir, limit)?, progress_enabled())?;
            }
            let k = k.unwrap_or(settings.search.default_k);
            let results = index.try_search(&query, k)?;
            info!(hits = results.len(), k, "search finished");
            to_json(&results)
        }
        Commands::Stats { data_dir, limit } => {
            if let Some(dir) = data_dir {
                ingest(&index, &load_documents(&dir, limit)?, progress_enabled())?;
            }
            to_json(&index.stats())
        }
        Commands::Embed { texts } => {
            let embeddings = index.embed_many(&texts)?;
            Ok(json!({
                "model": index.embedder().embedder_id(),
                "input_count": texts.len(),
                "dimension": index.dimension(),
                "embeddings": embeddings,
            }))
        }
        Commands::Retrieve { data_dir, applicant_id, policy_id, lob, coverage_type, coverage_amount, fields, all } => {
            let documents = load_documents(&data_dir, None)?;
            if all {
                let others: Vec<SourceDocument> = documents
                    .iter()
                    .filter(|d| !is_application_document(d, &applicant_id, &policy_id, &lob))
                    .cloned()
                    .collect();
                ingest(&index, &others, progress_enabled())?;
            }

            let text_of = |source: &str, doc_id: &str| {
                let text = find_document(&documents, source, doc_id).map(|d| d.text.clone());
                if text.is_none() {
                    warn!(source, doc_id, "document not found in corpus");
                }
                text.unwrap_or_default()
            };
            let mut profile = ApplicationProfile::from_pairs(fields);
            if !coverage_type.is_empty() {
                profile.coverage_type = coverage_type;
            }
            if !coverage_amount.is_empty() {
                profile.coverage_amount = coverage_amount;
            }
            let app = ApplicationContext {
                policy_text: text_of(POLICY, &policy_id),
                claims_text: text_of(CLAIMS, &applicant_id),
                regulations_text: text_of(REGULATIONS, &lob),
                applicant_id,
                policy_id,
                lob,
                profile,
            };

            let retriever = ContextRetriever::from_settings(SharedIndex::clone(&index), &settings.search);
            to_json(&retriever.retrieve(&app))
        }
    }
}

fn load_documents(dir: &Path, limit: Option<usize>) -> anyhow::Result<Vec<SourceDocument>> {
    load_corpus_limited(dir, limit.unwrap_or(usize::MAX))
        .with_context(|| format!("loading corpus from {}", dir.display()))
}

fn is_application_document(doc: &SourceDocument, applicant_id: &str, policy_id: &str, lob: &str) -> bool {
    (doc.source == POLICY && doc.doc_id == policy_id)
        || (doc.source == CLAIMS && doc.doc_id == applicant_id)
        || (doc.source == REGULATIONS && doc.doc_id == lob)
}

fn progress_enabled() -> bool {
    std::io::stderr().is_terminal()
}

fn to_json<T: Serialize>(value: &T) -> anyhow::Result<Value> {
    Ok(serde_json::to_value(value)?)
}

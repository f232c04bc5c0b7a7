use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use underwrite_core::config::SearchSettings;
use underwrite_core::types::{CLAIMS, POLICY, REGULATIONS};
use underwrite_core::SearchResult;
use underwrite_vector::SharedIndex;

use crate::query::ApplicationProfile;

/// Everything known about one application at retrieval time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationContext {
    pub applicant_id: String,
    pub policy_id: String,
    /// Line of business; regulation texts are filed under it.
    pub lob: String,
    #[serde(default)]
    pub policy_text: String,
    #[serde(default)]
    pub claims_text: String,
    #[serde(default)]
    pub regulations_text: String,
    #[serde(default)]
    pub profile: ApplicationProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedContext {
    pub chunks_added: usize,
    pub query: String,
    pub policy_chunks: Vec<String>,
    pub claims_chunks: Vec<String>,
    pub regulations_chunks: Vec<String>,
    /// All hits of the context search, closest first.
    pub results: Vec<SearchResult>,
}

/// Indexes an application's documents and pulls back the closest chunks.
pub struct ContextRetriever {
    index: SharedIndex,
    context_k: usize,
    per_source: usize,
}

impl ContextRetriever {
    pub fn new(index: SharedIndex, context_k: usize, per_source: usize) -> Self {
        Self { index, context_k, per_source }
    }

    pub fn from_settings(index: SharedIndex, settings: &SearchSettings) -> Self {
        Self::new(index, settings.context_k, settings.per_source)
    }

    pub fn index(&self) -> &SharedIndex {
        &self.index
    }

    pub fn retrieve(&self, app: &ApplicationContext) -> RetrievedContext {
        info!(applicant = %app.applicant_id, policy = %app.policy_id, lob = %app.lob, "retrieving application context");
        let query = app.profile.query();

        let chunks_added: usize = [
            (POLICY, app.policy_id.as_str(), app.policy_text.as_str()),
            (CLAIMS, app.applicant_id.as_str(), app.claims_text.as_str()),
            (REGULATIONS, app.lob.as_str(), app.regulations_text.as_str()),
        ]
        .into_iter()
        .filter(|(_, _, text)| !text.is_empty())
        .map(|(source, doc_id, text)| {
            let added = self.index.add(&[text], source, doc_id);
            info!(source, doc_id, added, "indexed application document");
            added
        })
        .sum();

        let results = self.index.search(&query, self.context_k);
        if results.is_empty() {
            warn!(query = %query, "no relevant chunks found for application");
        }

        let context = RetrievedContext {
            chunks_added,
            policy_chunks: self.take_source(&results, POLICY),
            claims_chunks: self.take_source(&results, CLAIMS),
            regulations_chunks: self.take_source(&results, REGULATIONS),
            query,
            results,
        };
        info!(
            chunks_added,
            policy = context.policy_chunks.len(),
            claims = context.claims_chunks.len(),
            regulations = context.regulations_chunks.len(),
            "context retrieved"
        );
        context
    }

    fn take_source(&self, results: &[SearchResult], source: &str) -> Vec<String> {
        results
            .iter()
            .filter(|r| r.source == source)
            .take(self.per_source)
            .map(|r| r.text.clone())
            .collect()
    }
}

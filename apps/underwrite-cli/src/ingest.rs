use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use underwrite_core::SourceDocument;
use underwrite_vector::VectorIndexService;

/// Add every document to `index`, one `add` per document. Returns the number
/// of chunks stored.
pub fn ingest(index: &VectorIndexService, documents: &[SourceDocument], show_progress: bool) -> anyhow::Result<usize> {
    let pb = if show_progress { ProgressBar::new(documents.len() as u64) } else { ProgressBar::hidden() };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} docs ({percent}%) {msg}")?
            .progress_chars("#>-"),
    );
    let mut chunks = 0usize;
    for doc in documents {
        pb.set_message(format!("{}/{}", doc.source, doc.doc_id));
        chunks += index.add(&[doc.text.as_str()], &doc.source, &doc.doc_id);
        pb.inc(1);
    }
    pb.finish_with_message(format!("{chunks} chunks"));
    info!(documents = documents.len(), chunks, "corpus ingested");
    Ok(chunks)
}

/// The document filed as `<source>/<doc_id>.txt`, if present.
pub fn find_document<'a>(documents: &'a [SourceDocument], source: &str, doc_id: &str) -> Option<&'a SourceDocument> {
    documents.iter().find(|d| d.source == source && d.doc_id == doc_id)
}

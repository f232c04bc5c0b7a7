//! Loads a directory of `.txt` documents laid out as `<source>/<doc_id>.txt`.
//!
//! The parent directory (relative to the corpus root) names the source
//! category and the file stem names the document. Files directly under the
//! root fall into the `misc` source.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::SourceDocument;

pub const DEFAULT_SOURCE: &str = "misc";

pub fn load_corpus(root: &Path) -> Result<Vec<SourceDocument>> {
    load_corpus_limited(root, usize::MAX)
}

pub fn load_corpus_limited(root: &Path, limit: usize) -> Result<Vec<SourceDocument>> {
    if !root.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("corpus root {} is not a directory", root.display()),
        )
        .into());
    }
    let mut files = list_txt_files(root);
    if files.is_empty() {
        warn!(root = %root.display(), "no .txt files found");
        return Ok(vec![]);
    }
    if files.len() > limit {
        files.truncate(limit);
        info!(limit, "limited corpus to first files");
    }
    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        documents.push(SourceDocument {
            source: source_for(path, root),
            doc_id: doc_id_for(path),
            text: read_file_content(path)?,
        });
    }
    info!(documents = documents.len(), root = %root.display(), "loaded corpus");
    Ok(documents)
}

fn read_file_content(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).into_owned()),
    }
}

fn doc_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn source_for(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    match relative.parent().and_then(Path::to_str) {
        Some(parent) if !parent.is_empty() => parent.replace('\\', "/"),
        _ => DEFAULT_SOURCE.to_string(),
    }
}

fn list_txt_files(root: &Path) -> Vec<PathBuf> {
    let mut txt_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    txt_files.sort();
    txt_files
}

use std::fs;
use std::path::Path;

use clap::Parser;
use tempfile::TempDir;

use underwrite_cli::{run, Cli};

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn corpus() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "policy/XYZ.txt", "Coverage: $500,000 for water damage");
    write(tmp.path(), "claims/123.txt", "Filed claim for water damage $12,000");
    write(tmp.path(), "regulations/home.txt", "Flood zone disclosure is mandatory for home policies");
    write(tmp.path(), "claims/456.txt", "Windstorm damaged the garage roof");
    tmp
}

fn run_args(config_dir: &Path, args: &[&str]) -> anyhow::Result<serde_json::Value> {
    let mut argv = vec!["underwrite", "--config-dir", config_dir.to_str().unwrap()];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv)?)
}

#[test]
fn stats_after_ingest() -> anyhow::Result<()> {
    let data = corpus();
    let config = TempDir::new()?;
    let out = run_args(config.path(), &["stats", "--data-dir", data.path().to_str().unwrap()])?;
    assert_eq!(out["total_vectors"], 4);
    assert_eq!(out["total_chunks"], 4);
    assert_eq!(out["chunks_by_source"]["claims"], 2);
    assert_eq!(out["dimension"], 1536);
    Ok(())
}

#[test]
fn search_returns_sorted_json_results() -> anyhow::Result<()> {
    let data = corpus();
    let config = TempDir::new()?;
    let out = run_args(
        config.path(),
        &["search", "Windstorm damaged the garage roof", "-k", "3", "--data-dir", data.path().to_str().unwrap()],
    )?;
    let hits = out.as_array().expect("array");
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0]["doc_id"], "456");
    let distances: Vec<f64> = hits.iter().map(|h| h["distance"].as_f64().unwrap()).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    Ok(())
}

#[test]
fn search_without_corpus_is_empty() -> anyhow::Result<()> {
    let config = TempDir::new()?;
    let out = run_args(config.path(), &["search", "anything"])?;
    assert_eq!(out, serde_json::json!([]));
    Ok(())
}

#[test]
fn embed_reports_model_and_shape() -> anyhow::Result<()> {
    let config = TempDir::new()?;
    let out = run_args(config.path(), &["embed", "flood", ""])?;
    assert_eq!(out["input_count"], 2);
    assert_eq!(out["dimension"], 1536);
    assert_eq!(out["model"], "hash:xxh64:d1536");
    let embeddings = out["embeddings"].as_array().unwrap();
    assert_eq!(embeddings.len(), 2);
    assert!(embeddings[1].as_array().unwrap().iter().all(|x| x.as_f64() == Some(0.0)));
    Ok(())
}

#[test]
fn config_file_changes_dimension() -> anyhow::Result<()> {
    let config = TempDir::new()?;
    fs::write(config.path().join("config.toml"), "[embedding]\ndimension = 8\n")?;
    let out = run_args(config.path(), &["embed", "flood"])?;
    assert_eq!(out["dimension"], 8);
    assert_eq!(out["embeddings"][0].as_array().unwrap().len(), 8);
    Ok(())
}

#[test]
fn invalid_config_is_an_error() -> anyhow::Result<()> {
    let config = TempDir::new()?;
    fs::write(config.path().join("config.toml"), "[chunking]\nchunk_size = 10\noverlap = 10\n")?;
    assert!(run_args(config.path(), &["stats"]).is_err());
    Ok(())
}

#[test]
fn retrieve_uses_application_documents() -> anyhow::Result<()> {
    let data = corpus();
    let config = TempDir::new()?;
    let out = run_args(
        config.path(),
        &[
            "retrieve", "--data-dir", data.path().to_str().unwrap(), "--applicant-id", "123", "--policy-id", "XYZ",
            "--lob", "home", "--coverage-type", "Home", "--coverage-amount", "750000", "--field", "year_built=1990",
        ],
    )?;
    assert_eq!(out["query"], "Application for Home coverage amount 750000. year_built: 1990");
    assert_eq!(out["chunks_added"], 3);
    assert_eq!(out["policy_chunks"][0], "Coverage: $500,000 for water damage");
    assert_eq!(out["claims_chunks"][0], "Filed claim for water damage $12,000");
    assert_eq!(out["results"].as_array().unwrap().len(), 3);
    Ok(())
}

#[test]
fn retrieve_all_indexes_rest_of_corpus() -> anyhow::Result<()> {
    let data = corpus();
    let config = TempDir::new()?;
    let out = run_args(
        config.path(),
        &[
            "retrieve", "--data-dir", data.path().to_str().unwrap(), "--applicant-id", "123", "--policy-id", "XYZ",
            "--lob", "home", "--all",
        ],
    )?;
    assert_eq!(out["chunks_added"], 3);
    assert_eq!(out["results"].as_array().unwrap().len(), 4);
    Ok(())
}

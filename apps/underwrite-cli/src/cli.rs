use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "underwrite")]
#[command(about = "Underwriting context retrieval over an in-memory vector index")]
pub struct Cli {
    /// Log filter such as `debug` or `underwrite_vector=trace` (default: RUST_LOG, then info)
    #[arg(long, global = true, value_name = "FILTER")]
    pub log: Option<String>,

    /// Directory holding config.toml and config.<env>.toml
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index a corpus and print the nearest chunks for a query
    Search {
        /// The query string
        query: String,

        /// Number of results (default: search.default_k)
        #[arg(short, long)]
        k: Option<usize>,

        /// Corpus laid out as <source>/<doc_id>.txt
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Only index the first N files
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Index a corpus and print index statistics
    Stats {
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print raw embeddings for the given texts
    Embed {
        #[arg(required = true)]
        texts: Vec<String>,
    },
    /// Assemble the context of one application from a corpus
    Retrieve {
        /// Corpus holding policy/<policy_id>.txt, claims/<applicant_id>.txt, regulations/<lob>.txt
        #[arg(long, value_name = "DIR")]
        data_dir: PathBuf,

        #[arg(long)]
        applicant_id: String,

        #[arg(long)]
        policy_id: String,

        /// Line of business, e.g. home or auto
        #[arg(long)]
        lob: String,

        #[arg(long, default_value = "")]
        coverage_type: String,

        #[arg(long, default_value = "")]
        coverage_amount: String,

        /// Extra application attribute, repeatable
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// Also index every other document of the corpus first
        #[arg(long)]
        all: bool,
    },
}

fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.trim().to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}

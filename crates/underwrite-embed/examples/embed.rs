use underwrite_core::TextEmbedder;
use underwrite_embed::{l2_norm, HashEmbedder};

fn main() -> anyhow::Result<()> {
    let embedder = HashEmbedder::default();
    let texts = vec!["Coverage: $500,000 for water damage".to_string(), String::new()];
    let embs = embedder.embed_batch(&texts)?;
    for (text, emb) in texts.iter().zip(&embs) {
        println!("{:?}: dim={} norm={:.3}", text, emb.len(), l2_norm(emb));
    }
    Ok(())
}

use std::sync::Arc;

use underwrite_embed::HashEmbedder;
use underwrite_vector::VectorIndexService;

fn main() -> anyhow::Result<()> {
    let index = VectorIndexService::with_embedder(Arc::new(HashEmbedder::default()))?.shared();
    index.add(&["Coverage: $500,000 for water damage"], "policy", "XYZ");
    index.add(&["Filed claim for water damage $12,000"], "claims", "123");

    for hit in index.search("water damage claim", 2) {
        println!("{:>8.4}  {}/{}#{}  {}", hit.distance, hit.source, hit.doc_id, hit.chunk_index, hit.text);
    }
    println!("{}", serde_json::to_string_pretty(&index.stats())?);
    Ok(())
}

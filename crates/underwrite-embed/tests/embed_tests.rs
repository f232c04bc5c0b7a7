use underwrite_core::config::EmbeddingSettings;
use underwrite_core::TextEmbedder;
use underwrite_embed::{embedder_from_settings, l2_norm, HashEmbedder};

#[test]
fn hash_embedder_shapes_and_determinism() -> anyhow::Result<()> {
    let embedder = HashEmbedder::default();
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    let v1 = &embs[0];
    let v2 = &embs[1];

    assert_eq!(v1.len(), 1536, "embedding dim is 1536");

    // Norm approximately 1.0
    let norm = l2_norm(v1);
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");

    // Bit-identical for same input, also across separate calls
    assert_eq!(v1, v2);
    assert_eq!(embedder.embed_batch(&texts[..1])?[0], *v1);
    Ok(())
}

#[test]
fn blank_text_maps_to_zero_vector() -> anyhow::Result<()> {
    let embedder = HashEmbedder::default();
    let embs = embedder.embed_batch(&["".to_string(), "   ".to_string()])?;
    assert!(embs.iter().all(|v| v.len() == 1536 && v.iter().all(|x| *x == 0.0)));
    Ok(())
}

#[test]
fn batch_preserves_order_and_length() -> anyhow::Result<()> {
    let embedder = HashEmbedder::new(32);
    let texts: Vec<String> = ["policy", "", "claims", "regulations"].iter().map(|s| s.to_string()).collect();
    let embs = embedder.embed_batch(&texts)?;
    assert_eq!(embs.len(), texts.len());
    for (text, emb) in texts.iter().zip(&embs) {
        assert_eq!(*emb, embedder.embed_text(text));
    }
    assert!(embedder.embed_batch(&[])?.is_empty());
    Ok(())
}

#[test]
fn default_settings_build_hash_embedder() -> anyhow::Result<()> {
    let embedder = embedder_from_settings(&EmbeddingSettings::default())?;
    assert_eq!(embedder.dim(), 1536);
    assert!(embedder.embedder_id().starts_with("hash:"));
    Ok(())
}

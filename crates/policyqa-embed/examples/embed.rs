use policyqa_core::traits::Embedder;
use policyqa_embed::HashEmbedder;

fn main() -> policyqa_core::Result<()> {
    let embedder = HashEmbedder::new(384);
    let texts = vec!["annual deductible".to_string(), "claims process".to_string()];
    let embs = embedder.embed_batch(&texts)?;
    println!("B={} dim={} id={}", embs.len(), embedder.dim(), embedder.embedder_id());
    Ok(())
}

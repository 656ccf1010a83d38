use std::path::PathBuf;

use clap::Parser;

use policyqa_assistant::{KnowledgeBase, RetrievalResult};
use policyqa_cli::{init_tracing, load_settings, spinner, StrategyArg};

#[derive(Parser)]
#[command(name = "policyqa-search", version, about = "Show what retrieval returns for one query")]
struct Cli {
    query: String,

    /// Number of chunks to retrieve (overrides retrieval.k)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    #[arg(long, default_value = ".")]
    config_dir: PathBuf,

    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut settings = load_settings(&cli.config_dir, cli.strategy)?;
    if let Some(limit) = cli.limit {
        settings.retrieval.k = limit;
    }

    let kb = KnowledgeBase::new(settings, &cli.config_dir);
    let pb = spinner("Building index...");
    let retriever = kb.retriever();
    pb.finish_and_clear();
    let retriever = retriever?;

    println!("Query: {}", cli.query);
    match retriever.retrieve(&cli.query)? {
        RetrievalResult::Chunks(hits) => {
            println!("{} hit(s)\n", hits.len());
            for (i, hit) in hits.iter().enumerate() {
                println!("{}. {} (distance {:.4})", i + 1, hit.chunk.id, hit.distance);
                println!("   {}", snippet(&hit.chunk.text, 200));
            }
        }
        RetrievalResult::Extract { category, topic, segments } => {
            println!("category: {}, topic: {}, {} segment(s)\n", category, topic, segments.len());
            for segment in &segments {
                println!("{}\n", segment);
            }
        }
    }
    Ok(())
}

fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    format!("{}...", flat.chars().take(max_chars).collect::<String>())
}

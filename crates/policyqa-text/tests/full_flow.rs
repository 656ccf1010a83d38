use policyqa_core::chunker::split;
use policyqa_core::seed::SEED_DOCUMENTS;
use policyqa_core::types::{Category, Chunk, Topic};
use policyqa_text::{classify_query, CategoryIndex};

fn seed_chunks() -> Vec<Chunk> {
    seed_chunks_sized(1000, 200)
}

fn seed_chunks_sized(chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    SEED_DOCUMENTS
        .iter()
        .flat_map(|(name, text)| split(name.trim_end_matches(".txt"), text, chunk_size, overlap).expect("valid params"))
        .collect()
}

/// The claims section cut straight out of a whole document.
fn whole_claims_section(text: &str) -> String {
    let start = text.find("## Claims Process").expect("document has a claims section");
    let mut lines: Vec<&str> = text[start..]
        .lines()
        .enumerate()
        .take_while(|(i, line)| *i == 0 || !line.starts_with('#'))
        .map(|(_, line)| line.trim())
        .collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[test]
fn every_seed_chunk_lands_in_its_document_bucket() {
    let chunks = seed_chunks();
    let index = CategoryIndex::build(&chunks);
    assert_eq!(index.len(), chunks.len());
    for category in Category::SPECIFIC {
        let bucket = index.bucket(category);
        assert!(!bucket.is_empty(), "{category} bucket empty");
        let expected_doc = format!("{category}_insurance");
        assert!(bucket.iter().all(|c| c.source_doc_id == expected_doc), "{category} bucket mixes documents");
    }
    assert!(index.bucket(Category::General).is_empty());
}

#[test]
fn home_deductible_question_returns_deductible_lines() {
    let index = CategoryIndex::build(&seed_chunks());
    let (category, topic) = classify_query("What's the deductible for home insurance?");
    assert_eq!((category, topic), (Category::Home, Topic::Deductible));

    let segments = index.query(category, topic, 4);
    assert!(!segments.is_empty());
    assert!(segments.iter().all(|s| s.to_lowercase().contains("deductible")));
    assert!(segments.iter().any(|s| s.contains("Deductible Options: $500, $1,000, $2,500")));
}

#[test]
fn claims_topic_extracts_the_claims_section() {
    let index = CategoryIndex::build(&seed_chunks());
    let (category, topic) = classify_query("how do I file a claim after a car accident");
    assert_eq!((category, topic), (Category::Auto, Topic::Claim));

    let segments = index.query(category, topic, 4);
    assert!(!segments.is_empty());
    assert!(segments.iter().all(|s| s.starts_with("## Claims Process")));
    assert!(segments.iter().all(|s| !s.contains("## Frequently")));
}

#[test]
fn claims_section_spanning_chunk_boundaries_comes_out_whole() {
    for (chunk_size, overlap) in [(300, 100), (250, 120), (200, 50)] {
        let index = CategoryIndex::build(&seed_chunks_sized(chunk_size, overlap));
        for ((_, text), category) in SEED_DOCUMENTS.iter().zip(Category::SPECIFIC) {
            let segments = index.query(category, Topic::Claim, 4);
            assert_eq!(segments, vec![whole_claims_section(text)], "{category} at {chunk_size}/{overlap}");
        }
    }
}

#[test]
fn small_chunks_keep_every_deductible_line_once() {
    let index = CategoryIndex::build(&seed_chunks_sized(200, 50));
    let segments = index.query(Category::Home, Topic::Deductible, 4);
    assert_eq!(
        segments,
        vec![
            "- Deductible Options: $500, $1,000, $2,500",
            "- Wind and Hail Deductible: 1%-5% of dwelling coverage in coastal areas",
        ]
    );
}

#[test]
fn overlapping_chunks_do_not_repeat_segments() {
    let index = CategoryIndex::build(&seed_chunks());
    for category in Category::SPECIFIC {
        for topic in [Topic::Premium, Topic::Coverage, Topic::Deductible, Topic::Claim] {
            let segments = index.query(category, topic, 10);
            let mut unique = segments.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), segments.len(), "{category}/{topic}");
        }
    }
}

#[test]
fn general_topic_and_absent_bucket_yield_nothing() {
    let index = CategoryIndex::build(&seed_chunks());
    assert!(index.query(Category::Life, Topic::General, 4).is_empty());
    assert!(index.query(Category::General, Topic::Premium, 4).is_empty());
    assert!(CategoryIndex::build(&[]).query(Category::Home, Topic::Deductible, 4).is_empty());
}

#[test]
fn k_limits_contributing_passages() {
    let chunks: Vec<Chunk> = (0..3)
        .flat_map(|i| split(&format!("home_insurance_{i}"), &format!("- Premium tier {i}\n- Premium note {i}"), 100, 10).expect("split"))
        .collect();
    let index = CategoryIndex::build(&chunks);
    assert_eq!(index.query(Category::Home, Topic::Premium, 1), vec!["- Premium tier 0", "- Premium note 0"]);
    assert_eq!(index.query(Category::Home, Topic::Premium, 0), Vec::<String>::new());
}

#[test]
fn rebuild_is_idempotent() {
    let chunks = seed_chunks();
    let a = CategoryIndex::build(&chunks);
    let b = CategoryIndex::build(&chunks);
    assert_eq!(a.categories().collect::<Vec<_>>(), b.categories().collect::<Vec<_>>());
    for category in Category::SPECIFIC {
        assert_eq!(a.query(category, Topic::Premium, 4), b.query(category, Topic::Premium, 4));
    }
}

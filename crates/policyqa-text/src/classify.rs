//! Fixed keyword rules mapping text to a category and a topic.
//!
//! Check order is significant: the first category (and the first topic) with
//! a matching keyword wins, so "car and house" is `auto`, never `home`.

use policyqa_core::types::{Category, Chunk, Topic};

const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (Category::Health, &["health", "medical", "doctor", "hospital"]),
    (Category::Life, &["life", "death", "beneficiary", "term"]),
    (Category::Auto, &["auto", "car", "vehicle", "accident", "collision"]),
    (Category::Home, &["home", "house", "property", "dwelling"]),
];

const TOPIC_KEYWORDS: [(Topic, &[&str]); 4] = [
    (Topic::Premium, &["premium", "cost", "price"]),
    (Topic::Coverage, &["coverage", "cover", "protect"]),
    (Topic::Claim, &["claim", "file", "process"]),
    (Topic::Deductible, &["deductible"]),
];

/// Phrases that mark a chunk as belonging to a category, in priority order.
const CATEGORY_PHRASES: [(Category, &str); 4] = [
    (Category::Health, "health insurance"),
    (Category::Life, "life insurance"),
    (Category::Auto, "auto insurance"),
    (Category::Home, "home insurance"),
];

pub fn classify_query(query: &str) -> (Category, Topic) {
    let query = query.to_lowercase();
    (query_category(&query), query_topic(&query))
}

fn query_category(lowered: &str) -> Category {
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(c, _)| *c)
        .unwrap_or(Category::General)
}

fn query_topic(lowered: &str) -> Topic {
    TOPIC_KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(t, _)| *t)
        .unwrap_or(Topic::General)
}

/// Category of a chunk: its own text decides; the source document id
/// (`home_insurance` reads as "home insurance") is consulted only when the
/// text names no category.
pub fn classify_chunk(chunk: &Chunk) -> Category {
    phrase_category(&chunk.text.to_lowercase())
        .or_else(|| phrase_category(&chunk.source_doc_id.to_lowercase().replace(['_', '-'], " ")))
        .unwrap_or(Category::General)
}

fn phrase_category(lowered: &str) -> Option<Category> {
    CATEGORY_PHRASES.iter().find(|(_, phrase)| lowered.contains(phrase)).map(|(c, _)| *c)
}

/// Lower-case word a line must contain to be relevant to `topic`.
/// `Claim` is served by section extraction and `General` has no marker.
pub fn line_marker(topic: Topic) -> Option<&'static str> {
    match topic {
        Topic::Premium => Some("premium"),
        Topic::Coverage => Some("coverage"),
        Topic::Deductible => Some("deductible"),
        Topic::Claim | Topic::General => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(doc: &str, text: &str) -> Chunk {
        Chunk {
            id: format!("{doc}:0"),
            source_doc_id: doc.to_string(),
            chunk_index: 0,
            offset_start: 0,
            length: text.chars().count(),
            text: text.to_string(),
        }
    }

    #[test]
    fn auto_wins_over_home() {
        assert_eq!(classify_query("I need help with my car and house").0, Category::Auto);
    }

    #[test]
    fn health_checked_before_life() {
        assert_eq!(classify_query("does my life plan need a medical exam").0, Category::Health);
    }

    #[test]
    fn topic_order_premium_before_deductible() {
        assert_eq!(classify_query("price of a lower deductible"), (Category::General, Topic::Premium));
    }

    #[test]
    fn nothing_matched_is_general() {
        assert_eq!(classify_query("hello there"), (Category::General, Topic::General));
    }

    #[test]
    fn query_matching_is_case_insensitive() {
        assert_eq!(classify_query("HOME DEDUCTIBLE?"), (Category::Home, Topic::Deductible));
    }

    #[test]
    fn chunk_text_beats_document_id() {
        assert_eq!(classify_chunk(&chunk("home_insurance", "Compare with Life Insurance options")), Category::Life);
    }

    #[test]
    fn chunk_falls_back_to_document_id() {
        assert_eq!(classify_chunk(&chunk("auto_insurance", "## Claims Process\n1. Report")), Category::Auto);
        assert_eq!(classify_chunk(&chunk("notes", "nothing relevant")), Category::General);
    }
}

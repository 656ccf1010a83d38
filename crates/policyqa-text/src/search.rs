use std::collections::HashSet;

use tracing::debug;

use policyqa_core::types::{Category, Chunk, Topic};

use crate::classify::line_marker;
use crate::index::CategoryIndex;

const CLAIMS_HEADER: &str = "## claims process";

impl CategoryIndex {
    /// Relevant text segments for `(category, topic)`, in bucket order.
    ///
    /// Overlapping chunks of one document are stitched back into a single
    /// passage first, so a section cut by a chunk boundary comes out whole.
    /// At most `k` passages contribute; a segment already emitted is skipped.
    pub fn query(&self, category: Category, topic: Topic, k: usize) -> Vec<String> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut segments = Vec::new();
        let mut contributing = 0;

        for passage in passages(self.bucket(category)) {
            if contributing == k {
                break;
            }
            let fresh: Vec<String> = segments_for(&passage, topic)
                .into_iter()
                .filter(|s| seen.insert(s.clone()))
                .collect();
            if !fresh.is_empty() {
                contributing += 1;
                segments.extend(fresh);
            }
        }
        debug!(category = %category, topic = %topic, segments = segments.len(), "category extraction");
        segments
    }
}

/// Merge runs of consecutive chunks from the same document whose character
/// ranges touch or overlap. Chunks separated by a gap start a new passage.
fn passages(bucket: &[Chunk]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut covered: Option<(&str, usize)> = None;
    for chunk in bucket {
        match covered {
            Some((doc, end)) if doc == chunk.source_doc_id && chunk.offset_start <= end => {
                if let Some(text) = out.last_mut() {
                    text.extend(chunk.text.chars().skip(end - chunk.offset_start));
                }
                covered = Some((doc, end.max(chunk.offset_end())));
            }
            _ => {
                out.push(chunk.text.clone());
                covered = Some((chunk.source_doc_id.as_str(), chunk.offset_end()));
            }
        }
    }
    out
}

fn segments_for(text: &str, topic: Topic) -> Vec<String> {
    match topic {
        Topic::Claim => claims_section(text).into_iter().collect(),
        _ => match line_marker(topic) {
            Some(marker) => marker_lines(text, marker),
            None => vec![],
        },
    }
}

/// The claims section: its header line through the line before the next
/// `#` header, or the end of the text.
fn claims_section(text: &str) -> Option<String> {
    let mut lines = text.lines().skip_while(|l| !l.trim().to_lowercase().starts_with(CLAIMS_HEADER));
    let header = lines.next()?.trim();
    let mut section = vec![header];
    section.extend(lines.take_while(|l| !l.trim_start().starts_with('#')).map(str::trim));
    while section.last().is_some_and(|l| l.is_empty()) {
        section.pop();
    }
    Some(section.join("\n"))
}

/// Body lines mentioning `marker`. Headers are left out.
fn marker_lines(text: &str, marker: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .filter(|l| l.to_lowercase().contains(marker))
        .map(str::to_string)
        .collect()
}

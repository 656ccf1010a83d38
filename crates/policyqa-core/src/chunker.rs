//! Overlapping fixed-size text chunking.
//!
//! Windows are measured in characters. A window end is pulled back to the
//! nearest natural break (blank line, line end, sentence end, whitespace) when
//! one exists within `chunk_size / 5` characters of the hard limit, and the
//! next window start is pushed forward to a line or word start inside the
//! overlap region. Both adjustments keep chunks contiguous, so skipping the
//! overlap of each chunk and concatenating reproduces the input exactly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_OVERLAP: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, overlap: DEFAULT_OVERLAP }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size <= self.overlap {
            return Err(Error::InvalidConfig(format!(
                "chunk_size ({}) must be greater than overlap ({})",
                self.chunk_size, self.overlap
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Break {
    Paragraph,
    Line,
    Sentence,
    Whitespace,
}

impl Break {
    const PREFERENCE: [Break; 4] = [Break::Paragraph, Break::Line, Break::Sentence, Break::Whitespace];

    /// Whether cutting right before `chars[pos]` lands on this kind of break.
    fn matches(self, chars: &[char], pos: usize) -> bool {
        let prev = chars[pos - 1];
        match self {
            Break::Paragraph => prev == '\n' && pos >= 2 && chars[pos - 2] == '\n',
            Break::Line => prev == '\n',
            Break::Sentence => prev.is_whitespace() && pos >= 2 && matches!(chars[pos - 2], '.' | '!' | '?'),
            Break::Whitespace => prev.is_whitespace(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn split_document(&self, document: &Document) -> Vec<Chunk> {
        self.split(&document.id, &document.text)
    }

    pub fn split(&self, doc_id: &str, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        let byte_offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let n = chars.len();

        let mut chunks = Vec::new();
        let mut start = 0usize;
        while start < n {
            let hard_end = (start + self.config.chunk_size).min(n);
            let end = if hard_end == n { n } else { self.find_end(&chars, start, hard_end) };
            chunks.push(Chunk {
                id: format!("{}:{}", doc_id, chunks.len()),
                source_doc_id: doc_id.to_string(),
                chunk_index: chunks.len(),
                offset_start: start,
                length: end - start,
                text: text[byte_offsets[start]..byte_offsets[end]].to_string(),
            });
            if end == n {
                break;
            }
            start = self.next_start(&chars, end);
        }
        debug!(doc_id, chars = n, chunks = chunks.len(), "split document");
        chunks
    }

    /// Cut position for a window that starts at `start` and may not pass `hard_end`.
    fn find_end(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let tolerance = self.config.chunk_size / 5;
        // The next window starts at `end - overlap`, which must stay past `start`.
        let floor = (start + self.config.overlap + 1).max(hard_end.saturating_sub(tolerance));
        if floor > hard_end {
            return hard_end;
        }
        for kind in Break::PREFERENCE {
            if let Some(pos) = (floor..=hard_end).rev().find(|&pos| kind.matches(chars, pos)) {
                return pos;
            }
        }
        hard_end
    }

    /// Start of the window following one that ended at `end`.
    fn next_start(&self, chars: &[char], end: usize) -> usize {
        let base = end - self.config.overlap;
        (base..end)
            .find(|&pos| chars[pos - 1] == '\n')
            .or_else(|| (base..end).find(|&pos| chars[pos - 1].is_whitespace() && !chars[pos].is_whitespace()))
            .unwrap_or(base)
    }
}

/// Convenience wrapper: validate the parameters and split one text.
pub fn split(doc_id: &str, text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    Ok(Chunker::new(ChunkingConfig { chunk_size, overlap })?.split(doc_id, text))
}

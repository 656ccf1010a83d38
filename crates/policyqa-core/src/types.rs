//! Domain types shared by the chunker, both index strategies and the assistant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub type ChunkId = String;

/// A loaded source document. Immutable once constructed.
///
/// - `id`: stable document identity (file stem)
/// - `path`: original path of the source file
/// - `text`: extracted text payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub path: PathBuf,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self { id: id.into(), path: path.into(), text: text.into() }
    }
}

/// A contiguous slice of a document's text, the unit of retrieval.
///
/// `offset_start` and `length` count characters (Unicode scalar values), not
/// bytes, so `text.chars().count() == length` always holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub source_doc_id: String,
    pub chunk_index: usize,
    pub offset_start: usize,
    pub length: usize,
    pub text: String,
}

impl Chunk {
    /// Character offset one past the last character of this chunk.
    pub fn offset_end(&self) -> usize {
        self.offset_start + self.length
    }
}

/// Coarse insurance-type classification of a chunk or a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Health,
    Life,
    Auto,
    Home,
    General,
}

impl Category {
    /// The four concrete categories in classification priority order.
    pub const SPECIFIC: [Category; 4] = [Category::Health, Category::Life, Category::Auto, Category::Home];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Health => "health",
            Category::Life => "life",
            Category::Auto => "auto",
            Category::Home => "home",
            Category::General => "general",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The informational aspect a query asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Premium,
    Coverage,
    Claim,
    Deductible,
    General,
}

impl Topic {
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Premium => "premium",
            Topic::Coverage => "coverage",
            Topic::Claim => "claim",
            Topic::Deductible => "deductible",
            Topic::General => "general",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed exchange, kept for conversational context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub query: String,
    pub answer: String,
}

impl ChatTurn {
    pub fn new(query: impl Into<String>, answer: impl Into<String>) -> Self {
        Self { query: query.into(), answer: answer.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A rendered transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// The last `k` turns of `history`, oldest first.
pub fn recent_turns(history: &[ChatTurn], k: usize) -> &[ChatTurn] {
    &history[history.len().saturating_sub(k)..]
}

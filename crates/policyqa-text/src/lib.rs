//! policyqa-text
//!
//! Keyword retrieval: chunks are bucketed by insurance category at build
//! time, and queries are answered by pulling topic-relevant lines (or the
//! claims section) out of the matching bucket. No embeddings involved.

pub mod classify;
pub mod index;
pub mod search;

pub use classify::{classify_chunk, classify_query};
pub use index::CategoryIndex;

//! In-memory dense vector index over document chunks.
//!
//! `FlatVectorIndex` embeds every chunk once at build time and answers queries
//! by exhaustive distance scan. `CachedEmbedder` lets a rebuild over unchanged
//! chunks reuse earlier vectors.

pub mod cache;
pub mod index;
pub mod search;

pub use cache::{CacheStats, CachedEmbedder};
pub use index::{FlatVectorIndex, IndexEntry};
pub use search::VectorHit;

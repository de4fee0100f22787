//! Entity index
//!
//! - [`EntityIndex`] - storage and candidate retrieval contract
//! - [`MemoryIndex`] - in-memory implementation with phonetic buckets

mod memory;
mod profile;
mod traits;

pub use memory::{IndexStats, MemoryIndex, DEFAULT_CANDIDATE_LIMIT};
pub use profile::{EntityProfile, EntityProfileBuilder};
pub use traits::EntityIndex;

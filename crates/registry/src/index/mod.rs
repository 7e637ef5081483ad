//! Key and position indices backing the registry.
//!
//! [`KeyIndex`] owns the records and answers lookups by address.
//! [`PositionIndex`] holds the same addresses in discovery order and answers
//! lookups by row. Rows store keys, never references into the key index, so
//! the key index is free to rehash or grow without invalidating any row.

mod key;
mod position;

pub use key::KeyIndex;
pub use position::PositionIndex;

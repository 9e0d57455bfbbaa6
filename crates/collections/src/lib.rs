//! Hand-built generic containers backing the inventory.
//!
//! - [`KeyIndex`]: a fixed-capacity chained hash map.
//! - [`PriorityHeap`]: a binary min-heap with O(n) bulk construction.
//!
//! Neither container is thread-safe; callers serialize access.

pub mod key_index;
pub mod priority_heap;

pub use key_index::{DEFAULT_BUCKETS, KeyIndex};
pub use priority_heap::{HeapError, PriorityHeap};

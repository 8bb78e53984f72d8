//! In-memory segment cache
//!
//! Memoizes [`SegmentDescriptor`](crate::models::SegmentDescriptor)s by capture time so
//! repeated queries over a stable archive do not reopen and tail-parse every file.
//!
//! Two eviction policies run side by side:
//!
//! - **Capacity**: least-recently-used entries are dropped once `capacity` is exceeded.
//! - **Expiry**: an entry stops being visible `ttl` after it was inserted. Reads do not
//!   extend the deadline.
//!
//! The cache is an explicit object handed to each indexer, not a process global, and
//! synchronizes internally so concurrent queries can share it.

pub mod clock;
pub mod segment_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use segment_cache::SegmentCache;

//! Recording archive indexer
//!
//! # Error Handling Strategy
//!
//! The indexer separates structural failures from per-file anomalies:
//!
//! - **Walk failures**: An unreadable directory anywhere under the root aborts the whole
//!   query. Callers get an error and no partial results, so "zero matches" and "query
//!   failed" stay distinguishable.
//!
//! - **Per-file failures**: Files that cannot be opened or stat'ed are excluded and
//!   logged. Files whose duration cannot be read are kept with a duration of 0.
//!
//! - **Naming failures**: Hidden files and names that do not encode a capture time are
//!   excluded and logged at debug level.
//!
//! - **Slow files**: Any single file evaluation slower than the configured threshold is
//!   logged as a warning.

pub mod archive;
pub mod discovery;

pub use archive::{ArchiveIndexer, SegmentOrder};
pub use discovery::{SegmentFile, discover_segment_files};

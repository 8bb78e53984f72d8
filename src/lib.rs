//! rec-archive - Index recorded media segments by capture time
//!
//! This library answers "which recordings were captured between two times?" over a
//! directory tree written by a stream recorder. It supports:
//!
//! - Deriving capture times from the recorder's file naming convention
//! - Reading segment durations from FLV tag trailers and MP4 movie headers
//! - Caching segment descriptors with LRU eviction and time-based expiry
//! - Answering JSON `record` commands with `{url, size, timestamp, duration}` records
//!
//! # Example
//!
//! ```no_run
//! use std::num::NonZeroUsize;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use rec_archive::{ArchiveIndexer, Config, SegmentCache, parse_query_time};
//!
//! let config = Config::default();
//! let zone = config.zone()?;
//! let cache = Arc::new(SegmentCache::new(NonZeroUsize::new(100).unwrap()));
//! let indexer = ArchiveIndexer::new(cache, zone);
//!
//! let begin = parse_query_time("2021-09-24 00:00:00", &zone)?;
//! let end = parse_query_time("2021-09-25 00:00:00", &zone)?;
//! for segment in indexer.query(Path::new("live"), begin, end)? {
//!     println!("{} ({} bytes)", segment.relative_path, segment.size_bytes);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod timestamps;
pub mod utils;

// Re-export commonly used types
pub use cache::SegmentCache;
pub use commands::{CommandHandler, Reply, Request};
pub use config::Config;
pub use indexer::{ArchiveIndexer, SegmentOrder};
pub use models::{ContainerKind, SegmentDescriptor};
pub use timestamps::{CaptureTime, derive_timestamp, parse_query_time};

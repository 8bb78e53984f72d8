//! Capture-time handling for recorded segments
//!
//! Segment capture times are never read from file system metadata (copies and backups
//! rewrite it). They are derived from the recorder's naming convention instead:
//!
//! - FLV: `<prefix>/YYYY/MM/DD/HHMMSS.flv`
//! - MP4: `<prefix>/YYYY-MM-DD/HH-MM-SS.mp4`
//!
//! Both the file-name timestamps and textual query bounds are wall-clock times in one
//! configured fixed UTC offset.

pub mod deriver;
pub mod zone;

pub use deriver::{CaptureTime, derive_timestamp};
pub use zone::{QUERY_TIME_FORMAT, parse_query_time, parse_utc_offset};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded media file found under the archive root
///
/// `relative_path` is root-stripped, uses `/` separators and has no leading slash.
/// `capture_time` comes from the file name, never from file system metadata.
/// A `duration` of 0 means the container could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    #[serde(rename = "url")]
    pub relative_path: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(rename = "timestamp", with = "chrono::serde::ts_seconds")]
    pub capture_time: DateTime<Utc>,
    pub duration: u32,
}

impl SegmentDescriptor {
    /// Unix seconds of the capture time, as carried in the `timestamp` field
    pub fn timestamp(&self) -> i64 {
        self.capture_time.timestamp()
    }
}

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Container format of a recorded segment, selected by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// `hk/2021/09/24/143046.flv`
    Flv,
    /// `hw/2021-09-27/18-07-25.mp4`
    Mp4,
}

impl ContainerKind {
    /// Match a file extension case-insensitively, without the leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("flv") {
            Some(Self::Flv)
        } else if ext.eq_ignore_ascii_case("mp4") {
            Some(Self::Mp4)
        } else {
            None
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|ext| ext.to_str()).and_then(Self::from_extension)
    }

    /// chrono layout of the timestamp portion that precedes the extension
    pub fn layout(self) -> &'static str {
        match self {
            Self::Flv => "%Y/%m/%d/%H%M%S",
            Self::Mp4 => "%Y-%m-%d/%H-%M-%S",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Flv => "flv",
            Self::Mp4 => "mp4",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

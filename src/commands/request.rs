use serde::{Deserialize, Serialize};

use crate::models::SegmentDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Request {
    /// List segments captured strictly between `begin` and `end`
    Record { begin: String, end: String },
    Start,
    Stop,
    Switch {
        #[serde(default)]
        enabled: bool,
    },
    Upload { file: String },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Record { .. } => "record",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Switch { .. } => "switch",
            Self::Upload { .. } => "upload",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Segments(Vec<SegmentDescriptor>),
    Error { error: String },
}

impl Reply {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { error: message.into() }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

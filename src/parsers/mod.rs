//! Duration readers for recorded containers
//!
//! Each reader extracts exactly one scalar from a segment file without building a parse
//! tree:
//!
//! - [`flv`] walks backward from the end of the stream to the last tag and returns its
//!   timestamp.
//! - [`mp4`] walks the top-level boxes forward to `moov/mvhd` and returns the declared
//!   duration in seconds.
//!
//! # Error Handling Strategy
//!
//! Readers return `anyhow::Result` so callers can log why a file was unreadable. Duration
//! is an enrichment field: the indexer downgrades every reader error to a duration of 0
//! and keeps the segment.

pub mod flv;
pub mod mp4;

use std::io::{Read, Seek};

use anyhow::Result;

use crate::models::ContainerKind;

/// Object-safe union of [`Read`] and [`Seek`]
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

/// Extracts the duration of one segment stream
///
/// The indexer holds a probe behind an `Arc` and may call it from several threads.
pub trait DurationProbe: Send + Sync {
    fn probe(&self, kind: ContainerKind, reader: &mut dyn ReadSeek) -> Result<u32>;
}

/// Dispatches to the FLV tail-walk or the MP4 `mvhd` reader by container kind
#[derive(Debug, Clone, Copy, Default)]
pub struct ContainerProbe;

impl DurationProbe for ContainerProbe {
    fn probe(&self, kind: ContainerKind, reader: &mut dyn ReadSeek) -> Result<u32> {
        match kind {
            ContainerKind::Flv => flv::read_last_tag_timestamp(reader),
            ContainerKind::Mp4 => mp4::read_duration(reader),
        }
    }
}

//! Data models for the recording archive.
//!
//! - [`ContainerKind`] - Supported recording container formats (FLV, MP4)
//! - [`SegmentDescriptor`] - One recorded media file found on disk
//!
//! Descriptors serialize to the `{url, size, timestamp, duration}` record shape that
//! command replies and the `query` subcommand emit.

pub mod container;
pub mod segment;

pub use container::ContainerKind;
pub use segment::SegmentDescriptor;

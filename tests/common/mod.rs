//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// FLV file header plus the leading `PreviousTagSize0`
const FLV_HEADER: [u8; 13] = [b'F', b'L', b'V', 1, 5, 0, 0, 0, 9, 0, 0, 0, 0];

/// Builder for creating test recording archives
///
/// The archive root is a `live` directory inside a temp dir, mirroring the recorder's
/// default `save_path`.
pub struct ArchiveBuilder {
    temp_dir: TempDir,
}

impl ArchiveBuilder {
    /// Create a new builder with an empty `live` root
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("live")).expect("Failed to create archive root");
        Self { temp_dir }
    }

    /// Path of the archive root
    pub fn root(&self) -> PathBuf {
        self.temp_dir.path().join("live")
    }

    /// Path of the temp dir holding the root
    pub fn base(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a file with raw contents at a root-relative path
    pub fn with_file(self, relative_path: &str, contents: &[u8]) -> Self {
        let path = self.root().join(relative_path);
        fs::create_dir_all(path.parent().expect("File path has a parent"))
            .expect("Failed to create segment directory");
        fs::write(&path, contents).expect("Failed to write segment");
        self
    }

    /// Add an FLV segment whose tags carry the given timestamps
    pub fn with_flv(self, relative_path: &str, tag_timestamps: &[u32]) -> Self {
        self.with_file(relative_path, &flv_bytes(tag_timestamps))
    }

    /// Add an MP4 segment declaring `duration` units at `timescale` units per second
    pub fn with_mp4(self, relative_path: &str, timescale: u32, duration: u32) -> Self {
        self.with_file(relative_path, &mp4_bytes(timescale, duration))
    }

    /// Add a zero-byte file
    pub fn with_empty(self, relative_path: &str) -> Self {
        self.with_file(relative_path, b"")
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// FLV stream with one video tag per timestamp
pub fn flv_bytes(tag_timestamps: &[u32]) -> Vec<u8> {
    let mut out = FLV_HEADER.to_vec();
    for ts in tag_timestamps {
        let payload = [0x17u8, 0x01, 0x00, 0x00, 0x00, 0xaa, 0xbb];
        let size = payload.len() as u32;
        out.push(9);
        out.extend_from_slice(&size.to_be_bytes()[1..]);
        out.extend_from_slice(&(ts & 0x00ff_ffff).to_be_bytes()[1..]);
        out.push((ts >> 24) as u8);
        out.extend_from_slice(&[0, 0, 0]);
        out.extend_from_slice(&payload);
        out.extend_from_slice(&(size + 11).to_be_bytes());
    }
    out
}

fn mp4_box(box_type: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = ((body.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend_from_slice(box_type);
    out.extend_from_slice(body);
    out
}

/// Minimal MP4 stream: `ftyp`, `moov` with a version 0 `mvhd`, then `mdat`
pub fn mp4_bytes(timescale: u32, duration: u32) -> Vec<u8> {
    let mut mvhd = vec![0u8; 12];
    mvhd.extend_from_slice(&timescale.to_be_bytes());
    mvhd.extend_from_slice(&duration.to_be_bytes());
    mvhd.extend_from_slice(&[0; 80]);

    let mut out = mp4_box(b"ftyp", b"isom\0\0\x02\0isomiso2");
    out.extend(mp4_box(b"moov", &mp4_box(b"mvhd", &mvhd)));
    out.extend(mp4_box(b"mdat", &[0; 32]));
    out
}

/// Archive from the recorder's documentation: one FLV camera and one MP4 camera
pub fn reference_archive() -> TempDir {
    ArchiveBuilder::new()
        .with_flv("hk/2021/09/24/143046.flv", &[0, 40, 80, 61_000])
        .with_mp4("hw/2021-09-27/18-07-25.mp4", 1000, 300_000)
        .build()
}

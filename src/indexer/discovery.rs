use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

use crate::models::ContainerKind;
use crate::utils::{is_hidden_segment_path, relative_segment_path};

/// A recording file found under the archive root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFile {
    pub path: PathBuf,
    /// Root-relative, `/`-separated, no leading slash
    pub relative_path: String,
    pub kind: ContainerKind,
}

/// Recursively collect FLV and MP4 files under `root`
///
/// Entries are visited in file-name order within each directory, so repeated walks over
/// an unchanged archive return files in the same order.
///
/// # Errors
///
/// Returns an error if `root` or any directory beneath it cannot be read. Nothing is
/// returned in that case, even for the subtrees that were readable.
///
/// Files with other extensions are skipped silently. Files whose name starts with `.`
/// (temporary or partial recordings), or that sit under a directory whose name does,
/// are skipped with a debug log.
pub fn discover_segment_files(root: &Path) -> Result<Vec<SegmentFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to walk recording archive: {}", root.display()))?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let Some(kind) = ContainerKind::from_path(path) else {
            continue;
        };

        let Some(relative_path) = relative_segment_path(root, path) else {
            continue;
        };

        if is_hidden_segment_path(&relative_path) {
            debug!("Skipping hidden recording file {}", relative_path);
            continue;
        }

        files.push(SegmentFile { path: path.to_path_buf(), relative_path, kind });
    }

    Ok(files)
}

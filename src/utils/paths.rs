use std::path::Path;

/// Root-relative form of a segment path: `/` separators, no leading slash
///
/// Returns `None` if `path` does not live under `root`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use rec_archive::utils::relative_segment_path;
///
/// let rel = relative_segment_path(Path::new("live"), Path::new("live/hk/2021/09/24/143046.flv"));
/// assert_eq!(rel.as_deref(), Some("hk/2021/09/24/143046.flv"));
/// ```
pub fn relative_segment_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let normalized = relative.to_string_lossy().replace('\\', "/");
    Some(normalized.trim_start_matches('/').to_string())
}

/// Whether a file name marks a temporary or partially written recording
pub fn is_hidden_file_name(name: &str) -> bool {
    name.starts_with('.')
}

/// Whether any component of a root-relative `/`-separated path is hidden
pub fn is_hidden_segment_path(relative_path: &str) -> bool {
    relative_path.split('/').any(is_hidden_file_name)
}

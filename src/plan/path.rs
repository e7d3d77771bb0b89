//! Path decomposition into the `dir` and `stem` template variables.

use std::path::Path;

/// Directory used for paths that carry no directory component.
pub const CURRENT_DIR: &str = ".";

/// The parts of an input path exposed to templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    pub dir: String,
    pub stem: String,
}

/// Split `path` into its directory and its file name without the final extension.
///
/// ```
/// use vicon::plan::path::decompose;
///
/// let parts = decompose("clips/archive.tar.gz");
/// assert_eq!(parts.dir, "clips");
/// assert_eq!(parts.stem, "archive.tar");
///
/// assert_eq!(decompose("video.mp4").dir, ".");
/// ```
pub fn decompose(path: &str) -> PathParts {
    let path = Path::new(path);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_string_lossy().into_owned(),
        _ => CURRENT_DIR.to_string(),
    };

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    PathParts { dir, stem }
}

//! Glob expansion of batch file patterns.
//!
//! Patterns are resolved relative to a base directory (the process working
//! directory unless one is injected) and the matches are returned as
//! relative path strings, deduplicated and sorted so that the generated
//! commands come out in the same order on every run.

use glob::{glob_with, MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Leading-dot names are filtered by [`spells_out_hidden`] after matching.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Expands glob patterns against a directory.
///
/// ```no_run
/// use vicon::plan::GlobExpander;
///
/// // Production: resolves against the current working directory
/// let files = GlobExpander::new().expand(&["*.mp4"])?;
///
/// // Testing: resolves against a fixed directory
/// let expander = GlobExpander::with_base_dir("/tmp/media".into());
/// assert_eq!(expander.base_dir().unwrap().to_str().unwrap(), "/tmp/media");
/// # Ok::<(), vicon::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct GlobExpander {
    base_dir: Option<PathBuf>,
}

impl GlobExpander {
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    /// Resolve patterns relative to `base_dir` instead of the working directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir: Some(base_dir),
        }
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// Expand every pattern and return the union of regular files matched,
    /// sorted lexicographically. No match is not an error.
    pub fn expand<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<String>> {
        let root = self.root()?;
        fs::read_dir(&root).map_err(|e| Error::io(&root, e))?;

        let mut matches = BTreeSet::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let before = matches.len();
            self.expand_one(pattern, &root, &mut matches)?;
            debug!(
                "Pattern '{}' added {} file(s)",
                pattern,
                matches.len() - before
            );
        }

        trace!("Glob matches: {:?}", matches);
        Ok(matches.into_iter().collect())
    }

    fn root(&self) -> Result<PathBuf> {
        match &self.base_dir {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().map_err(|e| Error::io(".", e)),
        }
    }

    fn resolve_pattern(&self, pattern: &str) -> String {
        match &self.base_dir {
            Some(dir) if Path::new(pattern).is_relative() => {
                let escaped = Pattern::escape(&dir.to_string_lossy());
                format!("{}/{}", escaped.trim_end_matches('/'), pattern)
            }
            _ => pattern.to_string(),
        }
    }

    fn expand_one(&self, pattern: &str, root: &Path, matches: &mut BTreeSet<String>) -> Result<()> {
        let paths = glob_with(&self.resolve_pattern(pattern), MATCH_OPTIONS)?;

        for entry in paths {
            match entry {
                Ok(path) => {
                    if !path.is_file() {
                        continue;
                    }
                    let relative = relative_to(&path, root);
                    if spells_out_hidden(Path::new(&relative), pattern) {
                        matches.insert(relative);
                    } else {
                        trace!("Skipping hidden path {} for '{}'", relative, pattern);
                    }
                }
                Err(e) => warn!("Skipping unreadable path while expanding '{}': {}", pattern, e),
            }
        }

        Ok(())
    }
}

fn normal_components<'a>(path: &'a Path) -> impl Iterator<Item = &'a str> + 'a {
    path.components().filter_map(|component| match component {
        Component::Normal(name) => name.to_str(),
        _ => None,
    })
}

/// Whether every dot-prefixed component of `relative` is matched by a
/// pattern component that itself starts with a literal `.`.
fn spells_out_hidden(relative: &Path, pattern: &str) -> bool {
    let dotted: Vec<Pattern> = normal_components(Path::new(pattern))
        .filter(|component| component.starts_with('.'))
        .filter_map(|component| Pattern::new(component).ok())
        .collect();

    normal_components(relative)
        .filter(|name| name.starts_with('.'))
        .all(|name| dotted.iter().any(|p| p.matches_with(name, MATCH_OPTIONS)))
}

/// Render `path` relative to `root` without `.` components, so `./a.mp4`
/// and `a.mp4` collapse to the same key.
fn relative_to(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let normalized: PathBuf = relative
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    normalized.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn media_dir(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_expand_sorted() {
        let dir = media_dir(&["b.mp4", "a.mp4", "c.mov"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        let files = expander.expand(&["*.mp4"]).unwrap();
        assert_eq!(files, vec!["a.mp4", "b.mp4"]);
    }

    #[test]
    fn test_expand_dedups_overlapping_patterns() {
        let dir = media_dir(&["a.mp4", "b.mp4"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        let files = expander.expand(&["*.mp4", "a.mp4"]).unwrap();
        assert_eq!(files, vec!["a.mp4", "b.mp4"]);
    }

    #[test]
    fn test_expand_is_order_independent() {
        let dir = media_dir(&["x.mov", "y.png", "z.mov"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        let forward = expander.expand(&["*.mov", "*.png"]).unwrap();
        let backward = expander.expand(&["*.png", "*.mov"]).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward, vec!["x.mov", "y.png", "z.mov"]);
    }

    #[test]
    fn test_expand_subdirectories() {
        let dir = media_dir(&["clips/a.mov", "clips/deep/b.mov", "c.mov"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        assert_eq!(expander.expand(&["clips/*.mov"]).unwrap(), vec!["clips/a.mov"]);
        assert_eq!(
            expander.expand(&["**/*.mov"]).unwrap(),
            vec!["c.mov", "clips/a.mov", "clips/deep/b.mov"]
        );
    }

    #[test]
    fn test_expand_skips_directories() {
        let dir = media_dir(&["a.mp4"]);
        fs::create_dir(dir.path().join("folder.mp4")).unwrap();
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        assert_eq!(expander.expand(&["*.mp4"]).unwrap(), vec!["a.mp4"]);
    }

    #[test]
    fn test_expand_no_matches_is_empty() {
        let dir = media_dir(&["a.mp4"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        assert!(expander.expand(&["*.webm"]).unwrap().is_empty());
        assert!(expander.expand::<&str>(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_expand_leading_dot_requires_literal() {
        let dir = media_dir(&[".hidden.mp4", "shown.mp4"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        assert_eq!(expander.expand(&["*.mp4"]).unwrap(), vec!["shown.mp4"]);
        assert_eq!(expander.expand(&[".*.mp4"]).unwrap(), vec![".hidden.mp4"]);
    }

    #[test]
    fn test_expand_hidden_directories() {
        let dir = media_dir(&[".cache/a.mp4", "clips/.b.mp4", "clips/c.mp4"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        assert_eq!(expander.expand(&["**/*.mp4"]).unwrap(), vec!["clips/c.mp4"]);
        assert_eq!(expander.expand(&[".cache/*.mp4"]).unwrap(), vec![".cache/a.mp4"]);
        assert_eq!(expander.expand(&["clips/.*"]).unwrap(), vec!["clips/.b.mp4"]);
    }

    #[test]
    fn test_expand_inside_hidden_base_dir() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join(".media");
        fs::create_dir(&base).unwrap();
        fs::write(base.join("a.mp4"), b"").unwrap();
        fs::write(base.join(".b.mp4"), b"").unwrap();
        let expander = GlobExpander::with_base_dir(base);

        assert_eq!(expander.expand(&["*.mp4"]).unwrap(), vec!["a.mp4"]);
        assert_eq!(expander.expand(&[".*.mp4"]).unwrap(), vec![".b.mp4"]);
    }

    #[test]
    fn test_spells_out_hidden() {
        assert!(spells_out_hidden(Path::new("a.mp4"), "*.mp4"));
        assert!(spells_out_hidden(Path::new(".hidden.mp4"), ".*.mp4"));
        assert!(spells_out_hidden(Path::new(".hidden.mp4"), "./.*.mp4"));
        assert!(!spells_out_hidden(Path::new(".hidden.mp4"), "*.mp4"));
        assert!(!spells_out_hidden(Path::new(".git/x.mp4"), "**/*.mp4"));
        assert!(spells_out_hidden(Path::new(".git/x.mp4"), ".git/**/*.mp4"));
    }

    #[test]
    fn test_expand_collapses_current_dir_prefix() {
        let dir = media_dir(&["a.mp4"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        assert_eq!(expander.expand(&["./*.mp4", "a.mp4"]).unwrap(), vec!["a.mp4"]);
    }

    #[test]
    fn test_expand_invalid_pattern() {
        let dir = media_dir(&["a.mp4"]);
        let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

        let err = expander.expand(&["[*.mp4"]).unwrap_err();
        assert!(matches!(err, Error::Pattern(_)));
    }

    #[test]
    fn test_expand_missing_base_dir() {
        let dir = TempDir::new().unwrap();
        let expander = GlobExpander::with_base_dir(dir.path().join("gone"));

        let err = expander.expand(&["*.mp4"]).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_expand_ignores_pattern_order(
            patterns in Just(vec!["*.mov", "*.png", "a.*", "clips/*.mov", "*.mp4"]).prop_shuffle()
        ) {
            let dir = media_dir(&["a.mov", "b.png", "clips/c.mov", "d.mp4", "a.txt"]);
            let expander = GlobExpander::with_base_dir(dir.path().to_path_buf());

            prop_assert_eq!(
                expander.expand(&patterns).unwrap(),
                vec!["a.mov", "a.txt", "b.png", "clips/c.mov", "d.mp4"]
            );
        }
    }

    #[test]
    fn test_relative_to_strips_root_and_cur_dir() {
        let root = Path::new("/media");
        assert_eq!(relative_to(Path::new("/media/clips/a.mov"), root), "clips/a.mov");
        assert_eq!(relative_to(Path::new("./a.mov"), root), "a.mov");
    }
}

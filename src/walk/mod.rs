//! Candidate file traversal with denylist filtering.
//!
//! Produces the stream of file paths the scan pipeline consumes. The
//! walker honors gitignore and hidden-file filtering (rewriting files
//! under `.git/` would corrupt the repository being cleaned), and the
//! denylists narrow it further by file name, extension, and folder.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::debug;

/// Denylists applied to every candidate path.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    files: Vec<String>,
    extensions: Vec<String>,
    folders: Vec<String>,
}

impl ExclusionRules {
    /// Build the rule set. Extensions given without a leading dot get
    /// one, so `go` and `.go` exclude the same files.
    pub fn new(files: Vec<String>, extensions: Vec<String>, folders: Vec<String>) -> Self {
        let extensions = extensions
            .into_iter()
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();

        Self {
            files: files.into_iter().filter(|f| !f.is_empty()).collect(),
            extensions,
            folders: folders.into_iter().filter(|f| !f.is_empty()).collect(),
        }
    }

    /// Whether a file path is ruled out by name, extension, or any
    /// folder on its parent path.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        if self.files.iter().any(|f| f == name) {
            return true;
        }

        // The extension including its dot, empty for dotless names.
        let ext = name.rfind('.').map(|i| &name[i..]).unwrap_or("");
        if !ext.is_empty() && self.extensions.iter().any(|e| e == ext) {
            return true;
        }

        if !self.folders.is_empty() {
            let parent = path
                .parent()
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            if self.folders.iter().any(|f| parent.contains(f.as_str())) {
                return true;
            }
        }

        false
    }
}

/// Walk `root` and yield every regular file that passes the rules.
/// Traversal errors are passed through for the caller to surface as
/// warnings.
pub fn walk_candidates(
    root: &Path,
    rules: ExclusionRules,
    follow_symlinks: bool,
) -> impl Iterator<Item = Result<PathBuf, ignore::Error>> {
    WalkBuilder::new(root)
        .follow_links(follow_symlinks)
        .build()
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    return None;
                }
                let path = entry.into_path();
                if rules.is_excluded(&path) {
                    debug!(path = %path.display(), "excluded by rules");
                    None
                } else {
                    Some(Ok(path))
                }
            }
            Err(e) => Some(Err(e)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_exclusion() {
        let rules = ExclusionRules::new(vec!["Makefile".into()], vec![], vec![]);
        assert!(rules.is_excluded(Path::new("src/Makefile")));
        assert!(!rules.is_excluded(Path::new("src/main.rs")));
    }

    #[test]
    fn test_extension_exclusion_normalizes_dot() {
        let rules = ExclusionRules::new(vec![], vec!["go".into(), ".md".into()], vec![]);
        assert!(rules.is_excluded(Path::new("main.go")));
        assert!(rules.is_excluded(Path::new("README.md")));
        assert!(!rules.is_excluded(Path::new("main.rs")));
        // A dotless file has no extension to match.
        assert!(!rules.is_excluded(Path::new("go")));
    }

    #[test]
    fn test_folder_exclusion_is_substring_of_parent() {
        let rules = ExclusionRules::new(vec![], vec![], vec!["vendor".into()]);
        assert!(rules.is_excluded(Path::new("a/vendor/lib.rs")));
        assert!(rules.is_excluded(Path::new("a/vendored/lib.rs")));
        // Folder rules match the parent path, not the file name.
        assert!(!rules.is_excluded(Path::new("a/b/vendor")));
    }

    #[test]
    fn test_empty_rules_exclude_nothing() {
        let rules = ExclusionRules::new(
            vec!["".into()],
            vec!["".into()],
            vec!["".into()],
        );
        assert!(!rules.is_excluded(Path::new("anything.txt")));
    }

    #[test]
    fn test_walk_yields_only_passing_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::create_dir(dir.path().join("skipme")).unwrap();
        fs::write(dir.path().join("keep.txt"), "x").unwrap();
        fs::write(dir.path().join("drop.log"), "x").unwrap();
        fs::write(dir.path().join("sub/nested.txt"), "x").unwrap();
        fs::write(dir.path().join("skipme/hidden.txt"), "x").unwrap();

        let rules = ExclusionRules::new(vec![], vec!["log".into()], vec!["skipme".into()]);
        let found: HashSet<String> = walk_candidates(dir.path(), rules, false)
            .filter_map(|r| r.ok())
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        let expected: HashSet<String> =
            ["keep.txt".to_string(), "sub/nested.txt".to_string()].into();
        assert_eq!(found, expected);
    }
}

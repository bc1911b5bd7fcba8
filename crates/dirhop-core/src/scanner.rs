//! Recursive directory enumeration with prune-on-enter ignore rules.
//!
//! A directory whose basename matches an ignore rule is excluded from the
//! output and its subtree is never entered, which keeps scans bounded on
//! large trees (build output, VCS metadata, dependency caches).

use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::{DirEntry, WalkDir};

use crate::error::{Error, Result};

/// A basename glob that prunes matching directories from recursive scans.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pattern: Pattern,
}

impl IgnoreRule {
    /// Compile a glob pattern into an ignore rule.
    ///
    /// # Errors
    /// Returns [`Error::Glob`] if the pattern is not valid glob syntax.
    pub fn new(pattern: &str) -> Result<Self> {
        Pattern::new(pattern)
            .map(|compiled| Self { pattern: compiled })
            .map_err(|source| Error::Glob {
                pattern: pattern.to_owned(),
                source,
            })
    }

    /// Whether a directory basename matches this rule.
    pub fn matches_name(&self, name: &str) -> bool {
        self.pattern.matches(name)
    }
}

/// Check whether a walk entry should be pruned.
fn is_pruned(entry: &DirEntry, rules: &[IgnoreRule]) -> bool {
    // Never prune the scan root itself, only entries below it.
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    rules.iter().any(|rule| rule.matches_name(name.as_ref()))
}

/// Lazily enumerate every directory strictly below `root`.
///
/// Pruned subtrees are never entered. Entries that vanish or turn
/// unreadable mid-scan are skipped with a warning; the scan continues.
pub fn scan_dirs<'rules>(
    root: &Path,
    rules: &'rules [IgnoreRule],
) -> impl Iterator<Item = PathBuf> + 'rules {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(move |entry| {
            entry.depth() == 0 || (entry.file_type().is_dir() && !is_pruned(entry, rules))
        })
        .filter_map(|walked| match walked {
            Ok(entry) if entry.depth() > 0 => Some(entry.into_path()),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!("skipping unreadable scan entry: {error}");
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::fs::create_dir_all;
    use tempfile::TempDir;

    fn scan_set(root: &Path, rules: &[IgnoreRule]) -> BTreeSet<PathBuf> {
        scan_dirs(root, rules).collect()
    }

    #[test]
    fn test_scan_yields_directories_only_root_excluded() {
        let temp = TempDir::new().unwrap();
        create_dir_all(temp.path().join("one/two")).unwrap();
        std::fs::write(temp.path().join("one/file.txt"), "x").unwrap();

        let found = scan_set(temp.path(), &[]);
        assert!(found.contains(&temp.path().join("one")));
        assert!(found.contains(&temp.path().join("one/two")));
        assert!(!found.contains(&temp.path().to_path_buf()));
        assert!(!found.contains(&temp.path().join("one/file.txt")));
    }

    #[test]
    fn test_pruned_subtree_is_not_entered() {
        let temp = TempDir::new().unwrap();
        create_dir_all(temp.path().join("keep/inner")).unwrap();
        create_dir_all(temp.path().join("skipme/target")).unwrap();

        let rules = vec![IgnoreRule::new("skipme").unwrap()];
        let found = scan_set(temp.path(), &rules);
        assert!(found.contains(&temp.path().join("keep/inner")));
        assert!(!found.contains(&temp.path().join("skipme")));
        assert!(!found.contains(&temp.path().join("skipme/target")));
    }

    #[test]
    fn test_glob_rule_matches_basenames() {
        let rule = IgnoreRule::new(".git*").unwrap();
        assert!(rule.matches_name(".git"));
        assert!(rule.matches_name(".gitmodules"));
        assert!(!rule.matches_name("src"));
    }

    #[test]
    fn test_invalid_rule_is_an_error() {
        assert!(IgnoreRule::new("[unclosed").is_err());
    }

    #[test]
    fn test_missing_root_yields_nothing() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("does-not-exist");
        assert_eq!(scan_set(&gone, &[]).len(), 0);
    }
}

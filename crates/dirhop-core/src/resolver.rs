//! The cascading match resolver.
//!
//! Turns (fragments, current directory, weight database, filesystem state)
//! into a ranked list of candidate directories. Six tiers run in a fixed
//! order; each appends candidates not already produced by an earlier tier,
//! and each tier is sorted by the three-key tie-break law: weight
//! descending, cumulated path weight descending, path ascending.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::pattern::PatternSpec;
use crate::scanner::{self, IgnoreRule};
use crate::store::{Weight, WeightMap};

/// Which cascade stage produced a candidate. Variant order is the merge
/// order of the final result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    /// The single fragment named an existing directory directly.
    DirectPath,
    /// A database entry whose last segment the end fragment matched in full.
    DirectoryFull,
    /// A database entry whose last segment the end fragment matched partially.
    DirectoryPartial,
    /// A prefix of a database entry matched somewhere mid-path.
    PathPartial,
    /// Found by recursively scanning under the current directory.
    CwdSubScan,
    /// Found by recursively scanning under a database entry.
    SubDbScan,
}

/// One resolved candidate directory. Ephemeral, produced fresh per call.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    /// The resolved directory.
    pub path: PathBuf,
    /// The raw on-disk directory behind a derived path, when it differs
    /// from `path`. Display-only.
    pub source: Option<PathBuf>,
    /// The owning database entry's own weight; 0 for non-database tiers.
    pub weight: Weight,
    /// Sum of the weights of every ancestor path segment, inclusive, that
    /// is itself a database key.
    pub cumulated_weight: Weight,
    /// The cascade stage that produced this candidate.
    pub tier: Tier,
}

/// First-match vs all-matches resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveMode {
    /// Return only the head of the merged list; the sub-scan tiers are
    /// skipped once an earlier tier produced a result.
    First,
    /// Run every eligible tier and return the whole merged list. Drives
    /// shell completion.
    All,
}

/// Option flags threaded through every tier. No global state.
#[derive(Debug, Default)]
pub struct ResolutionOptions {
    /// Case-insensitive matching.
    pub ignore_case: bool,
    /// Disable the direct-path tier.
    pub no_direct_path: bool,
    /// Disable the cwd sub-scan tier.
    pub no_sub_cwd: bool,
    /// Disable the database sub-scan tier.
    pub no_sub_db: bool,
    /// Prune rules for the recursive scan tiers.
    pub ignore_rules: Vec<IgnoreRule>,
}

/// Resolve `fragments` against the weight database and the filesystem.
///
/// Returns the merged, tier-ordered candidate list; in [`ResolveMode::First`]
/// the list is truncated to its head. An empty fragment sequence resolves
/// to nothing.
///
/// # Errors
/// Returns [`crate::Error::Pattern`] if a fragment is invalid regex syntax.
pub fn resolve(
    store: &WeightMap,
    cwd: &Path,
    fragments: &[String],
    mode: ResolveMode,
    options: &ResolutionOptions,
) -> Result<Vec<MatchCandidate>> {
    if fragments.is_empty() {
        return Ok(Vec::new());
    }
    let spec = PatternSpec::build(fragments, options.ignore_case)?;
    let mut seen: HashSet<PathBuf> = HashSet::new();

    // Tier 1: direct path.
    let mut direct = Vec::new();
    if !options.no_direct_path
        && let [fragment] = fragments
        && let Some(candidate) = direct_path_candidate(fragment, cwd)
        && seen.insert(candidate.path.clone())
    {
        direct.push(candidate);
    }

    // Tier 2: database scan, alphabetical over the BTreeMap.
    let mut full = Vec::new();
    let mut partial = Vec::new();
    let mut path_partial = Vec::new();
    for (entry, weight) in store {
        let Some(text) = entry.to_str() else { continue };
        let Some(classified) = classify_entry(text, &spec) else {
            continue;
        };
        let path = PathBuf::from(classified.path);
        if !seen.insert(path.clone()) {
            continue;
        }
        let candidate = MatchCandidate {
            path,
            source: classified.source.map(PathBuf::from),
            weight: *weight,
            cumulated_weight: cumulated_weight(store, entry),
            tier: classified.tier,
        };
        match classified.tier {
            Tier::DirectoryFull => full.push(candidate),
            Tier::DirectoryPartial => partial.push(candidate),
            _ => path_partial.push(candidate),
        }
    }
    full.sort_by(candidate_order);
    partial.sort_by(candidate_order);
    path_partial.sort_by(candidate_order);

    let mut have_any =
        !(direct.is_empty() && full.is_empty() && partial.is_empty() && path_partial.is_empty());

    // Tier 3: recursive scan under the current directory.
    let mut cwd_scan = Vec::new();
    if !options.no_sub_cwd && (mode == ResolveMode::All || !have_any) {
        cwd_scan = cwd_scan_tier(store, cwd, &spec, options, &mut seen);
        cwd_scan.sort_by(candidate_order);
        have_any = have_any || !cwd_scan.is_empty();
    }

    // Tier 4: recursive scans under database entries, heaviest first.
    let mut sub_db = Vec::new();
    if !options.no_sub_db && (mode == ResolveMode::All || !have_any) {
        sub_db = sub_db_scan_tier(store, &spec, options, &mut seen);
        sub_db.sort_by(candidate_order);
    }

    // Merge in fixed tier order.
    let mut results = direct;
    results.extend(full);
    results.extend(partial);
    results.extend(path_partial);
    results.extend(cwd_scan);
    results.extend(sub_db);

    if mode == ResolveMode::First {
        results.truncate(1);
    }
    Ok(results)
}

/// The three-key tie-break law: weight descending, cumulated path weight
/// descending, path ascending.
fn candidate_order(left: &MatchCandidate, right: &MatchCandidate) -> Ordering {
    right
        .weight
        .cmp(&left.weight)
        .then_with(|| right.cumulated_weight.cmp(&left.cumulated_weight))
        .then_with(|| left.path.cmp(&right.path))
}

/// Sum of the weights of every prefix of `path` (inclusive) that is a
/// database key.
fn cumulated_weight(store: &WeightMap, path: &Path) -> Weight {
    path.ancestors()
        .filter_map(|ancestor| store.get(ancestor))
        .sum()
}

/// Tier 1: the lone fragment names a directory directly, either as an
/// absolute path or relative to `cwd`.
fn direct_path_candidate(fragment: &str, cwd: &Path) -> Option<MatchCandidate> {
    let as_path = Path::new(fragment);
    if as_path.is_absolute() && as_path.is_dir() {
        return Some(MatchCandidate {
            path: as_path.to_path_buf(),
            source: None,
            weight: 0,
            cumulated_weight: 0,
            tier: Tier::DirectPath,
        });
    }
    let cleaned = clean_relative(fragment);
    if !cleaned.is_empty() && cwd.join(cleaned).is_dir() {
        return Some(MatchCandidate {
            path: PathBuf::from(cleaned),
            source: None,
            weight: 0,
            cumulated_weight: 0,
            tier: Tier::DirectPath,
        });
    }
    None
}

/// Strip any leading `./` sequences and redundant leading separators.
fn clean_relative(fragment: &str) -> &str {
    let mut rest = fragment;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            return rest;
        }
    }
}

/// Outcome of classifying one database entry against the pattern spec.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Classified<'entry> {
    pub(crate) tier: Tier,
    /// The derived candidate path (a prefix of the entry for `PathPartial`).
    pub(crate) path: &'entry str,
    /// The untruncated entry, when it differs from `path`.
    pub(crate) source: Option<&'entry str>,
}

/// Pure per-entry classifier for the database-scan tier. First match wins:
/// full end-directory match, partial end-directory match, then a match
/// anywhere along the path.
pub(crate) fn classify_entry<'entry>(
    entry: &'entry str,
    spec: &PatternSpec,
) -> Option<Classified<'entry>> {
    let last_segment = entry.rsplit('/').next().unwrap_or(entry);
    if spec.matches_full(entry) {
        if spec.end_matches_exact(last_segment) {
            return Some(Classified {
                tier: Tier::DirectoryFull,
                path: entry,
                source: None,
            });
        }
        if spec.end_matches(last_segment) {
            return Some(Classified {
                tier: Tier::DirectoryPartial,
                path: entry,
                source: None,
            });
        }
    }
    let (_, end) = spec.full_match_span(entry)?;
    let path = prefix_through_match(entry, end);
    Some(Classified {
        tier: Tier::PathPartial,
        path,
        source: (path.len() != entry.len()).then_some(entry),
    })
}

/// Truncate `text` after the path component in which a match ending at
/// byte `match_end` landed. Never cuts mid-component.
fn prefix_through_match(text: &str, match_end: usize) -> &str {
    let tail = text.get(match_end..).unwrap_or("");
    match tail.find('/') {
        Some(offset) => text.get(..match_end + offset).unwrap_or(text),
        None => text,
    }
}

/// Tier 3: scan under `cwd` and match cwd-relative remainders. Remainders
/// are matched with a leading `/` prepended so root-anchored patterns
/// behave the same as against database entries.
fn cwd_scan_tier(
    store: &WeightMap,
    cwd: &Path,
    spec: &PatternSpec,
    options: &ResolutionOptions,
    seen: &mut HashSet<PathBuf>,
) -> Vec<MatchCandidate> {
    let mut candidates = Vec::new();
    for dir in scanner::scan_dirs(cwd, &options.ignore_rules) {
        let Ok(relative) = dir.strip_prefix(cwd) else {
            continue;
        };
        let Some(relative_text) = relative.to_str() else {
            continue;
        };
        let probe = format!("/{relative_text}");
        let Some((_, end)) = spec.full_match_span(&probe) else {
            continue;
        };
        let derived = prefix_through_match(&probe, end);
        let derived = derived.strip_prefix('/').unwrap_or(derived);
        if derived.is_empty() {
            continue;
        }
        let path = PathBuf::from(derived);
        if !seen.insert(path.clone()) {
            continue;
        }
        let absolute = cwd.join(derived);
        candidates.push(MatchCandidate {
            path,
            source: None,
            weight: 0,
            cumulated_weight: cumulated_weight(store, &absolute),
            tier: Tier::CwdSubScan,
        });
    }
    candidates
}

/// Tier 4: scan under each database entry, heaviest entry first, and match
/// entry-relative remainders. Matches carry a fixed weight of 1 (one level
/// under a trusted entry) and the owning entry's cumulated weight.
fn sub_db_scan_tier(
    store: &WeightMap,
    spec: &PatternSpec,
    options: &ResolutionOptions,
    seen: &mut HashSet<PathBuf>,
) -> Vec<MatchCandidate> {
    let mut ordered: Vec<(&PathBuf, &Weight)> = store.iter().collect();
    ordered.sort_by(|left, right| right.1.cmp(left.1).then_with(|| left.0.cmp(right.0)));

    let mut candidates = Vec::new();
    for (entry, _weight) in ordered {
        if !entry.is_dir() {
            continue;
        }
        let entry_cumulated = cumulated_weight(store, entry);
        for dir in scanner::scan_dirs(entry, &options.ignore_rules) {
            let Ok(relative) = dir.strip_prefix(entry) else {
                continue;
            };
            let Some(relative_text) = relative.to_str() else {
                continue;
            };
            let probe = format!("/{relative_text}");
            let Some((_, end)) = spec.full_match_span(&probe) else {
                continue;
            };
            let derived = prefix_through_match(&probe, end);
            let derived = derived.strip_prefix('/').unwrap_or(derived);
            if derived.is_empty() {
                continue;
            }
            let path = entry.join(derived);
            if !seen.insert(path.clone()) {
                continue;
            }
            candidates.push(MatchCandidate {
                path,
                source: None,
                weight: 1,
                cumulated_weight: entry_cumulated,
                tier: Tier::SubDbScan,
            });
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(parts: &[&str]) -> PatternSpec {
        let fragments: Vec<String> = parts.iter().map(|part| (*part).to_owned()).collect();
        PatternSpec::build(&fragments, false).unwrap()
    }

    #[test]
    fn test_classify_full_end_match() {
        let classified = classify_entry("/p/p3/B", &spec(&["B"])).unwrap();
        assert_eq!(classified.tier, Tier::DirectoryFull);
        assert_eq!(classified.path, "/p/p3/B");
        assert_eq!(classified.source, None);
    }

    #[test]
    fn test_classify_partial_end_match() {
        let classified = classify_entry("/p/p3/B_directory", &spec(&["B"])).unwrap();
        assert_eq!(classified.tier, Tier::DirectoryPartial);
        assert_eq!(classified.path, "/p/p3/B_directory");
    }

    #[test]
    fn test_classify_path_partial_truncates_to_component() {
        let classified = classify_entry("/home/projects/deep/other", &spec(&["proj"])).unwrap();
        assert_eq!(classified.tier, Tier::PathPartial);
        assert_eq!(classified.path, "/home/projects");
        assert_eq!(classified.source, Some("/home/projects/deep/other"));
    }

    #[test]
    fn test_classify_no_match() {
        assert!(classify_entry("/var/log", &spec(&["missing"])).is_none());
    }

    #[test]
    fn test_classify_multi_fragment_needs_order() {
        let ordered = spec(&["home", "proj"]);
        assert!(classify_entry("/home/user/projects", &ordered).is_some());
        assert!(classify_entry("/projects/home", &ordered).is_none());
    }

    #[test]
    fn test_prefix_through_match() {
        assert_eq!(prefix_through_match("/a/bcd/e", 4), "/a/bcd");
        assert_eq!(prefix_through_match("/a/bcd", 4), "/a/bcd");
        assert_eq!(prefix_through_match("/a/bcd/e", 7), "/a/bcd/e");
    }

    #[test]
    fn test_clean_relative() {
        assert_eq!(clean_relative("./foo"), "foo");
        assert_eq!(clean_relative(".///foo/bar"), "foo/bar");
        assert_eq!(clean_relative("//foo"), "foo");
        assert_eq!(clean_relative("././foo"), "foo");
        assert_eq!(clean_relative("foo"), "foo");
    }

    #[test]
    fn test_cumulated_weight_sums_prefixes() {
        let mut store = WeightMap::new();
        store.insert(PathBuf::from("/p"), 2);
        store.insert(PathBuf::from("/p/q"), 3);
        store.insert(PathBuf::from("/p/q/r"), 5);
        store.insert(PathBuf::from("/unrelated"), 100);

        assert_eq!(cumulated_weight(&store, Path::new("/p/q/r")), 10);
        assert_eq!(cumulated_weight(&store, Path::new("/p/q")), 5);
        assert_eq!(cumulated_weight(&store, Path::new("/elsewhere")), 0);
    }

    #[test]
    fn test_candidate_order_three_keys() {
        let make = |weight, cumulated, path: &str| MatchCandidate {
            path: PathBuf::from(path),
            source: None,
            weight,
            cumulated_weight: cumulated,
            tier: Tier::DirectoryFull,
        };
        let mut candidates = vec![
            make(1, 0, "/b"),
            make(1, 0, "/a"),
            make(1, 5, "/z"),
            make(9, 0, "/y"),
        ];
        candidates.sort_by(candidate_order);
        let order: Vec<&str> = candidates
            .iter()
            .map(|candidate| candidate.path.to_str().unwrap())
            .collect();
        assert_eq!(order, ["/y", "/z", "/a", "/b"]);
    }
}

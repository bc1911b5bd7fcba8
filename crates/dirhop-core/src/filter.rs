//! Post-filter keeping only candidates that contain a matching child file.

use std::fs;
use std::path::Path;

use glob::Pattern;

use crate::error::{Error, Result};
use crate::resolver::MatchCandidate;

/// Keep only candidates whose directory contains at least one immediate
/// child file whose name matches `name_pattern`. Without a pattern this
/// is the identity.
///
/// The check runs against a candidate's `source` when present, else its
/// `path`. A directory that cannot be listed is treated as having no
/// matching file.
///
/// # Errors
/// Returns [`Error::Glob`] if `name_pattern` is not valid glob syntax.
pub fn filter_by_file(
    candidates: Vec<MatchCandidate>,
    name_pattern: Option<&str>,
) -> Result<Vec<MatchCandidate>> {
    let Some(pattern_text) = name_pattern else {
        return Ok(candidates);
    };
    let pattern = Pattern::new(pattern_text).map_err(|source| Error::Glob {
        pattern: pattern_text.to_owned(),
        source,
    })?;

    Ok(candidates
        .into_iter()
        .filter(|candidate| {
            let dir = candidate.source.as_deref().unwrap_or(&candidate.path);
            has_matching_file(dir, &pattern)
        })
        .collect())
}

/// Whether `dir` has an immediate child file matching `pattern`.
fn has_matching_file(dir: &Path, pattern: &Pattern) -> bool {
    let Ok(reader) = fs::read_dir(dir) else {
        tracing::debug!("cannot list {} for file filtering", dir.display());
        return false;
    };
    for entry in reader.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_file() && pattern.matches(&entry.file_name().to_string_lossy()) {
            return true;
        }
    }
    false
}

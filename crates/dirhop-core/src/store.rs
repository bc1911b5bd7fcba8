//! Persistent weight database: one `<weight><space><absolute-path>` line
//! per visited directory.
//!
//! The file is rewritten wholesale on every mutation, through a sibling
//! temp file renamed over the old one, so a reader never observes a
//! half-written database. There is no cross-process lock; racing writers
//! are last-writer-wins.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::{Error as IoError, ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Accumulated weight of a database entry.
///
/// Signed so that callers can hand a decremented table to [`save`]; the
/// save path clamps negatives back to zero.
pub type Weight = i64;

/// Mapping of absolute directory path to accumulated weight.
///
/// A `BTreeMap` keeps iteration alphabetical, which the database-scan
/// tier relies on for deterministic output.
pub type WeightMap = BTreeMap<PathBuf, Weight>;

/// Environment variable overriding the database location.
pub const DATABASE_ENV: &str = "DIRHOP_DATABASE";

/// Resolve the database path: `$DIRHOP_DATABASE`, else `~/.dirhop/database`.
///
/// # Errors
/// Returns [`Error::NoHomeDir`] if no override is set and the home
/// directory cannot be determined.
pub fn default_path() -> Result<PathBuf> {
    if let Some(path) = env::var_os(DATABASE_ENV) {
        return Ok(PathBuf::from(path));
    }
    dirs::home_dir()
        .map(|home| home.join(".dirhop").join("database"))
        .ok_or(Error::NoHomeDir)
}

/// Load the weight database from `path`.
///
/// Lines that do not match `<non-negative-integer><space><path>` are
/// skipped silently. An absent file yields an empty map.
///
/// # Errors
/// Returns [`Error::DatabaseUnreadable`] if the file exists but cannot
/// be opened or read.
pub fn load(path: &Path) -> Result<WeightMap> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(WeightMap::new()),
        Err(source) => {
            return Err(Error::DatabaseUnreadable {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut entries = WeightMap::new();
    for line in contents.lines() {
        let Some((weight, entry)) = parse_line(line) else {
            tracing::debug!("skipping malformed database line: {line:?}");
            continue;
        };
        entries.insert(PathBuf::from(entry), weight);
    }
    Ok(entries)
}

/// Parse one database line into `(weight, path)`.
fn parse_line(line: &str) -> Option<(Weight, &str)> {
    let (weight_text, entry) = line.split_once(' ')?;
    if weight_text.is_empty() || !weight_text.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    if entry.is_empty() {
        return None;
    }
    let weight = weight_text.parse::<Weight>().ok()?;
    Some((weight, entry))
}

/// Rewrite the whole database at `path` from `entries`.
///
/// Entries whose path is no longer a directory are dropped with a
/// warning. Negative weights are clamped to zero with a warning. A
/// trailing path separator is stripped, the filesystem root excepted.
///
/// # Errors
/// Returns [`Error::DatabaseWrite`] if the rewrite fails; the previous
/// on-disk state is left untouched in that case.
pub fn save(path: &Path, entries: &WeightMap) -> Result<()> {
    let write_error = |source: IoError| Error::DatabaseWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(write_error)?;

    let mut file = NamedTempFile::new_in(parent).map_err(write_error)?;
    for (entry, weight) in entries {
        if !entry.is_dir() {
            tracing::warn!("dropping stale database entry {}", entry.display());
            continue;
        }
        let weight = if *weight < 0 {
            tracing::warn!(
                "clamping negative weight {weight} for {} to 0",
                entry.display()
            );
            0
        } else {
            *weight
        };
        writeln!(file, "{weight} {}", normalized_entry(entry)).map_err(write_error)?;
    }

    file.persist(path)
        .map_err(|persist| write_error(persist.error))?;
    Ok(())
}

/// Strip a trailing separator from an entry path, root excepted.
fn normalized_entry(path: &Path) -> String {
    let text = path.to_string_lossy();
    let trimmed = text.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        trimmed.to_owned()
    }
}

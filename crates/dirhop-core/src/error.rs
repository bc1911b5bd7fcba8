use core::result::Result as CoreResult;
use std::io::Error as IoError;
use std::path::PathBuf;

use glob::PatternError;
use regex::Error as RegexError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Result type for resolver operations.
pub type Result<T> = CoreResult<T, Error>;

/// Errors that can occur in the resolution engine.
///
/// Everything here is fatal for the current invocation. Recoverable
/// conditions (stale database entries, negative weights, unreadable scan
/// entries) are reported through `tracing` warnings and compensated in
/// place instead of surfacing as error values.
#[derive(Debug, Error)]
pub enum Error {
    /// The weight database exists but could not be opened or read.
    #[error("database {path:?} is unreadable: {source}")]
    DatabaseUnreadable {
        /// Location of the database file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: IoError,
    },

    /// Rewriting the weight database failed. The previous on-disk state
    /// is untouched; the rewrite goes through a sibling temp file.
    #[error("failed to write database {path:?}: {source}")]
    DatabaseWrite {
        /// Location of the database file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: IoError,
    },

    /// A user-supplied fragment did not compile as a regex.
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] RegexError),

    /// A configured glob (ignore rule, blacklist, or file filter) is invalid.
    #[error("invalid glob pattern {pattern:?}: {source}")]
    Glob {
        /// The offending pattern text.
        pattern: String,
        /// Underlying glob compile failure.
        #[source]
        source: PatternError,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    Config(#[from] TomlError),

    /// Home directory lookup failed, so no default file location exists.
    #[error("could not determine home directory")]
    NoHomeDir,

    /// An I/O operation outside the database failed.
    #[error("IO error: {0}")]
    Io(#[from] IoError),
}

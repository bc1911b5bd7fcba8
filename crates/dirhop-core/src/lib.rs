//! dirhop-core — the match-resolution engine behind the `dirhop` CLI.
//!
//! Resolves a short, possibly incomplete sequence of path fragments into
//! the most plausible directory, using a persistent store of previously
//! visited directories weighted by frequency. The cascade runs six tiers
//! in a fixed order (direct path, three database classifications, a cwd
//! sub-scan, and sub-scans under database entries) and ranks candidates
//! by weight, cumulated ancestor weight, then path.

/// Resolver configuration and option plumbing.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Candidate narrowing by contained file name.
pub mod filter;
/// Fragment-to-pattern compilation.
pub mod pattern;
/// The cascading match resolver.
pub mod resolver;
/// Recursive directory enumeration with pruning.
pub mod scanner;
/// Persistent weight database.
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::filter_by_file;
pub use pattern::PatternSpec;
pub use resolver::{MatchCandidate, ResolutionOptions, ResolveMode, Tier, resolve};
pub use scanner::IgnoreRule;
pub use store::{Weight, WeightMap, load as load_store, save as save_store};

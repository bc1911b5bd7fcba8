//! Resolver configuration, loaded from `~/.dirhop/config.toml` (or the
//! file named by `DIRHOP_CONFIG`). Every field is optional; an absent
//! file means defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::resolver::ResolutionOptions;
use crate::scanner::IgnoreRule;

/// Environment variable overriding the config location.
pub const CONFIG_ENV: &str = "DIRHOP_CONFIG";

/// On-disk configuration consumed by the resolver and the add workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Basename globs pruned from recursive scans.
    pub ignore_path: Vec<String>,
    /// Full-path globs never added to the store.
    pub black_listed_directories: Vec<String>,
    /// Case-insensitive matching.
    pub ignore_case: bool,
    /// Disable the direct-path tier.
    pub no_direct_path: bool,
    /// Disable the cwd sub-scan tier.
    pub no_sub_cwd: bool,
    /// Disable the database sub-scan tier.
    pub no_sub_db: bool,
}

impl Config {
    /// Resolve the config path: `$DIRHOP_CONFIG`, else `~/.dirhop/config.toml`.
    ///
    /// # Errors
    /// Returns [`Error::NoHomeDir`] if no override is set and the home
    /// directory cannot be determined.
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        dirs::home_dir()
            .map(|home| home.join(".dirhop").join("config.toml"))
            .ok_or(Error::NoHomeDir)
    }

    /// Load config from a specific file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        tracing::debug!(
            "loaded config from {}: {} ignore rule(s), {} blacklist rule(s)",
            path.display(),
            config.ignore_path.len(),
            config.black_listed_directories.len()
        );
        Ok(config)
    }

    /// Load config from the default location, falling back to defaults
    /// when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or if no config location can be determined.
    pub fn load_or_default() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Compile this config into the per-call option set the resolver takes.
    ///
    /// # Errors
    /// Returns [`Error::Glob`] if an `ignore_path` entry is invalid.
    pub fn resolution_options(&self) -> Result<ResolutionOptions> {
        let ignore_rules = self
            .ignore_path
            .iter()
            .map(|pattern| IgnoreRule::new(pattern))
            .collect::<Result<Vec<_>>>()?;
        Ok(ResolutionOptions {
            ignore_case: self.ignore_case,
            no_direct_path: self.no_direct_path,
            no_sub_cwd: self.no_sub_cwd,
            no_sub_db: self.no_sub_db,
            ignore_rules,
        })
    }

    /// Compile the blacklist globs used by the add workflow.
    ///
    /// # Errors
    /// Returns [`Error::Glob`] if a `black_listed_directories` entry is
    /// invalid.
    pub fn blacklist(&self) -> Result<Vec<Pattern>> {
        self.black_listed_directories
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| Error::Glob {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect()
    }
}

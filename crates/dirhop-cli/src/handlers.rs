//! Command handlers for CLI operations.

use std::env;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context as _, Result, bail};
use dirhop_core::{Config, ResolveMode, WeightMap, store};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, SearchArgs};

/// Initialize tracing to stderr, controlled by `RUST_LOG` (default `warn`).
/// Matches go to stdout only, so output stays machine-consumable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

/// Dispatch a parsed invocation. Returns the process exit code.
///
/// # Errors
/// Returns an error for any fatal condition (unreadable database, failed
/// rewrite, invalid pattern); the caller maps it to exit code 2.
pub fn run(cli: Cli) -> Result<u8> {
    match cli.command {
        Some(Command::Search(args)) => handle_search(&args),
        Some(Command::Add { path }) => handle_add(&path).map(|()| 0),
        Some(Command::Remove { path }) => handle_remove(&path).map(|()| 0),
        Some(Command::Clear) => handle_clear().map(|()| 0),
        Some(Command::List) => handle_list().map(|()| 0),
        None => handle_search(&cli.search),
    }
}

/// Resolve fragments and print one match per line. Exit code 0 with at
/// least one match, 1 with none.
fn handle_search(args: &SearchArgs) -> Result<u8> {
    if args.fragments.is_empty() {
        bail!("no path fragments given");
    }

    let config = Config::load_or_default()?;
    let mut options = config.resolution_options()?;
    if args.ignore_case {
        options.ignore_case = true;
    }

    let database = store::default_path()?;
    let entries = store::load(&database)?;
    let cwd = env::current_dir().context("cannot determine current directory")?;
    let mode = if args.all {
        ResolveMode::All
    } else {
        ResolveMode::First
    };

    let candidates = dirhop_core::resolve(&entries, &cwd, &args.fragments, mode, &options)?;
    let candidates = dirhop_core::filter_by_file(candidates, args.filter.as_deref())?;
    if candidates.is_empty() {
        return Ok(1);
    }

    #[allow(clippy::print_stdout, reason = "Match output")]
    for candidate in &candidates {
        if args.list_weights {
            println!("{} {}", candidate.path.display(), candidate.weight);
        } else {
            println!("{}", candidate.path.display());
        }
    }
    Ok(0)
}

/// Record a visit: insert the directory with weight 1 or bump an existing
/// entry. Blacklisted directories are skipped silently (success).
fn handle_add(path: &Path) -> Result<()> {
    let canonical = fs::canonicalize(path)
        .with_context(|| format!("cannot resolve {}", path.display()))?;
    if !canonical.is_dir() {
        bail!("{} is not a directory", canonical.display());
    }

    let config = Config::load_or_default()?;
    let canonical_text = canonical.to_string_lossy();
    if config
        .blacklist()?
        .iter()
        .any(|rule| rule.matches(canonical_text.as_ref()))
    {
        tracing::debug!("not adding blacklisted directory {canonical_text}");
        return Ok(());
    }

    let database = store::default_path()?;
    let mut entries = store::load(&database)?;
    *entries.entry(canonical).or_insert(0) += 1;
    store::save(&database, &entries)?;
    Ok(())
}

/// Drop a directory from the database. Unknown paths are a no-op.
fn handle_remove(path: &Path) -> Result<()> {
    let database = store::default_path()?;
    let mut entries = store::load(&database)?;
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if entries.remove(&target).is_none() && entries.remove(path).is_none() {
        tracing::warn!("{} was not in the database", path.display());
        return Ok(());
    }
    store::save(&database, &entries)?;
    Ok(())
}

/// Replace the database with an empty table.
fn handle_clear() -> Result<()> {
    let database = store::default_path()?;
    store::save(&database, &WeightMap::new())?;
    Ok(())
}

/// Print `weight<TAB>path`, heaviest first, path ascending within a weight.
fn handle_list() -> Result<()> {
    let database = store::default_path()?;
    let entries = store::load(&database)?;
    let mut ordered: Vec<_> = entries.iter().collect();
    ordered.sort_by(|left, right| right.1.cmp(left.1).then_with(|| left.0.cmp(right.0)));

    #[allow(clippy::print_stdout, reason = "List output")]
    for (path, weight) in ordered {
        println!("{weight}\t{}", path.display());
    }
    Ok(())
}

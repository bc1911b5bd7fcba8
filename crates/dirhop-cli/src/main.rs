//! dirhop - jump to previously visited directories by fuzzy path fragments.
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        clippy::missing_errors_doc,
        clippy::print_stdout,
        clippy::print_stderr,
        reason = "Allow for tests"
    )
)]

use std::process::ExitCode;

use clap::Parser as _;

use crate::cli::Cli;

mod cli;
mod handlers;

fn main() -> ExitCode {
    handlers::init_tracing();
    let cli = Cli::parse();
    match handlers::run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::from(2)
        }
    }
}

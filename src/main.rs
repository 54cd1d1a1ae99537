//! `loomc` entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    loom::cli::run_cli()
}

//! packwright CLI entrypoint.
//!
//! Builds the integration package containing the current (or given)
//! directory, or prints where built packages are placed.

use clap::Parser;
use packwright::cli::Cli;
use packwright::logging;
use packwright::run::{exit_code_for_run_result, run};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbosity);

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

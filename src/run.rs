//! Command dispatch for the CLI.
//!
//! Commands write their results to `stdout` and progress or errors to
//! `stderr`; both are injected so tests can capture them.

use crate::cli::{Cli, Command};
use packwright_builder::dashboards::SavedObjectEncoder;
use packwright_builder::output::write_stderr_line;
use packwright_builder::{BuildError, PackageBuilder, Result, find_build_root};
use std::error::Error as _;
use std::io::Write;

/// Run the command selected by `cli`.
///
/// # Errors
///
/// Returns the build or discovery error, or [`BuildError::WriteOutput`] if
/// `build-dir` cannot write its result. A missing build directory for
/// `build-dir` is reported as an error message on `stderr` with a failing
/// result.
pub fn run(cli: &Cli, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<bool> {
    let start_dir = cli.start_dir()?;
    log::debug!("starting from {start_dir}");

    match cli.command() {
        Command::Build => {
            let builder = PackageBuilder::new(cli.build_config(&start_dir), SavedObjectEncoder);
            let output = builder.build(stderr)?;
            log::info!("built {} into {}", output.package_root, output.destination);
            Ok(true)
        }
        Command::BuildDir => {
            let config = cli.build_config(&start_dir);
            match find_build_root(&config.start_dir, config.kind)? {
                Some(build_root) => {
                    writeln!(stdout, "{build_root}")
                        .map_err(|source| BuildError::WriteOutput { source })?;
                    Ok(true)
                }
                None => {
                    write_stderr_line(
                        stderr,
                        format!("no build directory found above {start_dir}"),
                    );
                    Ok(false)
                }
            }
        }
    }
}

/// Convert a run result into a process exit code, printing errors.
///
/// The full error chain is printed, one cause per line.
#[must_use]
pub fn exit_code_for_run_result(result: Result<bool>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(err) => {
            write_error_chain(&err, stderr);
            1
        }
    }
}

fn write_error_chain(err: &BuildError, stderr: &mut dyn Write) {
    write_stderr_line(stderr, format!("Error: {err}"));
    let mut source = err.source();
    while let Some(cause) = source {
        write_stderr_line(stderr, format!("  caused by: {cause}"));
        source = cause.source();
    }
}

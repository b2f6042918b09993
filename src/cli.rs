//! CLI argument definitions for packwright.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint so the parsing rules can be unit tested.

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use packwright_builder::{BuildConfig, locate::current_dir_utf8};

/// Build integration packages into the project's build directory.
#[derive(Parser, Debug, Default)]
#[command(name = "packwright")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build integration packages into the project's build directory.\n\n",
    "packwright looks upward from the current directory for a manifest.yml ",
    "declaring `type: integration` and a version, then copies that package to ",
    "build/integrations/<name>/<version> under the nearest existing build ",
    "directory. When no build directory exists yet, one is created next to the ",
    "nearest .git directory.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build the package containing the current directory:\n",
    "    $ packwright\n\n",
    "  Build a package elsewhere without changing directory:\n",
    "    $ packwright -C packages/nginx build\n\n",
    "  Show where built packages go:\n",
    "    $ packwright build-dir",
))]
pub struct Cli {
    /// Subcommand to execute (defaults to `build`).
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Start searching from DIR instead of the current directory.
    #[arg(short = 'C', long = "directory", value_name = "DIR", global = true)]
    pub directory: Option<Utf8PathBuf>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet",
        global = true
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity", global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Build the package containing the start directory (default).
    Build,

    /// Print the existing build directory for integration packages.
    BuildDir,
}

impl Cli {
    /// Returns the command to run, treating no subcommand as `build`.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Build)
    }

    /// Resolve the directory searches start from.
    ///
    /// A relative `--directory` is resolved against the working directory so
    /// the upward walk can reach the filesystem root.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is needed but cannot be
    /// determined.
    pub fn start_dir(&self) -> packwright_builder::Result<Utf8PathBuf> {
        match self.directory.as_deref() {
            Some(dir) if dir.is_absolute() => Ok(dir.to_owned()),
            Some(dir) => Ok(current_dir_utf8()?.join(dir)),
            None => current_dir_utf8(),
        }
    }

    /// Build configuration for a run anchored at `start_dir`.
    #[must_use]
    pub fn build_config(&self, start_dir: &Utf8Path) -> BuildConfig {
        BuildConfig {
            quiet: self.quiet,
            ..BuildConfig::new(start_dir)
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

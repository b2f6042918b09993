//! Packwright command-line front end.
//!
//! The binary wires the [`packwright_builder`] library to a clap interface and
//! installs logging. The pieces live in this library so they can be tested
//! without spawning the binary.
//!
//! # Modules
//!
//! - [`cli`] - Command-line argument definitions
//! - [`logging`] - Log subscriber setup driven by verbosity flags
//! - [`run`] - Command dispatch and exit code handling

pub mod cli;
pub mod logging;
pub mod run;

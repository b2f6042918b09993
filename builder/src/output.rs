//! Progress narration helpers.

use std::fmt::Display;
use std::io::Write;

/// Write a single line to `stderr`, ignoring write failures.
///
/// Progress output is best effort; a closed or broken stream must never fail
/// a build.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

/// Progress sink that can be silenced.
pub struct Progress<'a> {
    stderr: &'a mut dyn Write,
    quiet: bool,
}

impl<'a> Progress<'a> {
    /// Wrap `stderr`, dropping every line when `quiet` is set.
    pub fn new(stderr: &'a mut dyn Write, quiet: bool) -> Self {
        Self { stderr, quiet }
    }

    /// Emit one progress line unless quiet.
    pub fn line(&mut self, message: impl Display) {
        if !self.quiet {
            write_stderr_line(&mut *self.stderr, message);
        }
    }
}

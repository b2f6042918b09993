//! Log subscriber setup for the CLI.
//!
//! Library code logs through the `log` facade. The binary installs a
//! `tracing-subscriber` formatter that also receives `log` records, writing
//! to stderr so progress and diagnostics never mix with command output.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Map the `-v` count to a default level filter.
#[must_use]
pub const fn level_for_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over the verbosity-derived default. Calling
/// this more than once leaves the first subscriber in place.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbosity).into())
        .from_env_lossy();
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        log::debug!("log subscriber already installed");
    }
}

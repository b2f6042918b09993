//! Error types for package discovery and builds.
//!
//! Each variant names the operation that failed and the path involved, and
//! keeps the underlying cause reachable through [`std::error::Error::source`].
//! "Not found" outcomes of the discovery walks are not errors; they surface as
//! `Ok(None)` and only become [`BuildError::PackageRootNotFound`] when a build
//! was requested.

use crate::build::BuildStage;
use crate::dashboards::DashboardError;
use crate::files::CopyError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or building a package.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The process working directory could not be determined.
    #[error("locating working directory failed")]
    WorkingDirectory {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path that must be handled as UTF-8 is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    NonUtf8Path {
        /// Lossy rendering of the offending path.
        path: String,
    },

    /// A candidate path could not be inspected during an upward walk.
    #[error("inspecting path failed (path: {path})")]
    Inspect {
        /// Path whose metadata could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest file could not be read.
    #[error("reading file body failed (path: {path})")]
    ManifestRead {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest file is not a valid YAML manifest.
    #[error("unmarshalling package manifest failed (path: {path})")]
    ManifestParse {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The package manifest cannot be turned into a destination path.
    #[error("invalid package manifest (path: {path}): {reason}")]
    InvalidManifest {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// Why the manifest was rejected.
        reason: String,
    },

    /// The upward search for a package root failed.
    #[error("locating package root failed")]
    LocatePackageRoot {
        /// The error that aborted the walk.
        #[source]
        source: Box<BuildError>,
    },

    /// No ancestor of the start directory is a valid package root.
    #[error("package root not found (searched from: {start})")]
    PackageRootNotFound {
        /// Directory the search started from.
        start: Utf8PathBuf,
    },

    /// No `.git` ancestor exists under which a build directory can be created.
    #[error("locating place for build directory failed (searched from: {start})")]
    PlacementNotFound {
        /// Directory the search started from.
        start: Utf8PathBuf,
    },

    /// The build directory could not be created.
    #[error("mkdir failed (path: {path})")]
    CreateBuildDir {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The destination directory could not be cleared.
    #[error("clearing package contents failed (path: {path})")]
    ClearDestination {
        /// Destination directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Package contents could not be copied into the destination.
    #[error("copying package contents failed (source: {source_dir}, destination: {destination})")]
    CopyContents {
        /// Package root being copied.
        source_dir: Utf8PathBuf,
        /// Destination directory.
        destination: Utf8PathBuf,
        /// The underlying copy error.
        #[source]
        source: CopyError,
    },

    /// Dashboards in the destination could not be encoded.
    #[error("encoding dashboards failed (path: {path})")]
    EncodeDashboards {
        /// Destination directory.
        path: Utf8PathBuf,
        /// The underlying encoder error.
        #[source]
        source: DashboardError,
    },

    /// Command output could not be written.
    #[error("writing command output failed")]
    WriteOutput {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A build step after discovery failed.
    #[error("building package failed before {stage} (root: {root})")]
    BuildPackage {
        /// Package root being built.
        root: Utf8PathBuf,
        /// Stage the build failed to reach.
        stage: BuildStage,
        /// The error raised by that stage.
        #[source]
        source: Box<BuildError>,
    },
}

/// Result type alias using [`BuildError`].
pub type Result<T> = std::result::Result<T, BuildError>;

//! Build orchestration for integration packages.
//!
//! A build runs a fixed sequence of stages against the filesystem: locate
//! the package root, resolve (or create) the build directory, re-read the
//! manifest, clear the destination, copy the package, and encode its
//! dashboards. The first failing stage ends the build; partial output is left
//! in place and re-running the build converges because the destination is
//! always cleared before it is repopulated.

use crate::dashboards::{DashboardEncoder, SavedObjectEncoder};
use crate::error::{BuildError, Result};
use crate::files::{self, DEFAULT_DIR_MODE};
use crate::kind::PackageKind;
use crate::locate::{self, current_dir_utf8};
use crate::manifest::{PACKAGE_MANIFEST_FILE, PackageManifest};
use crate::output::Progress;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use std::fmt;
use std::io::Write;

/// Stages of a package build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Nothing has happened yet.
    Start,
    /// The package root has been found.
    RootLocated,
    /// The build directory exists (found or created).
    BuildDirResolved,
    /// The manifest has been re-read and the destination computed.
    ManifestRead,
    /// The destination is an empty directory.
    DestinationCleared,
    /// The package tree has been copied into the destination.
    ContentCopied,
    /// Dashboards in the destination have been encoded.
    Transformed,
    /// The build finished.
    Done,
}

impl BuildStage {
    /// The stage that follows this one; `Done` is terminal.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Start => Self::RootLocated,
            Self::RootLocated => Self::BuildDirResolved,
            Self::BuildDirResolved => Self::ManifestRead,
            Self::ManifestRead => Self::DestinationCleared,
            Self::DestinationCleared => Self::ContentCopied,
            Self::ContentCopied => Self::Transformed,
            Self::Transformed | Self::Done => Self::Done,
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::RootLocated => "root located",
            Self::BuildDirResolved => "build directory resolved",
            Self::ManifestRead => "manifest read",
            Self::DestinationCleared => "destination cleared",
            Self::ContentCopied => "content copied",
            Self::Transformed => "transformed",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Settings for a single build.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory the upward searches start from.
    pub start_dir: Utf8PathBuf,
    /// Kind of package to build.
    pub kind: PackageKind,
    /// Permission bits for directories the build creates.
    pub dir_mode: u32,
    /// Suppress progress lines.
    pub quiet: bool,
}

impl BuildConfig {
    /// Default settings anchored at `start_dir`.
    #[must_use]
    pub fn new(start_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            start_dir: start_dir.into(),
            kind: PackageKind::default(),
            dir_mode: DEFAULT_DIR_MODE,
            quiet: false,
        }
    }

    /// Default settings anchored at the process working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined or is
    /// not valid UTF-8.
    pub fn from_cwd() -> Result<Self> {
        Ok(Self::new(current_dir_utf8()?))
    }
}

/// Paths involved in a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    /// The package root that was built.
    pub package_root: Utf8PathBuf,
    /// The build-output root the package was placed under.
    pub build_root: Utf8PathBuf,
    /// `build_root/<name>/<version>`.
    pub destination: Utf8PathBuf,
}

/// Runs package builds with a given dashboard encoder.
pub struct PackageBuilder<E> {
    config: BuildConfig,
    encoder: E,
}

impl<E: DashboardEncoder> PackageBuilder<E> {
    /// Create a builder for `config` that encodes dashboards with `encoder`.
    #[must_use]
    pub const fn new(config: BuildConfig, encoder: E) -> Self {
        Self { config, encoder }
    }

    /// The settings this builder runs with.
    #[must_use]
    pub const fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// The encoder this builder hands destinations to.
    #[must_use]
    pub const fn encoder(&self) -> &E {
        &self.encoder
    }

    /// Build the package containing the configured start directory.
    ///
    /// Progress lines are written to `stderr` unless the config is quiet.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::LocatePackageRoot`] if the package search fails,
    /// [`BuildError::PackageRootNotFound`] if no package root exists above the
    /// start directory, and [`BuildError::BuildPackage`] wrapping the cause
    /// and stage of any later failure.
    pub fn build(&self, stderr: &mut dyn Write) -> Result<BuildOutput> {
        let mut progress = Progress::new(stderr, self.config.quiet);
        let start = &self.config.start_dir;

        let package_root = locate::find_package_root(start, self.config.kind)
            .map_err(|source| BuildError::LocatePackageRoot {
                source: Box::new(source),
            })?
            .ok_or_else(|| BuildError::PackageRootNotFound {
                start: start.clone(),
            })?;

        let mut stage = BuildStage::RootLocated;
        log::debug!("build stage: {stage} ({package_root})");
        self.run_stages(&package_root, &mut stage, &mut progress)
            .map_err(|source| BuildError::BuildPackage {
                root: package_root.clone(),
                stage: stage.next(),
                source: Box::new(source),
            })
    }

    fn run_stages(
        &self,
        package_root: &Utf8Path,
        stage: &mut BuildStage,
        progress: &mut Progress<'_>,
    ) -> Result<BuildOutput> {
        progress.line(format!("Building package: {package_root}"));

        let build_root = self.resolve_build_root()?;
        advance(stage);

        let manifest_path = package_root.join(PACKAGE_MANIFEST_FILE);
        let manifest = PackageManifest::read(&manifest_path)?;
        let destination = destination_for(&build_root, &manifest, &manifest_path)?;
        advance(stage);
        progress.line(format!("Build directory: {destination}"));

        progress.line(format!("Clear target directory (path: {destination})"));
        files::clear_dir(&destination, self.config.dir_mode).map_err(|source| {
            BuildError::ClearDestination {
                path: destination.clone(),
                source,
            }
        })?;
        advance(stage);

        progress.line(format!("Copy package content (source: {package_root})"));
        files::copy_all(package_root, &destination, self.config.dir_mode).map_err(|source| {
            BuildError::CopyContents {
                source_dir: package_root.to_owned(),
                destination: destination.clone(),
                source,
            }
        })?;
        advance(stage);

        progress.line("Encode dashboards");
        self.encoder
            .encode(&destination)
            .map_err(|source| BuildError::EncodeDashboards {
                path: destination.clone(),
                source,
            })?;
        advance(stage);

        progress.line("Done.");
        advance(stage);

        Ok(BuildOutput {
            package_root: package_root.to_owned(),
            build_root,
            destination,
        })
    }

    /// Find the existing build directory, or create one at the project root.
    fn resolve_build_root(&self) -> Result<Utf8PathBuf> {
        let start = &self.config.start_dir;
        if let Some(build_root) = locate::find_build_root(start, self.config.kind)? {
            return Ok(build_root);
        }
        locate::create_build_root(start, self.config.kind, self.config.dir_mode)
    }
}

fn advance(stage: &mut BuildStage) {
    *stage = stage.next();
    log::debug!("build stage: {stage}");
}

/// Compute `build_root/<name>/<version>` from a manifest.
///
/// Both values must be single, non-empty path segments so the destination
/// stays inside the build root.
fn destination_for(
    build_root: &Utf8Path,
    manifest: &PackageManifest,
    manifest_path: &Utf8Path,
) -> Result<Utf8PathBuf> {
    for (field, value) in [("name", &manifest.name), ("version", &manifest.version)] {
        if let Some(reason) = segment_problem(value) {
            return Err(BuildError::InvalidManifest {
                path: manifest_path.to_owned(),
                reason: format!("{field} {value:?} {reason}"),
            });
        }
    }
    Ok(build_root.join(&manifest.name).join(&manifest.version))
}

fn segment_problem(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("is empty");
    }
    let mut components = Utf8Path::new(value).components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(segment)), None) if segment == value => None,
        _ => Some("is not a single path segment"),
    }
}

/// Build the package containing the working directory.
///
/// Uses the default configuration, the production dashboard encoder, and
/// narrates progress to stderr.
///
/// # Errors
///
/// See [`PackageBuilder::build`].
pub fn build_package() -> Result<BuildOutput> {
    let builder = PackageBuilder::new(BuildConfig::from_cwd()?, SavedObjectEncoder);
    builder.build(&mut std::io::stderr())
}

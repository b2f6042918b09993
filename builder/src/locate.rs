//! Package root and build directory discovery.
//!
//! All searches walk upward from a start directory, one parent at a time,
//! checking a fixed relative path at each candidate. The walk stops after the
//! filesystem root, or when a relative start runs out of parents. The
//! `*_from_cwd` variants anchor the search at the process working directory.

use crate::error::{BuildError, Result};
use crate::files;
use crate::kind::PackageKind;
use crate::manifest::{PACKAGE_MANIFEST_FILE, PackageManifest};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs::Metadata;
use std::io;

/// Directory holding build outputs, relative to the project root.
pub const BUILD_DIR: &str = "build";

/// Marker directory identifying a project root.
pub const VCS_MARKER_DIR: &str = ".git";

/// Return the process working directory as a UTF-8 path.
///
/// # Errors
///
/// Returns [`BuildError::WorkingDirectory`] if the directory cannot be read
/// and [`BuildError::NonUtf8Path`] if it is not valid UTF-8.
pub fn current_dir_utf8() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().map_err(|source| BuildError::WorkingDirectory { source })?;
    Utf8PathBuf::try_from(cwd).map_err(|e| BuildError::NonUtf8Path {
        path: e.into_path_buf().to_string_lossy().into_owned(),
    })
}

/// Iterate over `start` and its ancestors, nearest first.
///
/// A relative start stops before reaching `.` or the empty path.
fn candidates(start: &Utf8Path) -> impl Iterator<Item = &Utf8Path> {
    start
        .ancestors()
        .take_while(|dir| !dir.as_str().is_empty() && dir.as_str() != ".")
}

/// Read metadata for `path`, treating a missing path as absent.
///
/// "Not a directory" also counts as absent: it means some component of the
/// path is a regular file, so the path itself cannot exist.
fn inspect(path: &Utf8Path) -> Result<Option<Metadata>> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(None)
        }
        Err(source) => Err(BuildError::Inspect {
            path: path.to_owned(),
            source,
        }),
    }
}

fn is_directory(path: &Utf8Path) -> Result<bool> {
    Ok(inspect(path)?.is_some_and(|metadata| metadata.is_dir()))
}

/// Path of the build-output root for `kind` under `project_root`.
#[must_use]
pub fn build_root_under(project_root: &Utf8Path, kind: PackageKind) -> Utf8PathBuf {
    project_root.join(BUILD_DIR).join(kind.build_dir_name())
}

/// Find the nearest ancestor of `start` that is a buildable package root.
///
/// A candidate qualifies when it contains a regular `manifest.yml` that is
/// buildable for `kind`. A `manifest.yml` directory is ignored.
///
/// Returns `Ok(None)` if no ancestor qualifies.
///
/// # Errors
///
/// A manifest that cannot be read or parsed aborts the walk with
/// [`BuildError::ManifestRead`] or [`BuildError::ManifestParse`]; metadata
/// failures other than "not found" return [`BuildError::Inspect`].
pub fn find_package_root(start: &Utf8Path, kind: PackageKind) -> Result<Option<Utf8PathBuf>> {
    for dir in candidates(start) {
        let manifest_path = dir.join(PACKAGE_MANIFEST_FILE);
        let Some(metadata) = inspect(&manifest_path)? else {
            continue;
        };
        if metadata.is_dir() {
            log::trace!("ignoring manifest directory {manifest_path}");
            continue;
        }

        let manifest = PackageManifest::read(&manifest_path)?;
        if manifest.is_buildable(kind) {
            log::debug!("found package root {dir}");
            return Ok(Some(dir.to_owned()));
        }
        log::trace!(
            "manifest {manifest_path} is not a buildable {kind} package (type: {:?}, version: {:?})",
            manifest.package_type,
            manifest.version
        );
    }
    Ok(None)
}

/// [`find_package_root`] for an integration package, starting at the working
/// directory.
///
/// # Errors
///
/// See [`find_package_root`] and [`current_dir_utf8`].
pub fn find_package_root_from_cwd() -> Result<Option<Utf8PathBuf>> {
    find_package_root(&current_dir_utf8()?, PackageKind::Integration)
}

/// Find an existing build-output root for `kind` above `start`.
///
/// Checks `<candidate>/build/<kind-dir>` at each ancestor and returns the first
/// one that is a directory. Contents are never inspected.
///
/// # Errors
///
/// Returns [`BuildError::Inspect`] if a candidate cannot be inspected.
pub fn find_build_root(start: &Utf8Path, kind: PackageKind) -> Result<Option<Utf8PathBuf>> {
    for dir in candidates(start) {
        let build_root = build_root_under(dir, kind);
        if is_directory(&build_root)? {
            log::debug!("found build directory {build_root}");
            return Ok(Some(build_root));
        }
    }
    Ok(None)
}

/// Locate the target build directory for integration packages, starting at
/// the working directory.
///
/// This is the read-only entry point used for introspection.
///
/// # Errors
///
/// See [`find_build_root`] and [`current_dir_utf8`].
pub fn find_build_packages_directory() -> Result<Option<Utf8PathBuf>> {
    find_build_root(&current_dir_utf8()?, PackageKind::Integration)
}

/// Find the nearest ancestor of `start` containing a `.git` directory.
///
/// # Errors
///
/// Returns [`BuildError::Inspect`] if a candidate cannot be inspected.
pub fn find_project_root(start: &Utf8Path) -> Result<Option<Utf8PathBuf>> {
    for dir in candidates(start) {
        if is_directory(&dir.join(VCS_MARKER_DIR))? {
            return Ok(Some(dir.to_owned()));
        }
    }
    Ok(None)
}

/// Create the build-output root for `kind` at the nearest project root.
///
/// The project root is the nearest ancestor of `start` with a `.git`
/// directory. Missing directories are created with `mode`.
///
/// # Errors
///
/// Returns [`BuildError::PlacementNotFound`] when no project root exists, and
/// [`BuildError::CreateBuildDir`] if the directories cannot be created.
pub fn create_build_root(start: &Utf8Path, kind: PackageKind, mode: u32) -> Result<Utf8PathBuf> {
    let project_root = find_project_root(start)?.ok_or_else(|| BuildError::PlacementNotFound {
        start: start.to_owned(),
    })?;

    let build_root = build_root_under(&project_root, kind);
    files::create_dir_all(&build_root, mode).map_err(|source| BuildError::CreateBuildDir {
        path: build_root.clone(),
        source,
    })?;
    log::debug!("created build directory {build_root}");
    Ok(build_root)
}

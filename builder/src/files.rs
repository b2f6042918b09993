//! Filesystem primitives used by the build.
//!
//! [`clear_dir`] empties (or creates) a directory and [`copy_all`] mirrors a
//! package tree into the destination. Both are blocking and leave whatever
//! they managed to do in place when they fail.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Permission bits for directories created by the builder (Unix only).
pub const DEFAULT_DIR_MODE: u32 = 0o755;

const MAX_DIRECTORY_DEPTH: usize = 64;

/// Errors arising from [`copy_all`].
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// An I/O operation on `path` failed.
    #[error("I/O error at {path}")]
    Io {
        /// Path being read or written.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The copy source is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory {
        /// Path given as the copy source.
        path: Utf8PathBuf,
    },

    /// The source tree nests deeper than the supported limit.
    #[error("refusing to copy {path}: directory depth exceeds limit of {limit} levels")]
    DepthLimit {
        /// Directory at which the limit was hit.
        path: Utf8PathBuf,
        /// The depth limit.
        limit: usize,
    },
}

/// Create `path` and any missing parents with `mode` permissions.
///
/// On non-Unix platforms `mode` is ignored.
///
/// # Errors
///
/// Returns the underlying I/O error if a directory cannot be created.
pub fn create_dir_all(path: &Utf8Path, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
    }
    builder.create(path)
}

/// Remove everything at `path` and leave an empty directory in its place.
///
/// A missing `path` is created. A file or symlink at `path` is replaced by a
/// directory.
///
/// # Errors
///
/// Returns the underlying I/O error if the old contents cannot be removed or
/// the directory cannot be created.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use packwright_builder::files::{DEFAULT_DIR_MODE, clear_dir};
///
/// # fn demo() -> std::io::Result<()> {
/// let temp = tempfile::tempdir()?;
/// let dir = Utf8PathBuf::try_from(temp.path().join("out")).expect("UTF-8 path");
/// std::fs::create_dir_all(&dir)?;
/// std::fs::write(dir.join("stale.txt"), "old")?;
///
/// clear_dir(&dir, DEFAULT_DIR_MODE)?;
/// assert_eq!(std::fs::read_dir(&dir)?.count(), 0);
/// # Ok(())
/// # }
/// # demo().expect("demo");
/// ```
pub fn clear_dir(path: &Utf8Path, mode: u32) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_dir() => fs::remove_dir_all(path)?,
        Ok(_) => fs::remove_file(path)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    create_dir_all(path, mode)
}

/// Recursively copy the contents of `source` into `destination`.
///
/// Relative structure is preserved and existing files are overwritten.
/// `destination` and every directory below it are created with `mode`.
/// Symlinks are dereferenced: the destination receives a regular file or
/// directory holding what the link points to, never a link. When
/// `destination` lies inside `source` it is skipped, so a package can be
/// built into a directory under its own root.
///
/// # Errors
///
/// Returns [`CopyError`] on the first entry that cannot be copied, including
/// a dangling symlink; entries copied before the failure stay in place.
pub fn copy_all(source: &Utf8Path, destination: &Utf8Path, mode: u32) -> Result<(), CopyError> {
    let metadata = fs::metadata(source).map_err(|e| io_error(source, e))?;
    if !metadata.is_dir() {
        return Err(CopyError::NotADirectory {
            path: source.to_owned(),
        });
    }
    let target = Target {
        excluded: destination,
        mode,
    };
    copy_tree(source, destination, &target, MAX_DIRECTORY_DEPTH)
}

struct Target<'a> {
    excluded: &'a Utf8Path,
    mode: u32,
}

fn copy_tree(
    source: &Utf8Path,
    destination: &Utf8Path,
    target: &Target<'_>,
    remaining_depth: usize,
) -> Result<(), CopyError> {
    if remaining_depth == 0 {
        return Err(CopyError::DepthLimit {
            path: source.to_owned(),
            limit: MAX_DIRECTORY_DEPTH,
        });
    }

    create_dir_all(destination, target.mode).map_err(|e| io_error(destination, e))?;
    for entry in source.read_dir_utf8().map_err(|e| io_error(source, e))? {
        let entry = entry.map_err(|e| io_error(source, e))?;
        let entry_path = entry.path();
        if entry_path == target.excluded {
            log::trace!("skipping destination {entry_path} inside source tree");
            continue;
        }

        // Follows symlinks so links are materialised rather than recreated.
        let metadata = fs::metadata(entry_path).map_err(|e| io_error(entry_path, e))?;
        let entry_target = destination.join(entry.file_name());
        if metadata.is_dir() {
            copy_tree(entry_path, &entry_target, target, remaining_depth - 1)?;
        } else {
            remove_link(&entry_target)?;
            fs::copy(entry_path, &entry_target).map_err(|e| io_error(entry_path, e))?;
        }
    }

    Ok(())
}

/// Drop a symlink left at `path` by an earlier copy so writes cannot follow it.
fn remove_link(path: &Utf8Path) -> Result<(), CopyError> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::remove_file(path).map_err(|e| io_error(path, e))
        }
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(io_error(path, e)),
    }
}

fn io_error(path: &Utf8Path, source: io::Error) -> CopyError {
    CopyError::Io {
        path: path.to_owned(),
        source,
    }
}

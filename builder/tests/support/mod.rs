//! Test support utilities for builder behavioural tests.
//!
//! Provides a temporary project tree with helpers for writing manifests and
//! package files, and for snapshotting directory trees so destinations can be
//! compared with their package roots.

use camino::{Utf8Path, Utf8PathBuf};
use packwright_builder::locate::{VCS_MARKER_DIR, find_project_root};
use packwright_builder::manifest::PACKAGE_MANIFEST_FILE;
use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

/// A temporary project directory, optionally marked with `.git`.
pub struct TempProject {
    _temp: TempDir,
    root: Utf8PathBuf,
    /// Set when the environment already provides a `.git` ancestor above the
    /// temporary directory, which makes "no project boundary" unobservable.
    pub skip_assertions: bool,
}

impl TempProject {
    /// Create a project, with a `.git` directory at its root when `with_git`.
    pub fn new(with_git: bool) -> Self {
        let temp = TempDir::new().expect("failed to create temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("non-UTF8 temp path");
        let mut skip_assertions = false;
        if with_git {
            fs::create_dir_all(root.join(VCS_MARKER_DIR)).expect("failed to create .git");
        } else {
            skip_assertions = find_project_root(&root)
                .expect("failed to inspect temp dir ancestors")
                .is_some();
        }
        Self {
            _temp: temp,
            root,
            skip_assertions,
        }
    }

    /// Absolute path of `relative` inside the project.
    pub fn path(&self, relative: &str) -> Utf8PathBuf {
        if relative.is_empty() {
            self.root.clone()
        } else {
            self.root.join(relative)
        }
    }

    /// Write `manifest.yml` into `dir`, omitting `version` when `None`.
    pub fn write_manifest(&self, dir: &str, name: &str, package_type: &str, version: Option<&str>) {
        let package = self.path(dir);
        fs::create_dir_all(&package).expect("failed to create package dir");
        let mut content = format!("name: {name}\ntitle: {name}\ntype: {package_type}\n");
        if let Some(version) = version {
            content.push_str(&format!("version: \"{version}\"\n"));
        }
        fs::write(package.join(PACKAGE_MANIFEST_FILE), content).expect("failed to write manifest");
    }

    /// Write a file at `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, contents: &str) {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        fs::write(path, contents).expect("failed to write file");
    }
}

/// Map every regular file below `dir` (relative path) to its contents.
pub fn snapshot(dir: &Utf8Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    collect(dir, dir, &mut files);
    files
}

fn collect(base: &Utf8Path, dir: &Utf8Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in dir.read_dir_utf8().expect("failed to read dir") {
        let entry = entry.expect("failed to read entry");
        let path = entry.path();
        if path.is_dir() {
            collect(base, path, files);
        } else {
            let relative = path.strip_prefix(base).expect("entry below base");
            files.insert(
                relative.as_str().to_owned(),
                fs::read(path).expect("failed to read file"),
            );
        }
    }
}

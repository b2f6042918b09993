//! Packwright builder library.
//!
//! This crate locates integration packages on disk and builds them into the
//! project's conventional `build/integrations` directory. It is used by the
//! `packwright` CLI and can be driven programmatically with an explicit start
//! directory for testing.
//!
//! # Modules
//!
//! - [`build`] - Build orchestration and stage tracking
//! - [`dashboards`] - Kibana saved object encoding applied after the copy
//! - [`error`] - Error types carrying the failing operation and path
//! - [`files`] - Directory clearing and recursive copying
//! - [`kind`] - Supported package kinds
//! - [`locate`] - Upward discovery of package roots and build directories
//! - [`manifest`] - `manifest.yml` parsing and validation
//! - [`output`] - Progress narration helpers

pub mod build;
pub mod dashboards;
pub mod error;
pub mod files;
pub mod kind;
pub mod locate;
pub mod manifest;
pub mod output;

pub use build::{BuildConfig, BuildOutput, BuildStage, PackageBuilder, build_package};
pub use error::{BuildError, Result};
pub use kind::PackageKind;
pub use locate::{find_build_packages_directory, find_build_root, find_package_root};
pub use manifest::PackageManifest;

//! Package kinds understood by the builder.
//!
//! Only integration packages can be built today. The kind still travels as an
//! enum so that the manifest `type` literal and the build sub-directory stay
//! tied together in one place.

use std::fmt;

/// The kind of package a manifest describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PackageKind {
    /// An integration package (`type: integration`).
    #[default]
    Integration,
}

impl PackageKind {
    /// Value of the manifest `type` key identifying this kind.
    #[must_use]
    pub const fn manifest_type(self) -> &'static str {
        match self {
            Self::Integration => "integration",
        }
    }

    /// Directory under `build/` that collects built packages of this kind.
    #[must_use]
    pub const fn build_dir_name(self) -> &'static str {
        match self {
            Self::Integration => "integrations",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.manifest_type())
    }
}

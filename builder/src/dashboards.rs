//! Dashboard encoding for built packages.
//!
//! Kibana saved objects are authored with nested JSON structures for
//! readability, but Kibana expects several of their attributes as JSON encoded
//! strings. After a package has been copied into its destination, every saved
//! object under `kibana/<type>/` is rewritten with those attributes encoded.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::{Map, Value};

/// Dotted keys whose values Kibana expects as encoded JSON strings.
pub const FIELDS_TO_ENCODE: &[&str] = &[
    "attributes.kibanaSavedObjectMeta.searchSourceJSON",
    "attributes.layerListJSON",
    "attributes.mapStateJSON",
    "attributes.optionsJSON",
    "attributes.panelsJSON",
    "attributes.uiStateJSON",
    "attributes.visState",
];

/// Transformation applied in place to a freshly copied destination tree.
#[cfg_attr(test, mockall::automock)]
pub trait DashboardEncoder {
    /// Encode the dashboards found under `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if a saved object cannot be read, parsed,
    /// or written back.
    fn encode(&self, destination: &Utf8Path) -> Result<(), DashboardError>;
}

/// Errors arising from dashboard encoding.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The saved object search pattern is invalid.
    #[error("invalid saved object pattern")]
    Pattern(#[from] glob::PatternError),

    /// A saved object could not be read or written.
    #[error("I/O error at {path}")]
    Io {
        /// Saved object path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A saved object is not valid JSON, or could not be serialised.
    #[error("invalid saved object JSON (path: {path})")]
    Json {
        /// Saved object path.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A saved object is valid JSON but not an object.
    #[error("saved object is not a JSON object (path: {path})")]
    NotAnObject {
        /// Saved object path.
        path: Utf8PathBuf,
    },

    /// A test encoder was configured to fail.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub encoder failure: {message}")]
    Stub {
        /// Description of the simulated failure.
        message: String,
    },
}

/// Production encoder rewriting saved objects under `kibana/*/*`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SavedObjectEncoder;

impl DashboardEncoder for SavedObjectEncoder {
    fn encode(&self, destination: &Utf8Path) -> Result<(), DashboardError> {
        for path in saved_object_paths(destination)? {
            let content = std::fs::read(&path).map_err(|source| DashboardError::Io {
                path: path.clone(),
                source,
            })?;
            let Some(output) = encode_saved_object(&path, &content)? else {
                log::trace!("saved object {path} already encoded");
                continue;
            };
            log::debug!("encoded saved object {path}");
            std::fs::write(&path, output).map_err(|source| DashboardError::Io {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// List regular files matching `<destination>/kibana/*/*`, sorted.
///
/// Symlinks are never followed, so encoding only rewrites files that live
/// inside the destination.
fn saved_object_paths(destination: &Utf8Path) -> Result<Vec<Utf8PathBuf>, DashboardError> {
    let pattern = format!(
        "{}/kibana/*/*",
        glob::Pattern::escape(destination.as_str())
    );
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| DashboardError::Io {
            path: Utf8PathBuf::from(e.path().to_string_lossy().into_owned()),
            source: e.into_error(),
        })?;
        let Ok(path) = Utf8PathBuf::try_from(path) else {
            continue;
        };
        let metadata = std::fs::symlink_metadata(&path).map_err(|source| DashboardError::Io {
            path: path.clone(),
            source,
        })?;
        if metadata.file_type().is_file() {
            paths.push(path);
        } else if metadata.file_type().is_symlink() {
            log::debug!("skipping symlinked saved object {path}");
        }
    }
    paths.sort();
    Ok(paths)
}

/// Encode the configured attributes of one saved object.
///
/// Returns `None` when nothing needed encoding, otherwise the rewritten
/// document as pretty JSON with four-space indentation.
fn encode_saved_object(path: &Utf8Path, content: &[u8]) -> Result<Option<Vec<u8>>, DashboardError> {
    let json_error = |source| DashboardError::Json {
        path: path.to_owned(),
        source,
    };

    let mut saved_object: Value = serde_json::from_slice(content).map_err(json_error)?;
    let Some(root) = saved_object.as_object_mut() else {
        return Err(DashboardError::NotAnObject {
            path: path.to_owned(),
        });
    };

    let mut changed = false;
    for key in FIELDS_TO_ENCODE {
        let Some(value) = lookup_mut(root, key) else {
            continue;
        };
        if value.is_string() {
            continue;
        }
        let encoded = serde_json::to_string(value).map_err(json_error)?;
        *value = Value::String(encoded);
        changed = true;
    }

    if !changed {
        return Ok(None);
    }

    let mut output = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
    saved_object.serialize(&mut serializer).map_err(json_error)?;
    Ok(Some(output))
}

fn lookup_mut<'a>(root: &'a mut Map<String, Value>, dotted_key: &str) -> Option<&'a mut Value> {
    let mut segments = dotted_key.split('.');
    let first = segments.next()?;
    let mut current = root.get_mut(first)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

#[cfg(any(test, feature = "test-support"))]
pub use recording::RecordingEncoder;

#[cfg(any(test, feature = "test-support"))]
mod recording {
    use super::{DashboardEncoder, DashboardError};
    use camino::{Utf8Path, Utf8PathBuf};
    use std::cell::RefCell;

    /// Encoder that records the destinations it receives.
    ///
    /// Used by behaviour tests to observe the orchestrator without touching
    /// saved objects, and to simulate encoder failures.
    #[derive(Debug, Default)]
    pub struct RecordingEncoder {
        calls: RefCell<Vec<Utf8PathBuf>>,
        failure: Option<String>,
    }

    impl RecordingEncoder {
        /// Create an encoder that fails every call with `message`.
        #[must_use]
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                calls: RefCell::default(),
                failure: Some(message.into()),
            }
        }

        /// Destinations passed to [`DashboardEncoder::encode`] so far.
        #[must_use]
        pub fn calls(&self) -> Vec<Utf8PathBuf> {
            self.calls.borrow().clone()
        }
    }

    impl DashboardEncoder for RecordingEncoder {
        fn encode(&self, destination: &Utf8Path) -> Result<(), DashboardError> {
            self.calls.borrow_mut().push(destination.to_owned());
            match &self.failure {
                Some(message) => Err(DashboardError::Stub {
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }
}

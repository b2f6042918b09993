//! Package manifest reading and validation.
//!
//! Every package root carries a `manifest.yml` describing the package name,
//! type, and version. The manifest is read fresh on every call; nothing here
//! caches parsed values between discovery and build.

use crate::error::{BuildError, Result};
use crate::kind::PackageKind;
use camino::Utf8Path;
use serde::{Deserialize, Deserializer};

/// File name of the manifest at the top of a package root.
pub const PACKAGE_MANIFEST_FILE: &str = "manifest.yml";

/// Identity of a package as declared by its `manifest.yml`.
///
/// Unknown keys are ignored and missing keys read as empty strings. Scalar
/// values that YAML resolves to numbers or booleans (for example
/// `version: 1.2`) are kept as their textual form.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct PackageManifest {
    /// Package name, used as a path segment of the destination.
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    /// Declared package type, e.g. `integration`.
    #[serde(rename = "type", deserialize_with = "scalar_string")]
    pub package_type: String,
    /// Package version, used as a path segment of the destination.
    #[serde(deserialize_with = "scalar_string")]
    pub version: String,
}

impl PackageManifest {
    /// Parse a manifest from YAML text.
    ///
    /// An empty document yields an empty manifest.
    ///
    /// # Errors
    ///
    /// Returns the YAML error when the document is malformed or is not a
    /// mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use packwright_builder::manifest::PackageManifest;
    ///
    /// let manifest = PackageManifest::from_yaml_str(
    ///     "name: foo\ntype: integration\nversion: 1.2.0\n",
    /// )
    /// .expect("valid manifest");
    /// assert_eq!(manifest.name, "foo");
    /// assert_eq!(manifest.version, "1.2.0");
    /// ```
    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Read and parse the manifest file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::ManifestRead`] if the file cannot be read and
    /// [`BuildError::ManifestParse`] if its contents are not a valid manifest.
    pub fn read(path: &Utf8Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| BuildError::ManifestRead {
            path: path.to_owned(),
            source,
        })?;
        Self::from_yaml_str(&content).map_err(|source| BuildError::ManifestParse {
            path: path.to_owned(),
            source,
        })
    }

    /// Read the manifest found directly inside `package_root`.
    ///
    /// # Errors
    ///
    /// See [`Self::read`].
    pub fn read_from_root(package_root: &Utf8Path) -> Result<Self> {
        Self::read(&package_root.join(PACKAGE_MANIFEST_FILE))
    }

    /// Whether this manifest describes a buildable package of `kind`.
    ///
    /// A manifest is buildable when its type matches the kind and it declares
    /// a non-empty version.
    #[must_use]
    pub fn is_buildable(&self, kind: PackageKind) -> bool {
        self.package_type == kind.manifest_type() && !self.version.is_empty()
    }
}

fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_yaml::Value;

    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar value, found {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn parses_recognised_keys_and_ignores_others() {
        let manifest = PackageManifest::from_yaml_str(concat!(
            "format_version: 1.0.0\n",
            "name: nginx\n",
            "title: Nginx\n",
            "type: integration\n",
            "version: 0.3.1\n",
            "owner:\n",
            "  github: elastic/integrations\n",
        ))
        .expect("valid manifest");

        assert_eq!(manifest.name, "nginx");
        assert_eq!(manifest.package_type, "integration");
        assert_eq!(manifest.version, "0.3.1");
    }

    #[test]
    fn missing_keys_read_as_empty() {
        let manifest = PackageManifest::from_yaml_str("name: foo\n").expect("valid manifest");
        assert_eq!(manifest.name, "foo");
        assert!(manifest.package_type.is_empty());
        assert!(manifest.version.is_empty());
    }

    #[test]
    fn empty_document_is_an_empty_manifest() {
        let manifest = PackageManifest::from_yaml_str("  \n").expect("empty manifest");
        assert_eq!(manifest, PackageManifest::default());
    }

    #[rstest]
    #[case::float("version: 1.2", "1.2")]
    #[case::integer("version: 2", "2")]
    #[case::null("version: ~", "")]
    fn numeric_scalars_keep_textual_form(#[case] yaml: &str, #[case] expected: &str) {
        let manifest = PackageManifest::from_yaml_str(yaml).expect("valid manifest");
        assert_eq!(manifest.version, expected);
    }

    #[rstest]
    #[case::not_a_mapping("- name\n- type\n")]
    #[case::nested_version("version:\n  major: 1\n")]
    #[case::broken_syntax("name: [unterminated\n")]
    fn rejects_malformed_documents(#[case] yaml: &str) {
        assert!(PackageManifest::from_yaml_str(yaml).is_err());
    }

    #[rstest]
    #[case::integration("integration", "1.0.0", true)]
    #[case::missing_version("integration", "", false)]
    #[case::other_type("dashboard", "1.0.0", false)]
    #[case::empty_type("", "1.0.0", false)]
    fn buildable_requires_integration_type_and_version(
        #[case] package_type: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        let manifest = PackageManifest {
            name: "foo".to_owned(),
            package_type: package_type.to_owned(),
            version: version.to_owned(),
        };
        assert_eq!(manifest.is_buildable(PackageKind::Integration), expected);
    }

    #[test]
    fn read_reports_path_of_unparseable_manifest() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("UTF-8 temp path");
        std::fs::write(root.join(PACKAGE_MANIFEST_FILE), "name: [oops\n").expect("write");

        let err = PackageManifest::read_from_root(&root).expect_err("parse should fail");
        assert!(matches!(err, BuildError::ManifestParse { ref path, .. } if path.ends_with(PACKAGE_MANIFEST_FILE)));
    }

    #[test]
    fn read_reports_missing_manifest() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::try_from(temp.path().to_owned()).expect("UTF-8 temp path");

        let err = PackageManifest::read_from_root(&root).expect_err("read should fail");
        assert!(matches!(err, BuildError::ManifestRead { .. }));
    }
}

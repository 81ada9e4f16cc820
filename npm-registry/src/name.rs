use std::borrow::Cow;
use std::fmt;

use crate::error::{NpmError, Result};

/// Dist-tag used when no version is requested.
pub const LATEST: &str = "latest";

/// Percent-encode a package name for use as a single URL path segment or
/// query value.
///
/// Scoped names contain `@` and `/`; both must reach the upstream service as
/// literal name content rather than as path separators.
pub fn encode_package_name(name: &str) -> Cow<'_, str> {
    urlencoding::encode(name)
}

/// Trimmed package name, or an error when nothing is left.
pub(crate) fn require_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        Err(NpmError::invalid_argument("package name must not be empty"))
    } else {
        Ok(name)
    }
}

/// A package name plus an optional version or dist-tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentifier {
    pub name: String,
    pub version: Option<String>,
}

impl PackageIdentifier {
    pub fn new(name: impl Into<String>, version: Option<String>) -> Result<Self> {
        let name = name.into();
        let version = version
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty());
        Ok(Self {
            name: require_name(&name)?.to_owned(),
            version,
        })
    }

    /// Parse `name`, `name@version`, `@scope/name` or `@scope/name@version`.
    pub fn parse(spec: &str) -> Result<Self> {
        let spec = spec.trim();
        let (scope_marker, rest) = match spec.strip_prefix('@') {
            Some(rest) => ("@", rest),
            None => ("", spec),
        };
        match rest.split_once('@') {
            Some((name, version)) => {
                Self::new(format!("{scope_marker}{name}"), Some(version.to_owned()))
            }
            None => Self::new(spec, None),
        }
    }

    /// The requested version, or `latest` when none was given.
    pub fn version_or_latest(&self) -> &str {
        self.version.as_deref().unwrap_or(LATEST)
    }

    pub fn encoded_name(&self) -> Cow<'_, str> {
        encode_package_name(&self.name)
    }
}

impl fmt::Display for PackageIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.name, version),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_name_has_no_raw_slash_after_encoding() {
        let encoded = encode_package_name("@types/node");
        assert_eq!(encoded, "%40types%2Fnode");
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn encoding_round_trips() {
        for name in ["react", "@types/node", "lodash.merge", "@babel/core", "a_b-c~d"] {
            let encoded = encode_package_name(name);
            let decoded = urlencoding::decode(&encoded).unwrap();
            assert_eq!(decoded, name);
        }
    }

    #[test]
    fn parse_splits_version_after_scope() {
        let id = PackageIdentifier::parse("@scope/pkg@2.1.0").unwrap();
        assert_eq!(id.name, "@scope/pkg");
        assert_eq!(id.version.as_deref(), Some("2.1.0"));
        assert_eq!(id.encoded_name(), "%40scope%2Fpkg");

        let id = PackageIdentifier::parse("@scope/pkg").unwrap();
        assert_eq!(id.name, "@scope/pkg");
        assert_eq!(id.version_or_latest(), "latest");

        let id = PackageIdentifier::parse("express@next").unwrap();
        assert_eq!(id.to_string(), "express@next");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            PackageIdentifier::new("  ", None),
            Err(NpmError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn blank_version_means_latest() {
        let id = PackageIdentifier::new("react", Some(" ".to_owned())).unwrap();
        assert_eq!(id.version, None);
    }
}

//! Integration manifest (`manifest.json`).

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::platform::TargetOs;

/// Parsed integration manifest.
///
/// Only `supported_os` drives the build. Everything else is kept untyped, so
/// unexpected metadata never fails a run.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// OS identifiers the integration runs on. A manifest without this field
    /// is rejected by [`Manifest::load`]. Non-string entries match nothing.
    #[serde(default)]
    supported_os: Option<Vec<Value>>,
    /// Remaining metadata, not interpreted here.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Manifest {
    /// Read and validate a manifest file.
    ///
    /// A file that is not valid JSON, or that lacks `supported_os`, means the
    /// source tree is broken and is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_json::from_str(content)?;
        if manifest.supported_os.is_none() {
            bail!("missing required field 'supported_os'");
        }
        Ok(manifest)
    }

    /// String entries of `supported_os`.
    pub fn supported_os(&self) -> impl Iterator<Item = &str> {
        self.supported_os
            .iter()
            .flatten()
            .filter_map(Value::as_str)
    }

    pub fn supports(&self, os: TargetOs) -> bool {
        self.supported_os().any(|s| s == os.id())
    }

    pub fn display_name(&self) -> Option<&str> {
        self.text("display_name")
    }

    pub fn version(&self) -> Option<&str> {
        self.text("version")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_supported_os() {
        let manifest = Manifest::parse(
            r#"{"name": "redisdb", "version": "1.0.0", "supported_os": ["linux", "mac_os"], "guid": "abc"}"#,
        )
        .unwrap();

        assert!(manifest.supports(TargetOs::Linux));
        assert!(manifest.supports(TargetOs::MacOs));
        assert!(!manifest.supports(TargetOs::Windows));
        assert_eq!(manifest.version(), Some("1.0.0"));
        assert!(manifest.extra.contains_key("guid"));
    }

    #[test]
    fn test_missing_supported_os_is_error() {
        let err = Manifest::parse(r#"{"name": "redisdb"}"#).unwrap_err();
        assert!(err.to_string().contains("supported_os"));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Manifest::parse("{\"supported_os\": [\"linux\"").is_err());
        assert!(Manifest::parse("").is_err());
    }

    #[test]
    fn test_wrong_type_is_error() {
        assert!(Manifest::parse(r#"{"supported_os": "linux"}"#).is_err());
    }

    #[test]
    fn test_untyped_metadata_is_tolerated() {
        let manifest = Manifest::parse(
            r#"{"supported_os": ["linux", 7, null], "version": 1, "display_name": {"en": "Redis"}}"#,
        )
        .unwrap();

        assert!(manifest.supports(TargetOs::Linux));
        assert!(!manifest.supports(TargetOs::Windows));
        assert_eq!(manifest.supported_os().collect::<Vec<_>>(), vec!["linux"]);
        assert_eq!(manifest.version(), None);
        assert_eq!(manifest.display_name(), None);
    }

    #[test]
    fn test_empty_supported_os_supports_nothing() {
        let manifest = Manifest::parse(r#"{"supported_os": []}"#).unwrap();
        for os in TargetOs::ALL {
            assert!(!manifest.supports(os));
        }
    }
}

//! Baseline requirements shared by every integration.
//!
//! The list is fixed: it is installed into the target runtime before any
//! integration is processed and never picks up an integration's own
//! dependencies. Those are resolved privately when each wheel is installed.

use anyhow::{bail, Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File name of the requirements artifact, both staged and installed.
pub const REQUIREMENTS_FILENAME: &str = "check_requirements.txt";

/// Core dependencies that are not declared by any single check.
pub const DEFAULT_BASELINE: &[(&str, &str)] = &[
    ("requests", "2.11.1"),
    ("pympler", "0.5"),
    ("wheel", "0.30.0"),
];

/// One pinned dependency, `name==version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub version: String,
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.name, self.version)
    }
}

impl FromStr for Requirement {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some((name, version)) = s.split_once("==") else {
            bail!("Requirement '{}' must be pinned as name==version", s);
        };
        let (name, version) = (name.trim(), version.trim());
        if name.is_empty() || version.is_empty() || version.contains("==") {
            bail!("Requirement '{}' must be pinned as name==version", s);
        }
        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

/// Ordered, candidate-independent dependency list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaselineRequirements {
    entries: Vec<Requirement>,
}

impl BaselineRequirements {
    pub fn new(entries: Vec<Requirement>) -> Self {
        Self { entries }
    }

    /// Parse a list of `name==version` specifications, keeping their order.
    pub fn parse<I, S>(specs: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = specs
            .into_iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<Requirement>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[Requirement] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Requirements file content, one specification per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for req in &self.entries {
            out.push_str(&req.to_string());
            out.push('\n');
        }
        out
    }

    /// Write the staging file into `dir`, replacing any previous one.
    pub fn write_staging_file(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(REQUIREMENTS_FILENAME);
        fs::write(&path, self.render())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

impl Default for BaselineRequirements {
    fn default() -> Self {
        Self::new(
            DEFAULT_BASELINE
                .iter()
                .map(|(name, version)| Requirement {
                    name: name.to_string(),
                    version: version.to_string(),
                })
                .collect(),
        )
    }
}

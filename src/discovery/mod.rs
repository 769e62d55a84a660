//! Integration discovery.
//!
//! Scans the integrations root one level deep and decides which directories
//! take part in the build. Read-only: nothing here touches the install tree.
//!
//! Per directory, in order:
//! 1. not a directory → skip
//! 2. name in the exclusion set → skip (manifest is not read)
//! 3. no `manifest.json` → skip
//! 4. unreadable manifest or no `supported_os` → error, whole build stops
//! 5. target OS not in `supported_os` → skip

pub mod candidate;
pub mod manifest;

pub use candidate::Candidate;
pub use manifest::Manifest;

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::platform::TargetOs;

/// Directories that are never treated as integrations.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "datadog-base", // namespace package for the wheels, not an integration
    "agent_metrics",
    "docker_daemon",
    "kubernetes",
    "ntp", // shipped as a core agent check
    "sqlserver",
];

/// Identifiers skipped by the per-integration loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    ids: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// The built-in exclusion list.
    pub fn defaults() -> Self {
        Self::new(DEFAULT_EXCLUSIONS.iter().copied())
    }

    pub fn insert(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Why a directory under the root is not built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotADirectory,
    Excluded,
    NoManifest,
    UnsupportedOs,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SkipReason::NotADirectory => "not a directory",
            SkipReason::Excluded => "excluded",
            SkipReason::NoManifest => "no manifest",
            SkipReason::UnsupportedOs => "unsupported OS",
        };
        f.write_str(s)
    }
}

/// A root entry that did not become a candidate.
#[derive(Debug, Clone)]
pub struct Skipped {
    pub id: String,
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Result of scanning the integrations root.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Eligible integrations, in directory traversal order.
    pub candidates: Vec<Candidate>,
    pub skipped: Vec<Skipped>,
}

impl Discovery {
    pub fn skipped_ids(&self, reason: SkipReason) -> Vec<&str> {
        self.skipped
            .iter()
            .filter(|s| s.reason == reason)
            .map(|s| s.id.as_str())
            .collect()
    }
}

/// Scan `root` for integrations eligible on `target`.
///
/// No ordering is imposed beyond what the filesystem returns.
pub fn discover(root: &Path, exclusions: &ExclusionSet, target: TargetOs) -> Result<Discovery> {
    let mut discovery = Discovery::default();

    let entries = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        let path = entry.path();
        let id = entry.file_name().to_string_lossy().into_owned();

        let skip = |reason| Skipped {
            id: id.clone(),
            path: path.to_path_buf(),
            reason,
        };

        // symlinked integrations count, dangling links don't
        let is_dir = entry.file_type().is_dir() || (entry.path_is_symlink() && path.is_dir());
        if !is_dir {
            discovery.skipped.push(skip(SkipReason::NotADirectory));
            continue;
        }
        if exclusions.contains(&id) {
            discovery.skipped.push(skip(SkipReason::Excluded));
            continue;
        }

        let candidate = Candidate::probe(path)?;
        let ineligible = match &candidate.manifest {
            None => Some(SkipReason::NoManifest),
            Some(manifest) if !manifest.supports(target) => Some(SkipReason::UnsupportedOs),
            Some(_) => None,
        };
        match ineligible {
            Some(reason) => discovery.skipped.push(skip(reason)),
            None => discovery.candidates.push(candidate),
        }
    }

    Ok(discovery)
}

/// Dot-entries below the root, such as `.github`. The root itself may be hidden.
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

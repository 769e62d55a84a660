//! A single integration directory, probed once.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::manifest::Manifest;

pub const MANIFEST_FILENAME: &str = "manifest.json";
pub const CONF_TEMPLATE_FILENAME: &str = "conf.yaml.example";
pub const AUTO_CONF_FILENAME: &str = "auto_conf.yaml";
pub const BUILD_DESCRIPTOR_FILENAME: &str = "setup.py";

/// Everything the pipeline needs to know about one integration directory.
///
/// Filled in by [`Candidate::probe`]; later stages match on the optional
/// fields and never look at the filesystem again to decide what to do.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Directory name, e.g. `redisdb`.
    pub id: String,
    pub dir: PathBuf,
    pub manifest: Option<Manifest>,
    pub conf_template: Option<PathBuf>,
    pub auto_conf_template: Option<PathBuf>,
    pub build_descriptor: Option<PathBuf>,
}

impl Candidate {
    /// Probe an integration directory.
    ///
    /// An absent manifest yields `manifest: None`. A manifest that exists but
    /// can't be parsed is an error.
    pub fn probe(dir: &Path) -> Result<Self> {
        let id = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let manifest = match existing_file(dir, MANIFEST_FILENAME) {
            Some(path) => Some(Manifest::load(&path)?),
            None => None,
        };

        Ok(Self {
            id,
            dir: dir.to_path_buf(),
            manifest,
            conf_template: existing_file(dir, CONF_TEMPLATE_FILENAME),
            auto_conf_template: existing_file(dir, AUTO_CONF_FILENAME),
            build_descriptor: existing_file(dir, BUILD_DESCRIPTOR_FILENAME),
        })
    }

    pub fn is_buildable(&self) -> bool {
        self.build_descriptor.is_some()
    }

    /// Name shown in progress output.
    pub fn display_name(&self) -> &str {
        self.manifest
            .as_ref()
            .and_then(|m| m.display_name())
            .unwrap_or(&self.id)
    }
}

fn existing_file(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(name);
    path.is_file().then_some(path)
}

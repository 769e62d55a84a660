//! Install tree layout.
//!
//! ```text
//! <install_root>/
//!   agent/
//!     checks.d/
//!     check_requirements.txt
//!   etc/<product>/conf.d/
//!     <integration>.d/
//!   embedded/            (target runtime, provided by the caller)
//! ```

use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::requirements::REQUIREMENTS_FILENAME;

/// Default product name used under `etc/`.
pub const DEFAULT_PRODUCT: &str = "datadog-agent";

/// Paths of the install tree this pipeline writes into.
#[derive(Debug, Clone)]
pub struct InstallLayout {
    pub root: PathBuf,
    pub checks_dir: PathBuf,
    pub conf_dir: PathBuf,
    pub requirements_file: PathBuf,
}

impl InstallLayout {
    pub fn new(root: &Path, product: &str) -> Self {
        let agent = root.join("agent");
        Self {
            root: root.to_path_buf(),
            checks_dir: agent.join("checks.d"),
            conf_dir: root.join("etc").join(product).join("conf.d"),
            requirements_file: agent.join(REQUIREMENTS_FILENAME),
        }
    }

    /// Configuration directory for one integration, `<conf_dir>/<id>.d`.
    pub fn integration_conf_dir(&self, id: &str) -> PathBuf {
        self.conf_dir.join(format!("{}.d", id))
    }

    /// Create the checks and configuration directories.
    pub fn create(&self) -> Result<()> {
        for dir in [&self.checks_dir, &self.conf_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Move the staged requirements file into the install tree.
    ///
    /// The staging file is consumed.
    pub fn place_requirements(&self, staged: &Path) -> Result<()> {
        if let Some(parent) = self.requirements_file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        move_file(staged, &self.requirements_file).with_context(|| {
            format!(
                "Failed to move {} to {}",
                staged.display(),
                self.requirements_file.display()
            )
        })
    }

    /// Remove everything `create` and the pipeline put under the root.
    ///
    /// Returns true if anything was removed.
    pub fn clean(&self) -> Result<bool> {
        let mut cleaned = false;

        for dir in [&self.checks_dir, &self.conf_dir] {
            if dir.exists() {
                println!("Removing {}...", dir.display());
                fs::remove_dir_all(dir)
                    .with_context(|| format!("Failed to remove {}", dir.display()))?;
                cleaned = true;
            }
        }

        if self.requirements_file.exists() {
            println!("Removing {}...", self.requirements_file.display());
            fs::remove_file(&self.requirements_file)?;
            cleaned = true;
        }

        Ok(cleaned)
    }
}

/// Rename, or copy and delete when source and destination are on
/// different filesystems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(e),
        Err(_) => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

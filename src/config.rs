//! Configuration for integrations-builder.
//!
//! Values come from environment variables, which `main` first seeds from a
//! `.env` file via dotenvy. Command-line flags override both.
//!
//! | Variable | Default |
//! |---|---|
//! | `INTEGRATIONS_DIR` | `integrations-core` |
//! | `INSTALL_DIR` | `output/install` |
//! | `TARGET_OS` | host OS |
//! | `PRODUCT_NAME` | `datadog-agent` |
//! | `BASE_PACKAGE` | `datadog-base` |
//! | `EXCLUDED_CHECKS` | built-in list, comma separated |
//! | `BASELINE_REQUIREMENTS` | built-in list, comma separated |

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::discovery::ExclusionSet;
use crate::layout::{InstallLayout, DEFAULT_PRODUCT};
use crate::pipeline::{Pipeline, DEFAULT_BASE_PACKAGE};
use crate::platform::TargetOs;
use crate::requirements::BaselineRequirements;

pub const DEFAULT_INTEGRATIONS_DIR: &str = "integrations-core";
pub const DEFAULT_INSTALL_DIR: &str = "output/install";

/// Effective build settings.
#[derive(Debug, Clone)]
pub struct Config {
    /// Checkout containing one directory per integration.
    pub integrations_dir: PathBuf,
    /// Root of the install tree; the target runtime lives in `embedded/`.
    pub install_dir: PathBuf,
    pub target_os: TargetOs,
    pub product: String,
    pub base_package: String,
    pub exclusions: ExclusionSet,
    pub baseline: BaselineRequirements,
}

impl Config {
    /// Load from the process environment. Relative paths resolve against
    /// `base_dir`.
    pub fn load(base_dir: &Path) -> Result<Self> {
        Self::from_lookup(base_dir, |key| std::env::var(key).ok())
    }

    /// Load using `lookup` to read variables.
    pub fn from_lookup<F>(base_dir: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let integrations_dir = resolve(
            base_dir,
            &get("INTEGRATIONS_DIR").unwrap_or_else(|| DEFAULT_INTEGRATIONS_DIR.to_string()),
        );
        let install_dir = resolve(
            base_dir,
            &get("INSTALL_DIR").unwrap_or_else(|| DEFAULT_INSTALL_DIR.to_string()),
        );

        let target_os = match get("TARGET_OS") {
            Some(os) => os.parse().context("Invalid TARGET_OS")?,
            None => TargetOs::host(),
        };

        let product = get("PRODUCT_NAME").unwrap_or_else(|| DEFAULT_PRODUCT.to_string());
        let base_package =
            get("BASE_PACKAGE").unwrap_or_else(|| DEFAULT_BASE_PACKAGE.to_string());

        let exclusions = match get("EXCLUDED_CHECKS") {
            Some(list) => ExclusionSet::new(split_list(&list)),
            None => ExclusionSet::defaults(),
        };

        let baseline = match get("BASELINE_REQUIREMENTS") {
            Some(list) => BaselineRequirements::parse(split_list(&list))
                .context("Invalid BASELINE_REQUIREMENTS")?,
            None => BaselineRequirements::default(),
        };

        Ok(Self {
            integrations_dir,
            install_dir,
            target_os,
            product,
            base_package,
            exclusions,
            baseline,
        })
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(&self.install_dir, &self.product)
    }

    /// Explicit pipeline inputs for a run.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline {
            source_root: self.integrations_dir.clone(),
            layout: self.layout(),
            target: self.target_os,
            exclusions: self.exclusions.clone(),
            baseline: self.baseline.clone(),
            base_package: self.base_package.clone(),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  INTEGRATIONS_DIR: {}", self.integrations_dir.display());
        println!("  INSTALL_DIR: {}", self.install_dir.display());
        println!("  TARGET_OS: {}", self.target_os);
        println!("  PRODUCT_NAME: {}", self.product);
        println!("  BASE_PACKAGE: {}", self.base_package);
        println!(
            "  EXCLUDED_CHECKS: {}",
            self.exclusions.iter().collect::<Vec<_>>().join(",")
        );
        println!(
            "  BASELINE_REQUIREMENTS: {}",
            self.baseline
                .entries()
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(",")
        );
        if self.integrations_dir.is_dir() {
            println!("  Integrations: FOUND");
        } else {
            println!("  Integrations: NOT FOUND (check out integrations-core first)");
        }
    }
}

fn resolve(base_dir: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

//! The assembly pipeline.
//!
//! Strictly sequential:
//!
//! ```text
//! discover integrations (read-only)
//!   → create layout
//!   → write + install baseline requirements
//!   → move requirements file into agent/
//!   → build + install the base package (once)
//!   → for each eligible integration: stage config, then build + install
//! ```
//!
//! The first error stops the run. Whatever was written up to that point
//! stays in place.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::backend::BuildBackend;
use crate::discovery::{
    self, candidate::BUILD_DESCRIPTOR_FILENAME, Discovery, ExclusionSet, SkipReason, Skipped,
};
use crate::layout::InstallLayout;
use crate::platform::TargetOs;
use crate::requirements::BaselineRequirements;
use crate::stage;
use crate::timing::Timer;

/// Default namespace package built before every integration.
pub const DEFAULT_BASE_PACKAGE: &str = "datadog-base";

/// Inputs of one pipeline run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Directory holding one subdirectory per integration.
    pub source_root: PathBuf,
    pub layout: InstallLayout,
    pub target: TargetOs,
    pub exclusions: ExclusionSet,
    pub baseline: BaselineRequirements,
    /// Namespace package built once before the integration loop.
    pub base_package: String,
}

/// An integration that was built and installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built {
    pub id: String,
    pub wheels: Vec<String>,
}

/// An integration whose config templates were staged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Staged {
    pub id: String,
    pub files: Vec<PathBuf>,
}

/// What a run did.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub base_wheels: Vec<String>,
    pub staged: Vec<Staged>,
    pub built: Vec<Built>,
    pub skipped: Vec<Skipped>,
}

impl BuildReport {
    pub fn built_ids(&self) -> Vec<&str> {
        self.built.iter().map(|b| b.id.as_str()).collect()
    }

    pub fn staged_ids(&self) -> Vec<&str> {
        self.staged.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn print_summary(&self) {
        println!("\n=== Summary ===");
        println!("  Built:   {}", self.built.len());
        println!("  Configs: {}", self.staged.len());
        println!("  Skipped: {}", self.skipped.len());
    }
}

impl Pipeline {
    /// Exclusions actually applied: the configured set plus the base package,
    /// which is always built separately.
    pub fn effective_exclusions(&self) -> ExclusionSet {
        let mut set = self.exclusions.clone();
        set.insert(self.base_package.clone());
        set
    }

    pub fn base_package_dir(&self) -> PathBuf {
        self.source_root.join(&self.base_package)
    }

    /// Scan the source root. Read-only.
    pub fn discover(&self) -> Result<Discovery> {
        discovery::discover(&self.source_root, &self.effective_exclusions(), self.target)
    }

    /// Run every step against `backend`.
    ///
    /// Discovery runs before anything is written, so a broken manifest stops
    /// the run with the install tree untouched.
    pub fn run(&self, backend: &dyn BuildBackend) -> Result<BuildReport> {
        println!("=== Assembling integrations ({}) ===\n", self.target);
        println!("  Source:  {}", self.source_root.display());
        println!("  Install: {}", self.layout.root.display());
        println!("  Backend: {}\n", backend.name());

        let discovery = self.discover()?;
        for skipped in &discovery.skipped {
            if skipped.reason != SkipReason::NotADirectory {
                println!("  [SKIP] {} ({})", skipped.id, skipped.reason);
            }
        }

        let mut report = BuildReport {
            skipped: discovery.skipped,
            ..Default::default()
        };

        self.layout.create()?;

        self.install_baseline(backend)?;

        println!("\nBuilding base package {}...", self.base_package);
        let t = Timer::start(format!("Base package {}", self.base_package));
        report.base_wheels = self.build_base_package(backend)?;
        t.finish();

        println!(
            "\nProcessing {} integration(s)...",
            discovery.candidates.len()
        );
        for candidate in &discovery.candidates {
            let files = stage::stage_config(candidate, &self.layout, self.target)
                .with_context(|| format!("Staging config for {}", candidate.id))?;
            if !files.is_empty() {
                println!("  {}: staged {} config file(s)", candidate.id, files.len());
                report.staged.push(Staged {
                    id: candidate.id.clone(),
                    files,
                });
            }

            if candidate.build_descriptor.is_none() {
                continue;
            }

            println!("\nBuilding {}...", candidate.display_name());
            let t = Timer::start(candidate.id.as_str());
            let wheels = backend.build_and_install(&candidate.dir)?;
            t.finish();
            report.built.push(Built {
                id: candidate.id.clone(),
                wheels,
            });
        }

        Ok(report)
    }

    /// Write, install and relocate the baseline requirements file.
    fn install_baseline(&self, backend: &dyn BuildBackend) -> Result<()> {
        println!(
            "Installing {} baseline requirement(s)...",
            self.baseline.len()
        );
        let t = Timer::start("Baseline requirements");
        let staged = self.baseline.write_staging_file(&self.source_root)?;
        backend.install_requirements(&staged)?;
        self.layout.place_requirements(&staged)?;
        t.finish();
        Ok(())
    }

    fn build_base_package(&self, backend: &dyn BuildBackend) -> Result<Vec<String>> {
        let dir = self.base_package_dir();
        if !dir.join(BUILD_DESCRIPTOR_FILENAME).is_file() {
            bail!(
                "Base package '{}' not found: {} has no {}",
                self.base_package,
                dir.display(),
                BUILD_DESCRIPTOR_FILENAME
            );
        }
        backend.build_and_install(&dir)
    }
}

//! Package build backends.
//!
//! A backend knows how to drive the target runtime's package manager: install
//! the baseline requirements file, and build + install one package directory
//! as a wheel without resolving its dependencies at build time.
//!
//! One implementation per platform, picked once per run by [`for_target`]:
//! - [`PosixBackend`]: `embedded/bin/pip` with `PATH` and `LD_RUN_PATH`
//!   pointing into the runtime
//! - [`WindowsBackend`]: `embedded\scripts\pip.exe` with Windows paths

mod posix;
mod windows;

pub use posix::PosixBackend;
pub use windows::WindowsBackend;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::platform::TargetOs;

/// Arguments that build a wheel for the package in the working directory.
pub const WHEEL_ARGS: [&str; 3] = ["wheel", "--no-deps", "."];

/// Drives the package manager of the target runtime.
///
/// Every method blocks until its subprocesses exit. A non-zero exit is an
/// error; there are no retries.
pub trait BuildBackend {
    /// Name for progress output.
    fn name(&self) -> &str;

    /// Package-manager executable inside the target runtime.
    fn package_manager(&self) -> PathBuf;

    /// Install every entry of a requirements file.
    fn install_requirements(&self, requirements: &Path) -> Result<()>;

    /// Build the package in `package_dir` and install the result.
    ///
    /// Returns the file names of the installed wheels.
    fn build_and_install(&self, package_dir: &Path) -> Result<Vec<String>>;
}

/// Select the backend for a target OS.
pub fn for_target(target: TargetOs, install_dir: &Path) -> Box<dyn BuildBackend> {
    if target.is_windows() {
        Box::new(WindowsBackend::new(install_dir))
    } else {
        Box::new(PosixBackend::new(install_dir))
    }
}

/// Wheel files directly inside `dir`, sorted by name.
///
/// Wheels left over from an earlier build are included, matching what a
/// `*.whl` glob in that directory would pick up.
pub fn find_wheels(dir: &Path) -> Result<Vec<String>> {
    let mut wheels = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file() && name.ends_with(".whl") {
            wheels.push(name.into_owned());
        }
    }
    wheels.sort();
    Ok(wheels)
}

/// Wheels produced by a build step, or an error if there are none.
fn built_wheels(package_dir: &Path) -> Result<Vec<String>> {
    let wheels = find_wheels(package_dir)?;
    if wheels.is_empty() {
        bail!(
            "Wheel build in {} produced no .whl file",
            package_dir.display()
        );
    }
    Ok(wheels)
}

fn package_label(package_dir: &Path) -> String {
    package_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| package_dir.display().to_string())
}

//! Preflight checks.
//!
//! Validates the integrations checkout and the target runtime before a
//! build touches the install tree. Run with `integrations-builder preflight`.

mod types;

use anyhow::{bail, Result};
use std::path::Path;

pub use types::{CheckResult, CheckStatus, PreflightReport};

use crate::backend::BuildBackend;
use crate::config::Config;
use crate::discovery::candidate::BUILD_DESCRIPTOR_FILENAME;
use crate::platform::TargetOs;

/// Run all preflight checks.
pub fn run_preflight(config: &Config, backend: &dyn BuildBackend) -> PreflightReport {
    let mut checks = Vec::new();

    println!("Running preflight checks...\n");

    checks.push(check_integrations_dir(&config.integrations_dir));
    checks.push(check_base_package(
        &config.integrations_dir,
        &config.base_package,
    ));
    checks.push(check_package_manager(config, backend));
    checks.push(check_target(config.target_os, TargetOs::host()));
    checks.push(check_install_dir(&config.install_dir));

    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(config: &Config, backend: &dyn BuildBackend) -> Result<()> {
    let report = run_preflight(config, backend);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before building.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}

fn check_integrations_dir(dir: &Path) -> CheckResult {
    let name = "integrations checkout";
    if dir.is_dir() {
        CheckResult::pass_with(name, &dir.display().to_string())
    } else {
        CheckResult::fail(
            name,
            &format!("{} is not a directory. Set INTEGRATIONS_DIR.", dir.display()),
        )
    }
}

fn check_base_package(root: &Path, base_package: &str) -> CheckResult {
    let name = "base package";
    let descriptor = root.join(base_package).join(BUILD_DESCRIPTOR_FILENAME);
    if descriptor.is_file() {
        CheckResult::pass_with(name, base_package)
    } else {
        CheckResult::fail(
            name,
            &format!("{} not found", descriptor.display()),
        )
    }
}

fn check_package_manager(config: &Config, backend: &dyn BuildBackend) -> CheckResult {
    let name = "package manager";
    let pip = backend.package_manager();

    if config.target_os.is_windows() {
        return if pip.is_file() {
            CheckResult::pass_with(name, &pip.display().to_string())
        } else {
            CheckResult::fail(name, &format!("{} not found", pip.display()))
        };
    }

    // Must resolve inside the embedded runtime, never from the host PATH.
    let bin_dir = pip.parent().unwrap_or(Path::new(".")).to_path_buf();
    let program = pip.file_name().unwrap_or_default();
    match which::which_in(program, Some(&bin_dir), &bin_dir) {
        Ok(found) => CheckResult::pass_with(name, &found.display().to_string()),
        Err(_) => CheckResult::fail(
            name,
            &format!(
                "No executable pip in {}. Provision the target runtime first.",
                bin_dir.display()
            ),
        ),
    }
}

fn check_target(target: TargetOs, host: TargetOs) -> CheckResult {
    let name = "target OS";
    if target == host {
        CheckResult::pass_with(name, target.id())
    } else {
        CheckResult::warn(
            name,
            &format!("building for {} on a {} host", target, host),
        )
    }
}

fn check_install_dir(dir: &Path) -> CheckResult {
    let name = "install dir";
    if dir.is_dir() {
        CheckResult::pass_with(name, &dir.display().to_string())
    } else if dir.exists() {
        CheckResult::fail(name, &format!("{} is not a directory", dir.display()))
    } else {
        CheckResult::warn(
            name,
            &format!("{} does not exist and will be created", dir.display()),
        )
    }
}

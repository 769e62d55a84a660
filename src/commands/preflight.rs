//! Preflight command - runs preflight checks.

use anyhow::Result;

use crate::backend;
use crate::config::Config;
use crate::preflight;

/// Execute the preflight command.
pub fn cmd_preflight(config: &Config, strict: bool) -> Result<()> {
    let backend = backend::for_target(config.target_os, &config.install_dir);
    if strict {
        preflight::run_preflight_or_fail(config, backend.as_ref())?;
    } else {
        let report = preflight::run_preflight(config, backend.as_ref());
        report.print();
        if !report.all_passed() {
            println!("Some checks failed. Use --strict to fail the build.");
        }
    }
    Ok(())
}

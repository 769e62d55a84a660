//! Build command - runs the assembly pipeline.

use anyhow::Result;
use std::time::Instant;

use crate::backend;
use crate::config::Config;
use crate::preflight;
use crate::timing::format_elapsed;

/// Execute the build command.
pub fn cmd_build(config: &Config) -> Result<()> {
    let build_start = Instant::now();
    let backend = backend::for_target(config.target_os, &config.install_dir);

    preflight::run_preflight_or_fail(config, backend.as_ref())?;

    let report = config.pipeline().run(backend.as_ref())?;
    report.print_summary();

    println!(
        "\nIntegrations assembled in {}.",
        format_elapsed(build_start.elapsed())
    );
    println!("  Requirements: {}", config.layout().requirements_file.display());
    println!("  Configs:      {}", config.layout().conf_dir.display());
    Ok(())
}

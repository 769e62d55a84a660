//! Show command - displays information.

use anyhow::Result;

use crate::config::Config;
use crate::discovery::{Discovery, SkipReason};

/// Show target for the show command.
pub enum ShowTarget {
    /// Show configuration
    Config,
    /// Show which integrations would be built
    Candidates,
}

/// Execute the show command.
pub fn cmd_show(target: ShowTarget, config: &Config) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Candidates => {
            let discovery = config.pipeline().discover()?;
            print_discovery(&discovery, config);
        }
    }
    Ok(())
}

fn print_discovery(discovery: &Discovery, config: &Config) {
    println!(
        "Integrations for {} in {}:\n",
        config.target_os,
        config.integrations_dir.display()
    );

    for c in &discovery.candidates {
        let mut parts = Vec::new();
        if c.conf_template.is_some() {
            parts.push("conf");
        }
        if c.auto_conf_template.is_some() && !config.target_os.is_windows() {
            parts.push("auto_conf");
        }
        if c.is_buildable() {
            parts.push("wheel");
        }
        let version = c
            .manifest
            .as_ref()
            .and_then(|m| m.version())
            .unwrap_or("-");
        println!("  {:<32} {:<10} {}", c.id, version, parts.join(" "));
    }

    let skipped: Vec<_> = discovery
        .skipped
        .iter()
        .filter(|s| s.reason != SkipReason::NotADirectory)
        .collect();
    if !skipped.is_empty() {
        println!();
        for s in skipped {
            println!("  [SKIP] {} ({})", s.id, s.reason);
        }
    }

    println!(
        "\n{} eligible, {} with a wheel to build; base package {} is built first.",
        discovery.candidates.len(),
        discovery.candidates.iter().filter(|c| c.is_buildable()).count(),
        config.base_package
    );
}

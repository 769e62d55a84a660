//! Clean command - removes pipeline outputs from the install tree.

use anyhow::Result;

use crate::config::Config;

/// Execute the clean command.
///
/// Only what the pipeline creates is removed; the embedded runtime is left
/// alone, so installed packages stay installed.
pub fn cmd_clean(config: &Config) -> Result<()> {
    if config.layout().clean()? {
        println!("Clean complete (embedded runtime preserved).");
    } else {
        println!("Nothing to clean.");
    }
    Ok(())
}

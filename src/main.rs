//! integrations-builder - assembles agent integrations into an install tree.
//!
//! Discovers integrations in an integrations-core checkout, installs the
//! baseline requirements and every eligible integration into the embedded
//! runtime, and stages their configuration templates.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use integrations_builder::{commands, Config, TargetOs};

#[derive(Parser)]
#[command(name = "integrations-builder")]
#[command(about = "Agent integrations assembler")]
#[command(
    after_help = "QUICK START:\n  integrations-builder preflight        Check inputs and runtime\n  integrations-builder show candidates  List what would be built\n  integrations-builder build            Assemble the install tree"
)]
struct Cli {
    /// Integrations checkout (overrides INTEGRATIONS_DIR)
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Install root containing embedded/ (overrides INSTALL_DIR)
    #[arg(long, global = true)]
    install_dir: Option<PathBuf>,

    /// linux, mac_os or windows (overrides TARGET_OS)
    #[arg(long, global = true)]
    target_os: Option<TargetOs>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the install tree
    Build,

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Run preflight checks
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Remove pipeline outputs (keeps the embedded runtime)
    Clean,
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show integrations that would be built
    Candidates,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = std::env::current_dir()?;

    // Load .env if present
    dotenvy::dotenv().ok();
    let mut config = Config::load(&base_dir)?;

    if let Some(source) = cli.source {
        config.integrations_dir = base_dir.join(source);
    }
    if let Some(install_dir) = cli.install_dir {
        config.install_dir = base_dir.join(install_dir);
    }
    if let Some(target_os) = cli.target_os {
        config.target_os = target_os;
    }

    match cli.command {
        Commands::Build => commands::cmd_build(&config)?,

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Candidates => commands::show::ShowTarget::Candidates,
            };
            commands::cmd_show(show_target, &config)?;
        }

        Commands::Preflight { strict } => commands::cmd_preflight(&config, strict)?,

        Commands::Clean => commands::cmd_clean(&config)?,
    }

    Ok(())
}

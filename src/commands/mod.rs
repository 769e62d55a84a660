//! CLI command handlers.
//!
//! - `build` - assemble the install tree
//! - `show` - display configuration or discovered integrations
//! - `preflight` - run preflight checks
//! - `clean` - remove pipeline outputs

pub mod build;
pub mod clean;
mod preflight;
pub mod show;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use preflight::cmd_preflight;
pub use show::cmd_show;

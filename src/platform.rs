//! Target operating systems.
//!
//! The identifiers match the strings integration manifests use in their
//! `supported_os` lists.

use anyhow::{bail, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetOs {
    Linux,
    MacOs,
    Windows,
}

impl TargetOs {
    /// All supported targets, in display order.
    pub const ALL: [TargetOs; 3] = [TargetOs::Linux, TargetOs::MacOs, TargetOs::Windows];

    /// Identifier used in manifests.
    pub fn id(self) -> &'static str {
        match self {
            TargetOs::Linux => "linux",
            TargetOs::MacOs => "mac_os",
            TargetOs::Windows => "windows",
        }
    }

    pub fn is_windows(self) -> bool {
        self == TargetOs::Windows
    }

    /// The OS this binary is running on.
    ///
    /// Unknown Unix flavours are treated as Linux.
    pub fn host() -> Self {
        match std::env::consts::OS {
            "windows" => TargetOs::Windows,
            "macos" => TargetOs::MacOs,
            _ => TargetOs::Linux,
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for TargetOs {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "linux" => Ok(TargetOs::Linux),
            // "macos" is accepted on the command line for convenience
            "mac_os" | "macos" => Ok(TargetOs::MacOs),
            "windows" => Ok(TargetOs::Windows),
            other => bail!(
                "Unknown target OS '{}'. Expected one of: linux, mac_os, windows",
                other
            ),
        }
    }
}

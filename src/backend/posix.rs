//! Linux / macOS backend.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{built_wheels, package_label, BuildBackend, WHEEL_ARGS};
use crate::process::Cmd;

/// Runs `<install_dir>/embedded/bin/pip` against the embedded runtime.
///
/// `PATH` is prefixed with the runtime's `bin` directory and `LD_RUN_PATH`
/// points at its `lib` directory, so compilers and linkers invoked by the
/// build pick up the embedded tools and libraries instead of the host's.
#[derive(Debug, Clone)]
pub struct PosixBackend {
    embedded: PathBuf,
    host_path: Option<String>,
}

impl PosixBackend {
    /// Backend for `install_dir`, capturing the current `PATH`.
    pub fn new(install_dir: &Path) -> Self {
        Self::with_host_path(
            install_dir,
            std::env::var_os("PATH").map(|p| p.to_string_lossy().into_owned()),
        )
    }

    pub fn with_host_path(install_dir: &Path, host_path: Option<String>) -> Self {
        Self {
            embedded: install_dir.join("embedded"),
            host_path,
        }
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.embedded.join("bin")
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.embedded.join("lib")
    }

    /// `PATH` value handed to every package-manager process.
    pub fn search_path(&self) -> String {
        let bin = self.bin_dir().display().to_string();
        match self.host_path.as_deref() {
            Some(host) if !host.is_empty() => format!("{}:{}", bin, host),
            _ => bin,
        }
    }

    fn pip(&self) -> Cmd {
        Cmd::new(self.package_manager().to_string_lossy())
            .env("PATH", self.search_path())
            .env("LD_RUN_PATH", self.lib_dir().to_string_lossy())
    }

    /// Runs from the directory holding the requirements file.
    pub fn requirements_command(&self, requirements: &Path) -> Cmd {
        let cmd = self
            .pip()
            .args(["install", "-r"])
            .arg(requirements.to_string_lossy());
        match requirements.parent() {
            Some(dir) => cmd.dir(dir),
            None => cmd,
        }
    }

    pub fn wheel_command(&self, package_dir: &Path) -> Cmd {
        self.pip().args(WHEEL_ARGS).dir(package_dir)
    }

    /// One install for all wheels, like `pip install *.whl`.
    pub fn install_command(&self, package_dir: &Path, wheels: &[String]) -> Cmd {
        self.pip().arg("install").args(wheels).dir(package_dir)
    }
}

impl BuildBackend for PosixBackend {
    fn name(&self) -> &str {
        "posix"
    }

    fn package_manager(&self) -> PathBuf {
        self.bin_dir().join("pip")
    }

    fn install_requirements(&self, requirements: &Path) -> Result<()> {
        self.requirements_command(requirements)
            .error_msg("Installing baseline requirements failed")
            .run_interactive()?;
        Ok(())
    }

    fn build_and_install(&self, package_dir: &Path) -> Result<Vec<String>> {
        let label = package_label(package_dir);

        self.wheel_command(package_dir)
            .error_msg(format!("Wheel build failed for {}", label))
            .run_interactive()?;

        let wheels = built_wheels(package_dir)?;
        self.install_command(package_dir, &wheels)
            .error_msg(format!("Wheel install failed for {}", label))
            .run_interactive()?;

        Ok(wheels)
    }
}

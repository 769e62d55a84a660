//! Windows backend.

use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{built_wheels, package_label, BuildBackend, WHEEL_ARGS};
use crate::process::Cmd;

/// Convert forward slashes to backslashes.
pub fn windows_safe_path(path: &Path) -> String {
    path.to_string_lossy().replace('/', "\\")
}

/// Runs `<install_dir>\embedded\scripts\pip.exe`.
///
/// No environment overrides: the Windows runtime's `pip.exe` locates its
/// interpreter on its own.
#[derive(Debug, Clone)]
pub struct WindowsBackend {
    install_dir: String,
}

impl WindowsBackend {
    pub fn new(install_dir: &Path) -> Self {
        Self {
            install_dir: windows_safe_path(install_dir),
        }
    }

    fn pip_exe(&self) -> String {
        format!("{}\\embedded\\scripts\\pip.exe", self.install_dir)
    }

    fn pip_in(&self, package_dir: &Path) -> Cmd {
        Cmd::new(self.pip_exe()).dir(&PathBuf::from(windows_safe_path(package_dir)))
    }

    pub fn requirements_command(&self, requirements: &Path) -> Cmd {
        let cmd = match requirements.parent() {
            Some(dir) => self.pip_in(dir),
            None => Cmd::new(self.pip_exe()),
        };
        cmd.args(["install", "-r"])
            .arg(windows_safe_path(requirements))
    }

    pub fn wheel_command(&self, package_dir: &Path) -> Cmd {
        self.pip_in(package_dir).args(WHEEL_ARGS)
    }

    /// One install per wheel.
    pub fn install_commands(&self, package_dir: &Path, wheels: &[String]) -> Vec<Cmd> {
        wheels
            .iter()
            .map(|wheel| self.pip_in(package_dir).arg("install").arg(wheel))
            .collect()
    }
}

impl BuildBackend for WindowsBackend {
    fn name(&self) -> &str {
        "windows"
    }

    fn package_manager(&self) -> PathBuf {
        PathBuf::from(self.pip_exe())
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
        for cmd in self.install_commands(package_dir, &wheels) {
            cmd.error_msg(format!("Wheel install failed for {}", label))
                .run_interactive()?;
        }

        Ok(wheels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows_safe_path() {
        assert_eq!(
            windows_safe_path(Path::new("C:/opt/datadog-agent")),
            "C:\\opt\\datadog-agent"
        );
        assert_eq!(windows_safe_path(Path::new("C:\\already")), "C:\\already");
    }

    #[test]
    fn test_pip_exe_under_scripts() {
        let backend = WindowsBackend::new(Path::new("C:/opt/datadog-agent"));
        assert_eq!(
            backend.package_manager(),
            PathBuf::from("C:\\opt\\datadog-agent\\embedded\\scripts\\pip.exe")
        );
    }

    #[test]
    fn test_wheel_command_uses_windows_paths() {
        let backend = WindowsBackend::new(Path::new("C:/opt/datadog-agent"));
        let cmd = backend.wheel_command(Path::new("C:/src/integrations-core/iis"));

        assert_eq!(cmd.get_args(), ["wheel", "--no-deps", "."]);
        assert_eq!(
            cmd.current_dir(),
            Some(Path::new("C:\\src\\integrations-core\\iis"))
        );
        assert!(cmd.get_env("PATH").is_none());
        assert!(cmd.get_env("LD_RUN_PATH").is_none());
    }

    #[test]
    fn test_install_one_command_per_wheel() {
        let backend = WindowsBackend::new(Path::new("C:/opt/datadog-agent"));
        let wheels = vec!["a-1.0-py2-none-any.whl".to_string(), "b-1.0-py2-none-any.whl".to_string()];

        let cmds = backend.install_commands(Path::new("C:/src/iis"), &wheels);

        assert_eq!(cmds.len(), 2);
        assert_eq!(cmds[1].get_args(), ["install", "b-1.0-py2-none-any.whl"]);
    }

    #[test]
    fn test_requirements_command() {
        let backend = WindowsBackend::new(Path::new("C:/opt/datadog-agent"));
        let cmd = backend.requirements_command(Path::new("C:/src/check_requirements.txt"));
        assert_eq!(
            cmd.get_args(),
            ["install", "-r", "C:\\src\\check_requirements.txt"]
        );
    }
}

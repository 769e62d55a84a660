//! Shared test utilities for integrations-builder tests.

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use integrations_builder::backend::BuildBackend;
use integrations_builder::discovery::ExclusionSet;
use integrations_builder::layout::{InstallLayout, DEFAULT_PRODUCT};
use integrations_builder::requirements::BaselineRequirements;
use integrations_builder::{Pipeline, TargetOs};

/// Temporary integrations checkout and install root.
pub struct TestEnv {
    /// Kept alive for the lifetime of the TestEnv
    pub _temp_dir: TempDir,
    /// Integrations checkout
    pub source: PathBuf,
    /// Install root
    pub install: PathBuf,
}

impl TestEnv {
    /// Create a checkout that already contains the base package.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("integrations-core");
        let install = temp_dir.path().join("install");
        fs::create_dir_all(&source).expect("Failed to create source dir");

        let env = Self {
            _temp_dir: temp_dir,
            source,
            install,
        };
        env.integration("datadog-base").build_descriptor();
        env
    }

    /// Start describing an integration directory.
    pub fn integration(&self, id: &str) -> IntegrationBuilder {
        let dir = self.source.join(id);
        fs::create_dir_all(&dir).expect("Failed to create integration dir");
        IntegrationBuilder { dir }
    }

    pub fn pipeline(&self, target: TargetOs) -> Pipeline {
        Pipeline {
            source_root: self.source.clone(),
            layout: InstallLayout::new(&self.install, DEFAULT_PRODUCT),
            target,
            exclusions: ExclusionSet::defaults(),
            baseline: BaselineRequirements::default(),
            base_package: "datadog-base".to_string(),
        }
    }

    pub fn layout(&self) -> InstallLayout {
        InstallLayout::new(&self.install, DEFAULT_PRODUCT)
    }

    pub fn conf_dir(&self, id: &str) -> PathBuf {
        self.layout().integration_conf_dir(id)
    }
}

/// Writes the files of one integration directory.
pub struct IntegrationBuilder {
    pub dir: PathBuf,
}

impl IntegrationBuilder {
    pub fn manifest(self, supported_os: &[&str]) -> Self {
        let list = supported_os
            .iter()
            .map(|os| format!("\"{}\"", os))
            .collect::<Vec<_>>()
            .join(", ");
        self.raw_manifest(&format!(
            "{{\"manifest_version\": \"0.1.0\", \"supported_os\": [{}]}}",
            list
        ))
    }

    pub fn raw_manifest(self, content: &str) -> Self {
        fs::write(self.dir.join("manifest.json"), content).expect("Failed to write manifest");
        self
    }

    pub fn conf(self) -> Self {
        fs::write(self.dir.join("conf.yaml.example"), "init_config:\n\ninstances:\n")
            .expect("Failed to write conf.yaml.example");
        self
    }

    pub fn auto_conf(self) -> Self {
        fs::write(self.dir.join("auto_conf.yaml"), "ad_identifiers:\n")
            .expect("Failed to write auto_conf.yaml");
        self
    }

    pub fn build_descriptor(self) -> Self {
        fs::write(self.dir.join("setup.py"), "from setuptools import setup\nsetup()\n")
            .expect("Failed to write setup.py");
        self
    }
}

/// What the recording backend was asked to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Requirements file content at install time.
    Requirements(String),
    /// Directory name of a built package.
    Build(String),
}

/// Backend that records calls instead of running a package manager.
#[derive(Default)]
pub struct RecordingBackend {
    pub events: RefCell<Vec<Event>>,
    /// Package whose build fails.
    pub fail_on: Option<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(id: &str) -> Self {
        Self {
            fail_on: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn built(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Build(id) => Some(id.clone()),
                _ => None,
            })
            .collect()
    }
}

impl BuildBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn package_manager(&self) -> PathBuf {
        PathBuf::from("pip")
    }

    fn install_requirements(&self, requirements: &Path) -> Result<()> {
        let content = fs::read_to_string(requirements)?;
        self.events.borrow_mut().push(Event::Requirements(content));
        Ok(())
    }

    fn build_and_install(&self, package_dir: &Path) -> Result<Vec<String>> {
        let id = package_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_on.as_deref() == Some(id.as_str()) {
            bail!("Wheel build failed for {} (exit code 1)", id);
        }
        self.events.borrow_mut().push(Event::Build(id.clone()));
        Ok(vec![format!("{}-1.0.0-py2-none-any.whl", id.replace('-', "_"))])
    }
}

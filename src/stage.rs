//! Configuration template staging.
//!
//! Copies an integration's `conf.yaml.example` and, off Windows, its
//! `auto_conf.yaml` into `<conf_dir>/<id>.d/`. The directory is created only
//! when there is something to put in it.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::Candidate;
use crate::layout::InstallLayout;
use crate::platform::TargetOs;

/// Stage the templates of one integration.
///
/// Returns the files written, empty if the integration has no templates for
/// this target.
pub fn stage_config(
    candidate: &Candidate,
    layout: &InstallLayout,
    target: TargetOs,
) -> Result<Vec<PathBuf>> {
    let auto_conf = if target.is_windows() {
        // no auto_conf on Windows yet
        None
    } else {
        candidate.auto_conf_template.as_deref()
    };

    let templates: Vec<&Path> = candidate
        .conf_template
        .as_deref()
        .into_iter()
        .chain(auto_conf)
        .collect();

    if templates.is_empty() {
        return Ok(Vec::new());
    }

    let dest_dir = layout.integration_conf_dir(&candidate.id);
    if !dest_dir.exists() {
        fs::create_dir_all(&dest_dir)
            .with_context(|| format!("Failed to create {}", dest_dir.display()))?;
    }

    let mut staged = Vec::with_capacity(templates.len());
    for template in templates {
        staged.push(copy_into(template, &dest_dir)?);
    }
    Ok(staged)
}

fn copy_into(file: &Path, dir: &Path) -> Result<PathBuf> {
    let name = file
        .file_name()
        .with_context(|| format!("{} has no file name", file.display()))?;
    let dest = dir.join(name);
    fs::copy(file, &dest)
        .with_context(|| format!("Failed to copy {} to {}", file.display(), dest.display()))?;
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::candidate::{AUTO_CONF_FILENAME, CONF_TEMPLATE_FILENAME};
    use crate::layout::DEFAULT_PRODUCT;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        layout: InstallLayout,
        source: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = TempDir::new().unwrap();
        let layout = InstallLayout::new(&tmp.path().join("install"), DEFAULT_PRODUCT);
        layout.create().unwrap();
        let source = tmp.path().join("src");
        fs::create_dir_all(&source).unwrap();
        Fixture {
            _tmp: tmp,
            layout,
            source,
        }
    }

    fn candidate(f: &Fixture, id: &str, conf: bool, auto_conf: bool) -> Candidate {
        let dir = f.source.join(id);
        fs::create_dir_all(&dir).unwrap();
        let mut c = Candidate {
            id: id.to_string(),
            dir: dir.clone(),
            manifest: None,
            conf_template: None,
            auto_conf_template: None,
            build_descriptor: None,
        };
        if conf {
            let p = dir.join(CONF_TEMPLATE_FILENAME);
            fs::write(&p, format!("# {} example\ninstances:\n", id)).unwrap();
            c.conf_template = Some(p);
        }
        if auto_conf {
            let p = dir.join(AUTO_CONF_FILENAME);
            fs::write(&p, "ad_identifiers:\n  - redis\n").unwrap();
            c.auto_conf_template = Some(p);
        }
        c
    }

    #[test]
    fn test_copies_verbatim() {
        let f = fixture();
        let c = candidate(&f, "redisdb", true, false);

        let staged = stage_config(&c, &f.layout, TargetOs::Linux).unwrap();

        let dest = f.layout.integration_conf_dir("redisdb").join(CONF_TEMPLATE_FILENAME);
        assert_eq!(staged, vec![dest.clone()]);
        assert_eq!(
            fs::read_to_string(dest).unwrap(),
            "# redisdb example\ninstances:\n"
        );
    }

    #[test]
    fn test_auto_conf_off_windows() {
        let f = fixture();
        let c = candidate(&f, "redisdb", true, true);

        let staged = stage_config(&c, &f.layout, TargetOs::MacOs).unwrap();

        assert_eq!(staged.len(), 2);
        assert!(f
            .layout
            .integration_conf_dir("redisdb")
            .join(AUTO_CONF_FILENAME)
            .is_file());
    }

    #[test]
    fn test_auto_conf_never_on_windows() {
        let f = fixture();
        let c = candidate(&f, "redisdb", true, true);

        let staged = stage_config(&c, &f.layout, TargetOs::Windows).unwrap();

        assert_eq!(staged.len(), 1);
        assert!(!f
            .layout
            .integration_conf_dir("redisdb")
            .join(AUTO_CONF_FILENAME)
            .exists());
    }

    #[test]
    fn test_auto_conf_alone_creates_dir() {
        let f = fixture();
        let c = candidate(&f, "kafka", false, true);

        let staged = stage_config(&c, &f.layout, TargetOs::Linux).unwrap();
        assert_eq!(staged.len(), 1);

        let on_windows = candidate(&f, "consul", false, true);
        assert!(stage_config(&on_windows, &f.layout, TargetOs::Windows)
            .unwrap()
            .is_empty());
        assert!(!f.layout.integration_conf_dir("consul").exists());
    }

    #[test]
    fn test_no_templates_no_dir() {
        let f = fixture();
        let c = candidate(&f, "btrfs", false, false);

        assert!(stage_config(&c, &f.layout, TargetOs::Linux).unwrap().is_empty());
        assert!(!f.layout.integration_conf_dir("btrfs").exists());
    }

    #[test]
    fn test_existing_dir_is_reused() {
        let f = fixture();
        let dir = f.layout.integration_conf_dir("redisdb");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("conf.yaml"), "user config\n").unwrap();

        let c = candidate(&f, "redisdb", true, false);
        stage_config(&c, &f.layout, TargetOs::Linux).unwrap();

        assert_eq!(fs::read_to_string(dir.join("conf.yaml")).unwrap(), "user config\n");
        assert!(dir.join(CONF_TEMPLATE_FILENAME).is_file());
    }
}

//! Site initialization module.
//!
//! Creates a new site with a default `enju.toml`, a sample content document
//! to fall back on, and the asset directories the pages link to.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Sample document written as the fallback content file
const SAMPLE_CONTENT: &str = include_str!("embed/content-data.json");

/// Default site directory structure
const SITE_DIRS: &[&str] = &["assets/css", "assets/images", "assets/js", "admin"];

/// Create a new site with default structure
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Without a name the site lands in the current directory, which must be empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `enju init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    init_default_config(&config.config_path)?;
    init_sample_content(&config.api.fallback)?;

    let output = config
        .build
        .output
        .strip_prefix(root)
        .unwrap_or(&config.build.output);
    init_ignored_files(root, &[output])?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write default configuration file
fn init_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&SiteConfig::default())?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn init_sample_content(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Content file `{}` already exists", path.display());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, SAMPLE_CONTENT).with_context(|| format!("Failed to write {}", path.display()))
}

/// Create site directory structure
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `enju init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Initialize .gitignore and .ignore files with specified paths
fn init_ignored_files(root: &Path, paths: &[&Path]) -> Result<()> {
    let content = paths
        .iter()
        .filter_map(|p| p.to_str())
        .collect::<Vec<_>>()
        .join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Document;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("enju.toml");
        config.build.output = root.join("public");
        config.api.fallback = root.join("content-data.json");
        config
    }

    #[test]
    fn test_new_site_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("site");
        let config = config_at(&root);

        new_site(&config, true).unwrap();

        for sub in SITE_DIRS {
            assert!(root.join(sub).is_dir(), "{sub} missing");
        }
        let written = SiteConfig::from_path(&root.join("enju.toml")).unwrap();
        assert_eq!(written.site.name, "Enju Tours");

        let sample = fs::read_to_string(root.join("content-data.json")).unwrap();
        let document = Document::from_json(&sample).unwrap();
        assert!(document.find_package("package-kalandula").is_some());

        assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "public");
    }

    #[test]
    fn test_new_site_refuses_non_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        let config = config_at(dir.path());

        assert!(new_site(&config, false).is_err());
        assert!(!dir.path().join("enju.toml").exists());
    }

    #[test]
    fn test_existing_ignore_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "target").unwrap();

        init_ignored_files(dir.path(), &[Path::new("public")]).unwrap();

        assert_eq!(fs::read_to_string(dir.path().join(".gitignore")).unwrap(), "target");
        assert_eq!(fs::read_to_string(dir.path().join(".ignore")).unwrap(), "public");
    }
}

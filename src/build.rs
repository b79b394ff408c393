//! Static snapshot build.
//!
//! # Architecture
//!
//! ```text
//! build_site()
//!     │
//!     ├── ContentClient::load() ──► Document (API, else fallback file)
//!     │
//!     ├── rayon::join
//!     │       ├── write_pages()  ──► index.html, sobre.html,
//!     │       │                      pacote-detalhes.html,
//!     │       │                      pacote-detalhes/<id>.html
//!     │       └── copy_assets()  ──► assets/** copied verbatim
//!     │
//!     └── write_snapshot() ──► content-data.json (when enabled)
//! ```

use crate::{
    client::ContentClient,
    config::SiteConfig,
    content::Document,
    log,
    render::{DetailLinks, Page, RenderOptions, render_html},
    utils::minify::minify_html,
};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::{fs, path::Path};
use walkdir::WalkDir;

/// Name of the document snapshot written next to the pages.
pub const SNAPSHOT_FILE: &str = "content-data.json";

/// Load the document and write the public site into the output directory.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;

    let document = ContentClient::from_config(config)?
        .load()
        .context("No content available from the API or the fallback file")?;

    prepare_output(output, config.build.clean)?;

    log!("build"; "rendering pages...");
    let (pages, assets) = rayon::join(
        || write_pages(&document, config),
        || copy_assets(&config.build.assets, output),
    );
    let page_count = pages?;
    let asset_count = assets?;

    if config.build.snapshot {
        write_snapshot(&document, output)?;
    }

    log!("build"; "done: {page_count} pages, {asset_count} assets");
    Ok(())
}

/// Create the output directory, clearing it first when `clean` is set.
fn prepare_output(output: &Path, clean: bool) -> Result<()> {
    if clean && output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create {}", output.display()))
}

/// Every page of the static site.
///
/// Packages whose id cannot be a file name are left out (and logged); their
/// listing links then lead to a missing page.
fn site_pages(document: &Document) -> Vec<Page> {
    let mut pages = vec![Page::Home, Page::About, Page::PackageDetail(None)];
    for pkg in document.package_items() {
        if is_file_safe(&pkg.id) {
            pages.push(Page::PackageDetail(Some(pkg.id.clone())));
        } else {
            log!("warn"; "skipping package `{}`: id is not a valid file name", pkg.id);
        }
    }
    pages
}

fn is_file_safe(id: &str) -> bool {
    !id.is_empty() && id != "." && id != ".." && !id.contains(['/', '\\', '\0'])
}

fn write_pages(document: &Document, config: &SiteConfig) -> Result<usize> {
    let options = RenderOptions::from_config(config, DetailLinks::Static);
    let pages = site_pages(document);

    pages.par_iter().try_for_each(|page| {
        let html = render_html(page, document, &options);
        let path = config.build.output.join(page.path(DetailLinks::Static));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, minify_html(html.as_bytes(), config))
            .with_context(|| format!("Failed to write {}", path.display()))
    })?;

    Ok(pages.len())
}

/// Copy the assets directory into the output, keeping relative paths.
fn copy_assets(assets: &Path, output: &Path) -> Result<usize> {
    if !assets.is_dir() {
        log!("warn"; "assets directory {} not found, skipping", assets.display());
        return Ok(0);
    }

    let base = assets.parent().unwrap_or(assets);
    let files: Vec<_> = WalkDir::new(assets)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .collect();

    files.par_iter().try_for_each(|path| -> Result<()> {
        let relative = path.strip_prefix(base)?;
        let target = output.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target)
            .with_context(|| format!("Failed to copy {}", path.display()))?;
        Ok(())
    })?;

    Ok(files.len())
}

fn write_snapshot(document: &Document, output: &Path) -> Result<()> {
    let path = output.join(SNAPSHOT_FILE);
    fs::write(&path, document.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", path.display()))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config_in(dir: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.output = dir.join("public");
        config.build.assets = dir.join("assets");
        config.build.minify = false;
        config.api.url = "http://127.0.0.1:9/api".into();
        config.api.fallback = dir.join("content-data.json");
        config.api.state = dir.join("state.json");
        config
    }

    fn sample() -> &'static str {
        include_str!("embed/content-data.json")
    }

    #[test]
    fn test_build_site_from_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.api.fallback, sample()).unwrap();
        fs::create_dir_all(dir.path().join("assets/css")).unwrap();
        fs::write(dir.path().join("assets/css/style.css"), "body{}").unwrap();

        build_site(&config).unwrap();

        let public = &config.build.output;
        let index = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(index.starts_with("<!DOCTYPE html>"));
        assert!(index.contains("pacote-detalhes/package-kalandula.html"));

        let detail =
            fs::read_to_string(public.join("pacote-detalhes/package-namibe.html")).unwrap();
        assert!(detail.contains("<title>Deserto do Namibe - Enju Tours</title>"));
        assert!(detail.contains(r#"href="../assets/css/style.css""#));

        assert!(public.join("sobre.html").is_file());
        assert!(public.join("pacote-detalhes.html").is_file());
        assert!(public.join("assets/css/style.css").is_file());

        let snapshot = fs::read_to_string(public.join(SNAPSHOT_FILE)).unwrap();
        assert_eq!(
            Document::from_json(&snapshot).unwrap(),
            Document::from_json(sample()).unwrap()
        );
    }

    #[test]
    fn test_build_without_content_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        assert!(build_site(&config).is_err());
        assert!(!config.build.output.exists());
    }

    #[test]
    fn test_clean_removes_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.build.clean = true;
        config.build.snapshot = false;
        fs::write(&config.api.fallback, sample()).unwrap();
        fs::create_dir_all(&config.build.output).unwrap();
        fs::write(config.build.output.join("stale.html"), "old").unwrap();

        build_site(&config).unwrap();

        assert!(!config.build.output.join("stale.html").exists());
        assert!(!config.build.output.join(SNAPSHOT_FILE).exists());
        assert!(config.build.output.join("index.html").is_file());
    }

    #[test]
    fn test_site_pages_skip_unsafe_ids() {
        let document = Document::from_json(
            r#"{"packages": {"items": [{"id": "ok"}, {"id": "../escape"}, {"id": ""}]}}"#,
        )
        .unwrap();
        let paths: Vec<PathBuf> = site_pages(&document)
            .iter()
            .map(|page| PathBuf::from(page.path(DetailLinks::Static)))
            .collect();

        assert_eq!(
            paths,
            vec![
                PathBuf::from("index.html"),
                PathBuf::from("sobre.html"),
                PathBuf::from("pacote-detalhes.html"),
                PathBuf::from("pacote-detalhes/ok.html"),
            ]
        );
    }
}

//! `[build]` section configuration.
//!
//! Contains output paths, minification and the `<head>` assets of rendered pages.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Main BuildConfig
// ============================================================================

/// `[build]` section in enju.toml - static snapshot configuration.
///
/// # Example
/// ```toml
/// [build]
/// output = "public"        # Output directory
/// assets = "assets"        # Copied verbatim into the output
/// minify = true            # Minify HTML
///
/// [build.head]
/// styles = ["assets/css/style.css"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Build output directory.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Static assets directory (images, CSS, JS).
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Minify HTML output (removes whitespace).
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Clear output directory before each build.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Write the loaded document next to the pages as the static fallback file.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub snapshot: bool,

    /// Custom `<head>` elements.
    #[serde(default)]
    pub head: HeadConfig,
}

// ============================================================================
// Sub-configurations
// ============================================================================

/// `[build.head]` section for stylesheets, scripts and favicon.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct HeadConfig {
    /// Favicon href
    #[serde(default)]
    pub icon: Option<String>,

    /// CSS stylesheet hrefs
    #[serde(default = "defaults::build::head::styles")]
    #[educe(Default = defaults::build::head::styles())]
    pub styles: Vec<String>,

    /// Script entries
    #[serde(default)]
    pub scripts: Vec<ScriptEntry>,
}

/// Script entry for `[build.head.scripts]`.
///
/// # Formats
/// ```toml
/// # Simple src
/// scripts = ["js/script.js"]
///
/// # With loading options
/// scripts = [
///     { src = "js/swiper-bundle.min.js", defer = true },
///     { src = "js/analytics.js", async = true },
/// ]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptEntry {
    /// Simple src string.
    Simple(String),
    /// Src with `defer`/`async` attributes.
    WithOptions {
        src: String,
        #[serde(default)]
        defer: bool,
        #[serde(default)]
        r#async: bool,
    },
}

impl ScriptEntry {
    /// Get the src for this script entry
    pub fn src(&self) -> &str {
        match self {
            ScriptEntry::Simple(src) => src,
            ScriptEntry::WithOptions { src, .. } => src,
        }
    }

    /// Check if defer attribute should be added
    pub fn is_defer(&self) -> bool {
        match self {
            ScriptEntry::Simple(_) => false,
            ScriptEntry::WithOptions { defer, .. } => *defer,
        }
    }

    /// Check if async attribute should be added
    pub fn is_async(&self) -> bool {
        match self {
            ScriptEntry::Simple(_) => false,
            ScriptEntry::WithOptions { r#async, .. } => *r#async,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_build_config_defaults() {
        let config: SiteConfig = toml::from_str("").unwrap();

        assert_eq!(config.build.output, PathBuf::from("public"));
        assert_eq!(config.build.assets, PathBuf::from("assets"));
        assert!(config.build.minify);
        assert!(!config.build.clean);
        assert!(config.build.snapshot);
        assert_eq!(config.build.head.styles, vec!["assets/css/style.css".to_string()]);
        assert!(config.build.head.scripts.is_empty());
    }

    #[test]
    fn test_head_config_styles() {
        let config = r#"
            [build.head]
            styles = ["css/style.css", "css/swiper-bundle.min.css"]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.head.styles.len(), 2);
        assert_eq!(config.build.head.styles[1], "css/swiper-bundle.min.css");
    }

    #[test]
    fn test_head_config_scripts_with_options() {
        let config = r#"
            [build.head]
            scripts = [
                { src = "js/swiper-bundle.min.js", defer = true },
                "js/script.js",
                { src = "js/analytics.js", async = true }
            ]
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();
        let scripts = &config.build.head.scripts;

        assert_eq!(scripts.len(), 3);

        assert_eq!(scripts[0].src(), "js/swiper-bundle.min.js");
        assert!(scripts[0].is_defer());
        assert!(!scripts[0].is_async());

        assert_eq!(scripts[1].src(), "js/script.js");
        assert!(!scripts[1].is_defer());
        assert!(!scripts[1].is_async());

        assert!(!scripts[2].is_defer());
        assert!(scripts[2].is_async());
    }

    #[test]
    fn test_build_paths_custom() {
        let config = r#"
            [build]
            output = "dist"
            assets = "static"
            minify = false
            snapshot = false
        "#;
        let config: SiteConfig = toml::from_str(config).unwrap();

        assert_eq!(config.build.output, PathBuf::from("dist"));
        assert_eq!(config.build.assets, PathBuf::from("static"));
        assert!(!config.build.minify);
        assert!(!config.build.snapshot);
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [build]
            typst = true
        "#;
        let result: Result<SiteConfig, _> = toml::from_str(config);
        assert!(result.is_err());
    }
}

//! Site configuration management for `enju.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[site]`    | Page strings, WhatsApp number, list layouts    |
//! | `[api]`     | Content API URL, fallback file, token state    |
//! | `[build]`   | Output paths, minify, `<head>` assets          |
//! | `[serve]`   | Preview server (port, interface)               |
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Enju Tours"
//! gallery_layout = "slider"
//!
//! [api]
//! url = "https://cms.example.com/api"
//!
//! [build]
//! output = "public"
//! minify = true
//!
//! [serve]
//! port = 5277
//! ```

mod api;
mod build;
pub mod defaults;
mod error;
mod serve;
mod site;

// Re-export public types used by other modules
pub use api::ApiConfig;
pub use build::HeadConfig;
pub use site::{Layout, SiteSection};

// Internal imports used in this module
use build::BuildConfig;
use error::ConfigError;
use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing enju.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Public site settings
    #[serde(default)]
    pub site: SiteSection,

    /// Content store settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        let base = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        self.update_path_with_root(&root, &cli.config);
        Self::update_option(&mut self.api.url, cli.api_url.as_ref());

        match &cli.command {
            Commands::Build { build_args } => {
                Self::update_option(&mut self.build.minify, build_args.minify.as_ref());
                self.build.clean |= build_args.clean;
            }
            Commands::Serve { interface, port } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
            }
            _ => {}
        }
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config_file: &Path) {
        let root = Self::normalize_path(root);
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config_file));
        self.build.output = Self::normalize_path(&root.join(&self.build.output));
        self.build.assets = Self::normalize_path(&root.join(&self.build.assets));
        self.api.fallback = Self::normalize_path(&root.join(&self.api.fallback));

        // State path gets tilde expansion; relative paths hang off the root
        let expanded = shellexpand::tilde(&self.api.state.to_string_lossy()).into_owned();
        let state = PathBuf::from(expanded);
        self.api.state = if state.is_relative() {
            Self::normalize_path(&root.join(state))
        } else {
            Self::normalize_path(&state)
        };
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration for the current command
    pub fn validate(&self) -> Result<()> {
        if !self.config_path.exists() {
            bail!("Config file not found");
        }

        if !self.api.url.starts_with("http") {
            bail!(ConfigError::Validation(
                "[api.url] must start with http:// or https://".into()
            ));
        }

        if self.site.whatsapp.is_empty() || !self.site.whatsapp.bytes().all(|b| b.is_ascii_digit())
        {
            bail!(ConfigError::Validation(
                "[site.whatsapp] must contain only digits".into()
            ));
        }

        if self.site.admin_login.starts_with('/') || self.site.admin_login.contains("://") {
            bail!(ConfigError::Validation(
                "[site.admin_login] must be relative to the site root".into()
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

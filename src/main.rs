//! Enju - renders, serves and edits a content-managed tourism site.

mod admin;
mod build;
mod cli;
mod client;
mod config;
mod content;
mod editor;
mod init;
mod logger;
mod render;
mod serve;
mod utils;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_site;
use logger::{Toast, toast};
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    let config: &'static SiteConfig = Box::leak(Box::new(load_config(cli)?));

    match &cli.command {
        Commands::Init { name } => new_site(config, name.is_some()),
        Commands::Build { .. } => build_site(config),
        Commands::Serve { .. } => serve_site(config),
        Commands::Login { username, password } => admin::login(config, username, password),
        Commands::Logout => admin::logout(config),
        Commands::Status => admin::status(config),
        Commands::Admin { command } => {
            if let Err(err) = admin::run(command, config) {
                toast(Toast::Error, &format!("{err:#}"));
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let root = match &cli.command {
        Commands::Init { name: Some(name) } => root.join(name),
        _ => root.to_path_buf(),
    };
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() && !cli.is_init() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Validate config state based on command
    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

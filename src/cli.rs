//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use crate::content::SectionName;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Enju site renderer and content admin CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Root directory path
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: enju.toml)
    #[arg(short = 'C', long, default_value = "enju.toml")]
    pub config: PathBuf,

    /// Override the content API base URL.
    ///
    /// Example: point a local checkout at staging without editing enju.toml:
    ///   enju --api-url "https://staging.example.com/api" serve
    #[arg(long = "api-url")]
    pub api_url: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments of the Build command
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Clean output directory completely before building
    #[arg(long)]
    pub clean: bool,

    /// Minify the html content
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub minify: Option<bool>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Init a site with a default config and a sample content document
    Init {
        /// the name(path) of site directory, related to `root`
        name: Option<PathBuf>,
    },

    /// Load the content document and write the public pages to the output directory
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Serve the site, rendering every page from a fresh content load
    Serve {
        /// Interface to bind on
        #[arg(short, long)]
        interface: Option<String>,

        /// The port you should provide
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Exchange admin credentials for a token and store it
    Login {
        #[arg(short, long)]
        username: String,

        /// Read from ENJU_PASSWORD when omitted
        #[arg(short, long, env = "ENJU_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored admin token
    Logout,

    /// Show whether an admin token is stored
    Status,

    /// Edit the content document and push it back
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

/// Admin editor actions. Each mutating action loads the document, applies the
/// edit and saves the whole document once.
#[derive(Subcommand, Debug, Clone)]
pub enum AdminCommand {
    /// Print the form fields of a section (all sections when omitted)
    Show { section: Option<SectionName> },

    /// Set a form field, e.g. `hero-title "Explore"`
    Set { field: String, value: String },

    /// Add, edit or remove tour packages
    Package {
        #[command(subcommand)]
        command: PackageCommand,
    },

    /// Edit the "values" list of the about section
    Value {
        #[command(subcommand)]
        command: ValueCommand,
    },

    /// Add or remove gallery images
    Gallery {
        #[command(subcommand)]
        command: GalleryCommand,
    },

    /// Upload an image into a document slot
    Upload { slot: UploadSlot, file: PathBuf },

    /// Upload a video and print its hosted URL
    UploadVideo { file: PathBuf },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PackageCommand {
    /// Append a package; title and price are required
    Add {
        #[command(flatten)]
        fields: PackageFields,
    },

    /// Change fields of an existing package, keeping its id
    Edit {
        id: String,

        #[command(flatten)]
        fields: PackageFields,
    },

    /// Remove a package by id
    Remove { id: String },
}

/// Package draft fields; omitted flags keep the current value.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PackageFields {
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// e.g. "2 Dias"
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Comma separated, e.g. "Transporte, Hotel, Guia"
    #[arg(long)]
    pub included: Option<String>,

    /// Image file to upload for this package
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ValueCommand {
    /// Append a value
    Add { title: String, desc: String },

    /// Change one field of the value at POSITION (1-based)
    Set {
        position: usize,
        field: ValueFieldArg,
        value: String,
    },

    /// Remove the value at POSITION (1-based)
    Remove { position: usize },
}

#[derive(Subcommand, Debug, Clone)]
pub enum GalleryCommand {
    /// Upload an image and append it to the gallery
    Add {
        file: PathBuf,

        #[arg(long, default_value = "")]
        caption: String,
    },

    /// Remove the gallery item at POSITION (1-based)
    Remove { position: usize },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFieldArg {
    Title,
    Desc,
}

/// Document slots that take a single uploaded image.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    HeroImage,
    AboutImage,
    HeaderLogo,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("enju").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = parse(&["build", "--clean", "--minify=false"]);
        match cli.command {
            Commands::Build { build_args } => {
                assert!(build_args.clean);
                assert_eq!(build_args.minify, Some(false));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_api_url() {
        let cli = parse(&["--api-url", "https://cms.example.com/api", "status"]);
        assert_eq!(cli.api_url.as_deref(), Some("https://cms.example.com/api"));
        assert_eq!(cli.config, PathBuf::from("enju.toml"));
    }

    #[test]
    fn test_parse_admin_show_section() {
        let cli = parse(&["admin", "show", "hero"]);
        match cli.command {
            Commands::Admin {
                command: AdminCommand::Show { section },
            } => assert_eq!(section, Some(SectionName::Hero)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_admin_upload_slot() {
        let cli = parse(&["admin", "upload", "hero-image", "hero.jpg"]);
        match cli.command {
            Commands::Admin {
                command: AdminCommand::Upload { slot, file },
            } => {
                assert_eq!(slot, UploadSlot::HeroImage);
                assert_eq!(file, PathBuf::from("hero.jpg"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_package_edit() {
        let cli = parse(&[
            "admin", "package", "edit", "p1", "--price", "600", "--included", "Hotel, Guia",
        ]);
        match cli.command {
            Commands::Admin {
                command:
                    AdminCommand::Package {
                        command: PackageCommand::Edit { id, fields },
                    },
            } => {
                assert_eq!(id, "p1");
                assert_eq!(fields.price.as_deref(), Some("600"));
                assert_eq!(fields.included.as_deref(), Some("Hotel, Guia"));
                assert!(fields.title.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_login_password_flag() {
        let cli = parse(&["login", "-u", "admin", "-p", "secret"]);
        match cli.command {
            Commands::Login { username, password } => {
                assert_eq!(username, "admin");
                assert_eq!(password, "secret");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result = Cli::try_parse_from(["enju", "admin", "show", "sidebar"]);
        assert!(result.is_err());
    }
}

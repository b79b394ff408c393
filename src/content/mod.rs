//! The content document: one JSON object describing every editable text and
//! media field of the site.
//!
//! # Shape
//!
//! | Key        | Type                 |
//! |------------|----------------------|
//! | `header`   | [`HeaderSection`]    |
//! | `hero`     | [`HeroSection`]      |
//! | `gallery`  | [`GallerySection`]   |
//! | `about`    | [`AboutSection`]     |
//! | `packages` | [`PackagesSection`]  |
//! | `footer`   | [`FooterSection`]    |
//!
//! Every section is optional. Keys this crate does not model are kept in the
//! `extra` map of the enclosing object and written back untouched, since the
//! document is always saved wholesale.

mod lenient;
mod package;

pub use package::{Package, generate_package_id};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fmt, str::FromStr};

/// Unknown keys carried through a load/save cycle.
pub type Extra = Map<String, Value>;

// ============================================================================
// Section Names
// ============================================================================

/// The fixed set of top-level sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionName {
    Header,
    Hero,
    Gallery,
    About,
    Packages,
    Footer,
}

impl SectionName {
    pub const ALL: [SectionName; 6] = [
        Self::Header,
        Self::Hero,
        Self::Gallery,
        Self::About,
        Self::Packages,
        Self::Footer,
    ];

    /// JSON key of the section.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Hero => "hero",
            Self::Gallery => "gallery",
            Self::About => "about",
            Self::Packages => "packages",
            Self::Footer => "footer",
        }
    }

    /// Heading shown by the admin editor.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Header => "Cabeçalho",
            Self::Hero => "Seção Hero",
            Self::Gallery => "Galeria",
            Self::About => "Sobre Nós",
            Self::Packages => "Pacotes Turísticos",
            Self::Footer => "Rodapé",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown section `{s}`"))
    }
}

// ============================================================================
// Document
// ============================================================================

/// Root of the content document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gallery: Option<GallerySection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<AboutSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<PackagesSection>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterSection>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize the whole document as pretty JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Whether the named section is present.
    pub fn has_section(&self, name: SectionName) -> bool {
        match name {
            SectionName::Header => self.header.is_some(),
            SectionName::Hero => self.hero.is_some(),
            SectionName::Gallery => self.gallery.is_some(),
            SectionName::About => self.about.is_some(),
            SectionName::Packages => self.packages.is_some(),
            SectionName::Footer => self.footer.is_some(),
        }
    }

    /// Package items, empty when the section is absent.
    pub fn package_items(&self) -> &[Package] {
        self.packages.as_ref().map_or(&[], |p| p.items.as_slice())
    }

    /// Linear search for a package by id.
    pub fn find_package(&self, id: &str) -> Option<&Package> {
        self.package_items().iter().find(|p| p.id == id)
    }
}

// ============================================================================
// Shared Items
// ============================================================================

/// A navigation entry (`{href, label}`), used by header and footer lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    #[serde(default, deserialize_with = "lenient::text")]
    pub href: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// Header
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderSection {
    #[serde(default)]
    pub logo: HeaderLogo,
    #[serde(default)]
    pub navigation: Vec<Link>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub book_button: String,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderLogo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subtext: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// Hero
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroSection {
    #[serde(default, deserialize_with = "lenient::text")]
    pub tagline: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title_highlight: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title_suffix: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub main_image: String,
    #[serde(default)]
    pub stats: Vec<HeroStat>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl HeroSection {
    /// Main image URL, falling back to the legacy `image` key.
    pub fn image_url(&self) -> &str {
        if !self.main_image.is_empty() {
            return &self.main_image;
        }
        self.extra
            .get("image")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeroStat {
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub number: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl HeroStat {
    /// Stats such as "Desde 2015" read label-first.
    pub fn is_since(&self) -> bool {
        self.number.contains("Desde")
    }
}

// ============================================================================
// Gallery
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GallerySection {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subtitle: String,
    #[serde(default)]
    pub items: Vec<GalleryItem>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub caption: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// Packages
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackagesSection {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subtitle: String,
    #[serde(default)]
    pub items: Vec<Package>,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// About
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutSection {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(default)]
    pub values: Vec<AboutValue>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutValue {
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub desc: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// Footer
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FooterSection {
    /// Two words, "TEXT SUBTEXT".
    #[serde(default, deserialize_with = "lenient::text")]
    pub logo: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default)]
    pub social: Social,
    #[serde(default)]
    pub destinations: Vec<Link>,
    #[serde(default)]
    pub support: Vec<Link>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub copyright: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl FooterSection {
    /// Split the logo into its text and subtext at the first space.
    pub fn logo_parts(&self) -> (&str, &str) {
        let logo = self.logo.trim();
        logo.split_once(' ')
            .map_or((logo, ""), |(text, sub)| (text, sub.trim_start()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {
    #[serde(default, deserialize_with = "lenient::text")]
    pub instagram: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub facebook: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub whatsapp: String,
    #[serde(flatten)]
    pub extra: Extra,
}

// ============================================================================
// Tests
// ============================================================================

//! `[site]` section configuration.
//!
//! Contains the fixed strings and layout choices of the public pages.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// Structural variant of a list section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Plain grid (default).
    #[default]
    Grid,
    /// Carousel markup; a client-side slider picks it up.
    Slider,
}

/// `[site]` section in enju.toml - public site settings.
///
/// # Example
/// ```toml
/// [site]
/// name = "Enju Tours"
/// whatsapp = "244933412292"
/// gallery_layout = "slider"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Appended to page titles ("Safari - Enju Tours").
    #[serde(default = "defaults::site::name")]
    #[educe(Default = defaults::site::name())]
    pub name: String,

    /// Value of `<html lang>`.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,

    /// Currency label shown next to package prices.
    #[serde(default = "defaults::site::currency")]
    #[educe(Default = defaults::site::currency())]
    pub currency: String,

    /// Phone number (digits only) receiving WhatsApp bookings.
    #[serde(default = "defaults::site::whatsapp")]
    #[educe(Default = defaults::site::whatsapp())]
    pub whatsapp: String,

    /// Admin login page, relative to the site root; the Ctrl+Shift+A shortcut
    /// navigates here.
    #[serde(default = "defaults::site::admin_login")]
    #[educe(Default = defaults::site::admin_login())]
    pub admin_login: String,

    #[serde(default)]
    pub gallery_layout: Layout,

    #[serde(default)]
    pub packages_layout: Layout,
}

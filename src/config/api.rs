//! `[api]` section configuration.
//!
//! Where the content document lives and where the admin token is kept.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[api]` section in enju.toml - content store settings.
///
/// # Example
/// ```toml
/// [api]
/// url = "https://cms.example.com/api"
/// fallback = "content-data.json"
/// state = "~/.config/enju/state.json"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL; `/content`, `/login`, `/upload` and `/upload-video` hang off it.
    #[serde(default = "defaults::api::url")]
    #[educe(Default = defaults::api::url())]
    pub url: String,

    /// Local JSON document read when the API is unreachable.
    #[serde(default = "defaults::api::fallback")]
    #[educe(Default = defaults::api::fallback())]
    pub fallback: PathBuf,

    /// Persisted state file holding the bearer token. `~` is expanded.
    #[serde(default = "defaults::api::state")]
    #[educe(Default = defaults::api::state())]
    pub state: PathBuf,
}

impl ApiConfig {
    /// Join an endpoint onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

//! Client of the remote content store.
//!
//! # Endpoints
//!
//! | Method | Path            | Auth   | Body                     | Reply      |
//! |--------|-----------------|--------|--------------------------|------------|
//! | GET    | `/content`      | -      | -                        | document   |
//! | POST   | `/content`      | bearer | full document (JSON)     | any JSON   |
//! | POST   | `/login`        | -      | `{username, password}`   | `{token}`  |
//! | POST   | `/upload`       | bearer | multipart field `image`  | `{url}`    |
//! | POST   | `/upload-video` | bearer | multipart field `video`  | `{url}`    |
//!
//! Every call is one-shot: no retries and no timeout. When the service cannot
//! produce the document, [`ContentClient::load`] reads the local fallback file.

pub mod token;

use crate::{
    config::{ApiConfig, SiteConfig},
    content::Document,
    log,
    utils::mime::{essence, guess_content_type},
};
use anyhow::Context;
use reqwest::blocking::{
    Client,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use token::{AUTH_KEY, StateFile};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("content service unreachable: {0}")]
    NetworkUnavailable(String),

    #[error("authentication required, run `enju login` first")]
    AuthRequired,

    #[error("save failed: {0}")]
    SaveFailed(String),

    #[error("upload failed: {0}")]
    UploadFailed(String),

    #[error("cannot access state file `{0}`")]
    State(PathBuf, #[source] std::io::Error),
}

impl ClientError {
    fn network(err: reqwest::Error) -> Self {
        Self::NetworkUnavailable(err.to_string())
    }
}

// ============================================================================
// Remote Seam
// ============================================================================

/// The write side of the content store, as seen by the admin editor.
pub trait ContentRemote {
    /// Persist the whole document.
    fn save(&self, document: &Document) -> Result<Value, ClientError>;

    /// Upload an image file and return its hosted URL.
    fn upload_image(&self, file: &Path) -> Result<String, ClientError>;
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    #[serde(default)]
    token: String,
}

#[derive(Deserialize)]
struct UploadReply {
    #[serde(default)]
    url: Option<String>,
}

/// Pull a human-readable message out of an error reply body.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .filter(|msg| !msg.is_empty())
        .map(str::to_owned)
}

// ============================================================================
// Client
// ============================================================================

/// Blocking HTTP client of the content store.
#[derive(Debug, Clone)]
pub struct ContentClient {
    api: ApiConfig,
    state: StateFile,
    http: Client,
}

impl ContentClient {
    pub fn new(api: ApiConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(None::<std::time::Duration>)
            .user_agent(concat!("enju/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            state: StateFile::new(&api.state),
            api,
            http,
        })
    }

    pub fn from_config(config: &SiteConfig) -> anyhow::Result<Self> {
        Self::new(config.api.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        self.api.endpoint(path)
    }

    // ------------------------------------------------------------------------
    // Read side
    // ------------------------------------------------------------------------

    /// Fetch the document, falling back to the static file.
    ///
    /// Returns `None` when neither source yields a document; callers render
    /// nothing in that case.
    pub fn load(&self) -> Option<Document> {
        match self.fetch() {
            Ok(document) => return Some(document),
            Err(err) => {
                log!("content"; "{err}; using {}", self.api.fallback.display());
            }
        }

        match read_document(&self.api.fallback) {
            Ok(document) => Some(document),
            Err(err) => {
                log!("error"; "no content available: {err:#}");
                None
            }
        }
    }

    fn fetch(&self) -> Result<Document, ClientError> {
        let response = self
            .http
            .get(self.endpoint("content"))
            .send()
            .map_err(ClientError::network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::NetworkUnavailable(format!(
                "GET /content returned {status}"
            )));
        }

        response.json::<Document>().map_err(|err| {
            ClientError::NetworkUnavailable(format!("undecodable content document: {err}"))
        })
    }

    // ------------------------------------------------------------------------
    // Write side
    // ------------------------------------------------------------------------

    /// Replace the remote document with `document`.
    pub fn save(&self, document: &Document) -> Result<Value, ClientError> {
        let token = self.require_token()?;

        let response = self
            .http
            .post(self.endpoint("content"))
            .bearer_auth(token)
            .json(document)
            .send()
            .map_err(ClientError::network)?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            let detail = server_message(&body).unwrap_or_else(|| format!("server responded {status}"));
            return Err(ClientError::SaveFailed(detail));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }

    pub fn upload_image(&self, file: &Path) -> Result<String, ClientError> {
        self.upload("upload", "image", file)
    }

    pub fn upload_video(&self, file: &Path) -> Result<String, ClientError> {
        self.upload("upload-video", "video", file)
    }

    fn upload(&self, path: &str, field: &'static str, file: &Path) -> Result<String, ClientError> {
        let token = self.require_token()?;

        let bytes = fs::read(file).map_err(|err| {
            ClientError::UploadFailed(format!("cannot read `{}`: {err}", file.display()))
        })?;
        let file_name = file
            .file_name()
            .map_or_else(|| field.to_owned(), |name| name.to_string_lossy().into_owned());
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(essence(guess_content_type(file)))
            .map_err(|err| ClientError::UploadFailed(err.to_string()))?;

        let response = self
            .http
            .post(self.endpoint(path))
            .bearer_auth(token)
            .multipart(Form::new().part(field, part))
            .send()
            .map_err(ClientError::network)?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if !status.is_success() {
            let detail = server_message(&body).unwrap_or_else(|| "server error".to_owned());
            return Err(ClientError::UploadFailed(detail));
        }

        serde_json::from_str::<UploadReply>(&body)
            .ok()
            .and_then(|reply| reply.url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| ClientError::UploadFailed("reply carried no url".to_owned()))
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    /// Exchange credentials for a token and persist it.
    ///
    /// Rejections and connection failures return `false`.
    pub fn login(&self, username: &str, password: &str) -> bool {
        let response = match self
            .http
            .post(self.endpoint("login"))
            .json(&LoginRequest { username, password })
            .send()
        {
            Ok(response) => response,
            Err(err) => {
                log!("auth"; "connection error while logging in: {err}");
                return false;
            }
        };

        if !response.status().is_success() {
            return false;
        }

        let token = match response.json::<LoginReply>() {
            Ok(reply) if !reply.token.is_empty() => reply.token,
            _ => return false,
        };

        match self.state.set(AUTH_KEY, &token) {
            Ok(()) => true,
            Err(err) => {
                log!("auth"; "{err}");
                false
            }
        }
    }

    /// Forget the stored token.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.state.remove(AUTH_KEY).map(|_| ())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    fn token(&self) -> Option<String> {
        self.state
            .get(AUTH_KEY)
            .ok()
            .flatten()
            .filter(|token| !token.is_empty())
    }

    fn require_token(&self) -> Result<String, ClientError> {
        self.token().ok_or(ClientError::AuthRequired)
    }
}

impl ContentRemote for ContentClient {
    fn save(&self, document: &Document) -> Result<Value, ClientError> {
        ContentClient::save(self, document)
    }

    fn upload_image(&self, file: &Path) -> Result<String, ClientError> {
        ContentClient::upload_image(self, file)
    }
}

/// Read and parse a document from a local JSON file.
pub fn read_document(path: &Path) -> anyhow::Result<Document> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Document::from_json(&text).with_context(|| format!("Invalid content in {}", path.display()))
}

// ============================================================================
// Tests
// ============================================================================

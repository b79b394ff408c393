//! Persisted client state: a flat JSON object of string keys to string values.
//!
//! The admin bearer token lives under [`AUTH_KEY`]. A missing file and a
//! missing key both mean "logged out".

use super::ClientError;
use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::PathBuf,
};

/// Key of the bearer token.
pub const AUTH_KEY: &str = "enju_token";

#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self.read_all()?.remove(key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_all(&entries)
    }

    /// Remove a key. Returns whether it was present.
    pub fn remove(&self, key: &str) -> Result<bool, ClientError> {
        let mut entries = self.read_all()?;
        let existed = entries.remove(key).is_some();
        if existed {
            self.write_all(&entries)?;
        }
        Ok(existed)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, ClientError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(self.error(err)),
        };
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text)
            .map_err(|err| self.error(io::Error::new(io::ErrorKind::InvalidData, err)))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| self.error(err))?;
        }
        let text = serde_json::to_string_pretty(entries)
            .map_err(|err| self.error(io::Error::new(io::ErrorKind::InvalidData, err)))?;

        // The token must stay readable by the owner only
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        std::os::unix::fs::OpenOptionsExt::mode(&mut options, 0o600);
        let mut file = options.open(&self.path).map_err(|err| self.error(err))?;
        #[cfg(unix)]
        {
            // The mode above only applies to newly created files
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|err| self.error(err))?;
        }
        file.write_all(text.as_bytes()).map_err(|err| self.error(err))
    }

    fn error(&self, err: io::Error) -> ClientError {
        ClientError::State(self.path.clone(), err)
    }
}

//! Expected build-id manifest
//!
//! The manifest is a flat JSON object mapping library basenames to the
//! build-id of the current release:
//!
//! ```json
//! { "libssl.so.3": "a1b2c3...", "libc.so.6": "d4e5f6..." }
//! ```
//!
//! It is fetched fresh on every run and never cached locally.

use log::info;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::{BuildId, ManifestError};

/// Default upstream manifest location
pub const DEFAULT_MANIFEST_URL: &str = "http://patches04.kernelcare.com/userspace.json";

/// Library basename → expected build-id
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: HashMap<String, BuildId>,
}

impl Manifest {
    /// # Errors
    /// Returns an error if `json` is not an object of strings.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Expected build-id for a library basename, if the manifest tracks it
    #[must_use]
    pub fn expected(&self, basename: &str) -> Option<&BuildId> {
        self.entries.get(basename)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, BuildId)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, BuildId)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Where the manifest comes from
pub trait ManifestSource {
    /// # Errors
    /// Any failure is fatal to the run; there is no partial manifest.
    fn fetch(&self) -> Result<Manifest, ManifestError>;
}

/// Manifest served over HTTP
#[derive(Debug, Clone)]
pub struct HttpManifest {
    pub url: String,
    pub timeout: Duration,
}

impl HttpManifest {
    #[must_use]
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self { url: url.into(), timeout }
    }

    fn fetch_error(&self, source: reqwest::Error) -> ManifestError {
        ManifestError::Fetch { url: self.url.clone(), source }
    }
}

impl ManifestSource for HttpManifest {
    fn fetch(&self) -> Result<Manifest, ManifestError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.fetch_error(e))?;

        let body = client
            .get(&self.url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .and_then(reqwest::blocking::Response::text)
            .map_err(|e| self.fetch_error(e))?;

        let manifest = Manifest::from_json(&body)?;
        info!("Loaded manifest from {} ({} libraries)", self.url, manifest.len());
        Ok(manifest)
    }
}

/// Manifest read from a local JSON file
#[derive(Debug, Clone)]
pub struct FileManifest {
    pub path: PathBuf,
}

impl ManifestSource for FileManifest {
    fn fetch(&self) -> Result<Manifest, ManifestError> {
        let body = fs::read_to_string(&self.path).map_err(|source| ManifestError::ReadFile {
            path: self.path.display().to_string(),
            source,
        })?;
        let manifest = Manifest::from_json(&body)?;
        info!("Loaded manifest from {} ({} libraries)", self.path.display(), manifest.len());
        Ok(manifest)
    }
}

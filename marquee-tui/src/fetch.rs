use std::path::PathBuf;
use std::time::Duration;

use marquee_core::manifest::DEFAULT_TITLE;
use marquee_core::{CatalogEntry, Manifest, ManifestError};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestSource {
    Url(String),
    File(PathBuf),
}

impl ManifestSource {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            ManifestSource::Url(s.to_string())
        } else {
            ManifestSource::File(PathBuf::from(s.strip_prefix("file://").unwrap_or(s)))
        }
    }
}

impl std::fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestSource::Url(u) => f.write_str(u),
            ManifestSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

pub fn fetch_manifest(source: &ManifestSource) -> Result<Manifest, ManifestError> {
    match source {
        ManifestSource::Url(url) => {
            let client = reqwest::blocking::Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .map_err(|e| ManifestError::http(e.to_string()))?;
            let resp = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .map_err(|e| ManifestError::http(e.to_string()))?;
            let bytes = resp.bytes().map_err(|e| ManifestError::http(e.to_string()))?;
            Manifest::from_slice(&bytes)
        }
        ManifestSource::File(path) => {
            let file = std::fs::File::open(path)?;
            Manifest::from_reader(std::io::BufReader::new(file))
        }
    }
}

/// Title and entries for the grid. Failures are logged and leave the
/// catalog empty; there is no retry.
pub fn load_catalog(source: &ManifestSource) -> (String, Option<Vec<CatalogEntry>>) {
    match fetch_manifest(source) {
        Ok(m) => {
            tracing::info!(%source, items = m.len(), "manifest loaded");
            (m.title().to_string(), Some(m.into_entries()))
        }
        Err(e) => {
            tracing::error!(%source, error = %e, "manifest unavailable; grid stays empty");
            (DEFAULT_TITLE.to_string(), None)
        }
    }
}

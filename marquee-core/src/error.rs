use thiserror::Error;

/// Integrity violations inside the catalog store.
///
/// These indicate a broken caller (a stale or invented index, a second
/// population of the catalog) and are always propagated, never absorbed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog already initialized")]
    AlreadyInitialized,
    #[error("catalog index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Failures while obtaining or decoding the remote manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest request failed: {0}")]
    Http(String),
    #[error("manifest read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("manifest is not valid JSON of the expected shape: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ManifestError {
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

use std::path::{Path, PathBuf};

/// What the grid knows about a poster once its item is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterInfo {
    /// Remote resource; the terminal only shows the reference.
    Remote(String),
    /// Local file with its pixel size, if it could be decoded.
    Local {
        path: PathBuf,
        dimensions: Option<(u32, u32)>,
    },
}

impl PosterInfo {
    pub fn describe(&self) -> String {
        match self {
            PosterInfo::Remote(url) => url.clone(),
            PosterInfo::Local { path, dimensions: Some((w, h)) } => {
                format!("{} ({}x{})", path.display(), w, h)
            }
            PosterInfo::Local { path, dimensions: None } => {
                format!("{} (unreadable)", path.display())
            }
        }
    }
}

fn is_remote(asset_root: &str) -> bool {
    asset_root.starts_with("http://") || asset_root.starts_with("https://")
}

/// Resolve a loaded item's resource. Local posters are read once to get
/// their size; failures are logged and not retried.
pub fn probe(resource: &str, asset_root: &str) -> PosterInfo {
    if is_remote(asset_root) {
        return PosterInfo::Remote(resource.to_string());
    }
    let path = Path::new(resource).to_path_buf();
    let dimensions = match image::image_dimensions(&path) {
        Ok(d) => Some(d),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "poster could not be read");
            None
        }
    };
    PosterInfo::Local { path, dimensions }
}

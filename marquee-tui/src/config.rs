use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MANIFEST: &str = "https://test.create.diagnal.com/data/page1.json";
pub const DEFAULT_ASSET_ROOT: &str = "https://test.create.diagnal.com";
pub const DEFAULT_COLUMNS: u16 = 3;
pub const DEFAULT_TILE_HEIGHT: u16 = 6;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    pub manifest: Option<Manifest>,
    pub assets: Option<Assets>,
    pub grid: Option<Grid>,
    pub tui: Option<Tui>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    /// http(s) URL or local file path of the catalog manifest
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Assets {
    /// URL prefix or local directory holding `images/`
    pub root: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Grid {
    pub columns: Option<u16>,
    /// Tile height in terminal rows
    pub tile_height: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Tui {
    /// Whether to use the alternate screen
    pub alt_screen: Option<bool>,
    /// Header border color while the grid is at the top
    pub header_fg: Option<String>,
    /// Header border color once scrolled (name, #rrggbb or rgb(r,g,b))
    pub header_scrolled_fg: Option<String>,
    pub border_fg: Option<String>,
    pub loaded_fg: Option<String>,
    pub help_fg: Option<String>,
}

/// Effective values after applying CLI overrides on top of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub manifest: String,
    pub asset_root: String,
    pub columns: u16,
    pub tile_height: u16,
    pub alt_screen: bool,
}

impl Settings {
    pub fn resolve(
        &self,
        manifest: Option<String>,
        assets: Option<String>,
        columns: Option<u16>,
    ) -> Resolved {
        let non_empty = |s: &String| !s.trim().is_empty();
        let positive = |c: &u16| *c > 0;
        Resolved {
            manifest: manifest
                .filter(non_empty)
                .or_else(|| {
                    self.manifest
                        .as_ref()
                        .and_then(|m| m.source.clone())
                        .filter(non_empty)
                })
                .unwrap_or_else(|| DEFAULT_MANIFEST.to_string()),
            asset_root: assets
                .filter(non_empty)
                .or_else(|| {
                    self.assets
                        .as_ref()
                        .and_then(|a| a.root.clone())
                        .filter(non_empty)
                })
                .map(|s| shell_tilde(&s))
                .unwrap_or_else(|| DEFAULT_ASSET_ROOT.to_string()),
            columns: columns
                .filter(positive)
                .or_else(|| self.grid.as_ref().and_then(|g| g.columns).filter(positive))
                .unwrap_or(DEFAULT_COLUMNS),
            tile_height: self
                .grid
                .as_ref()
                .and_then(|g| g.tile_height)
                .filter(|h| *h >= 3)
                .unwrap_or(DEFAULT_TILE_HEIGHT),
            alt_screen: self
                .tui
                .as_ref()
                .and_then(|t| t.alt_screen)
                .unwrap_or(true),
        }
    }
}

fn shell_tilde(s: &str) -> String {
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(bd) = directories::BaseDirs::new() {
            return bd.home_dir().join(rest).to_string_lossy().into_owned();
        }
    }
    s.to_string()
}

pub fn config_dir() -> PathBuf {
    if let Some(bd) = directories::BaseDirs::new() {
        bd.config_dir().join("marquee")
    } else {
        PathBuf::from("./.config/marquee")
    }
}

pub fn state_dir() -> PathBuf {
    // Prefer XDG state dir when available; fall back to config dir
    if let Some(bd) = directories::BaseDirs::new() {
        if let Some(sd) = bd.state_dir() {
            return sd.join("marquee");
        }
    }
    config_dir()
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.toml")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    match std::fs::read_to_string(&path) {
        Ok(s) => toml::from_str(&s).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            Settings::default()
        }),
        Err(_) => Settings::default(),
    }
}

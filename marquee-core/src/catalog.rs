//! Catalog items and the index-addressed store that owns their load state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::manifest::poster_url;

/// One manifest entry before it enters the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub poster_path: String,
}

impl CatalogEntry {
    pub fn new<N: Into<String>, P: Into<String>>(name: N, poster_path: P) -> Self {
        Self {
            name: name.into(),
            poster_path: poster_path.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub poster_path: String,
    /// Set once the poster may be requested. Never cleared.
    pub loaded: bool,
}

impl CatalogItem {
    /// Poster resource to hand to the renderer, or `None` while the item is
    /// still waiting for visibility. No placeholder is produced.
    pub fn resource(&self, asset_root: &str) -> Option<String> {
        self.loaded.then(|| poster_url(asset_root, &self.poster_path))
    }
}

impl From<CatalogEntry> for CatalogItem {
    fn from(e: CatalogEntry) -> Self {
        Self {
            name: e.name,
            poster_path: e.poster_path,
            loaded: false,
        }
    }
}

/// Change notification emitted by [`CatalogStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogChange {
    Initialized { len: usize },
    Loaded(usize),
}

type Listener = Box<dyn FnMut(&CatalogChange)>;

/// Ordered catalog, populated once. Positions never move after
/// [`CatalogStore::initialize`]; `loaded` flags are flipped in place.
#[derive(Default)]
pub struct CatalogStore {
    items: Vec<CatalogItem>,
    initialized: bool,
    revision: u64,
    listeners: Vec<Listener>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize<I>(&mut self, entries: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        if self.initialized {
            return Err(CatalogError::AlreadyInitialized);
        }
        self.items = entries.into_iter().map(CatalogItem::from).collect();
        self.initialized = true;
        info!(items = self.items.len(), "catalog populated");
        self.emit(CatalogChange::Initialized {
            len: self.items.len(),
        });
        Ok(())
    }

    /// Flip `loaded` for `index`. Returns `Ok(false)` when the item was
    /// already loaded.
    pub(crate) fn mark_loaded(&mut self, index: usize) -> Result<bool, CatalogError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(CatalogError::IndexOutOfRange { index, len })?;
        if item.loaded {
            return Ok(false);
        }
        item.loaded = true;
        debug!(index, name = %item.name, "poster authorized");
        self.emit(CatalogChange::Loaded(index));
        Ok(true)
    }

    pub fn snapshot(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn loaded_count(&self) -> usize {
        self.items.iter().filter(|i| i.loaded).count()
    }

    /// Bumped on every emitted change; views compare it to decide whether
    /// to re-derive.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn on_change<F>(&mut self, listener: F)
    where
        F: FnMut(&CatalogChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    fn emit(&mut self, change: CatalogChange) {
        self.revision += 1;
        for l in self.listeners.iter_mut() {
            l(&change);
        }
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("items", &self.items.len())
            .field("initialized", &self.initialized)
            .field("revision", &self.revision)
            .finish()
    }
}

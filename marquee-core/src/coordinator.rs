//! Lazy-load coordinator: the only writer of `loaded`.
//!
//! Per catalog index the lifecycle is `Unregistered -> Observing -> Loaded`.
//! Elements are tracked by [`ElementHandle`], with the catalog index taken
//! from the element's own tag at registration time. Nothing here looks at
//! where an element sits in the rendered (filtered) list.

use std::collections::HashMap;

use tracing::debug;

use crate::catalog::{CatalogChange, CatalogEntry, CatalogStore};
use crate::error::CatalogError;
use crate::visibility::{ElementHandle, VisibilityObserver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Unregistered,
    Observing(ElementHandle),
    Loaded,
}

pub struct LazyLoadCoordinator<O: VisibilityObserver> {
    store: CatalogStore,
    observer: O,
    by_handle: HashMap<ElementHandle, usize>,
    by_index: HashMap<usize, ElementHandle>,
}

impl<O: VisibilityObserver> LazyLoadCoordinator<O> {
    pub fn new(observer: O) -> Self {
        Self::with_store(CatalogStore::new(), observer)
    }

    pub fn with_store(store: CatalogStore, observer: O) -> Self {
        Self {
            store,
            observer,
            by_handle: HashMap::new(),
            by_index: HashMap::new(),
        }
    }

    pub fn initialize_catalog<I>(&mut self, entries: I) -> Result<(), CatalogError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        self.store.initialize(entries)
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Listener registration is the one store mutation exposed here; it
    /// cannot touch load state.
    pub fn on_catalog_change<F>(&mut self, listener: F)
    where
        F: FnMut(&CatalogChange) + 'static,
    {
        self.store.on_change(listener);
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn subscription_count(&self) -> usize {
        self.by_handle.len()
    }

    pub fn state(&self, index: usize) -> Option<TileState> {
        let item = self.store.get(index)?;
        if item.loaded {
            return Some(TileState::Loaded);
        }
        Some(match self.by_index.get(&index) {
            Some(h) => TileState::Observing(*h),
            None => TileState::Unregistered,
        })
    }

    /// Start watching `handle` for the item at `index`.
    ///
    /// Returns `Ok(true)` when a new observation was started. Loaded items
    /// and repeat registrations of the same handle are no-ops. A different
    /// handle for an index that is already observing replaces the old one.
    pub fn register(&mut self, index: usize, handle: ElementHandle) -> Result<bool, CatalogError> {
        let len = self.store.len();
        let item = self
            .store
            .get(index)
            .ok_or(CatalogError::IndexOutOfRange { index, len })?;
        if item.loaded {
            debug!(index, %handle, "register ignored: already loaded");
            return Ok(false);
        }

        match self.by_index.get(&index).copied() {
            Some(current) if current == handle => return Ok(false),
            Some(previous) => {
                debug!(index, %previous, %handle, "element replaced");
                self.observer.unobserve(previous);
                self.by_handle.remove(&previous);
            }
            None => {}
        }
        if let Some(stale_index) = self.by_handle.insert(handle, index) {
            // handle was tagged with another index before; that binding is gone
            self.by_index.remove(&stale_index);
        }
        self.by_index.insert(index, handle);
        self.observer.observe(handle);
        debug!(index, %handle, "observing");
        Ok(true)
    }

    /// Visibility notification for one element. Unknown handles are an
    /// expected race with [`Self::withdraw`] and are ignored.
    ///
    /// Returns `Ok(true)` when the item transitioned to loaded.
    pub fn on_intersect(&mut self, handle: ElementHandle) -> Result<bool, CatalogError> {
        let Some(index) = self.by_handle.get(&handle).copied() else {
            debug!(%handle, "intersection for unknown element ignored");
            return Ok(false);
        };
        // the observer has already reported this handle; release it either way
        self.observer.unobserve(handle);
        self.by_handle.remove(&handle);
        self.by_index.remove(&index);
        self.store.mark_loaded(index)
    }

    /// Process one notification batch. Each handle is handled on its own,
    /// so a failure does not strand the rest of the batch: every handle is
    /// processed and the first error is returned afterwards. On success the
    /// result lists the indices that became loaded, in batch order.
    pub fn on_intersect_batch<I>(&mut self, handles: I) -> Result<Vec<usize>, CatalogError>
    where
        I: IntoIterator<Item = ElementHandle>,
    {
        let mut loaded = Vec::new();
        let mut first_err = None;
        for h in handles {
            let index = self.by_handle.get(&h).copied();
            match self.on_intersect(h) {
                Ok(true) => loaded.extend(index),
                Ok(false) => {}
                Err(e) => {
                    debug!(%h, error = %e, "intersection failed");
                    if first_err.is_none() {
                        first_err = Some(e);
                    }
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(loaded),
        }
    }

    /// The renderer discarded `handle`; stop observing without loading.
    pub fn withdraw(&mut self, handle: ElementHandle) {
        let Some(index) = self.by_handle.remove(&handle) else {
            debug!(%handle, "withdraw for unknown element ignored");
            return;
        };
        self.by_index.remove(&index);
        self.observer.unobserve(handle);
        debug!(index, %handle, "withdrawn");
    }

    pub fn teardown(&mut self) {
        self.observer.dispose_all();
        self.by_handle.clear();
        self.by_index.clear();
    }
}

impl<O: VisibilityObserver> Drop for LazyLoadCoordinator<O> {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl<O: VisibilityObserver> std::fmt::Debug for LazyLoadCoordinator<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyLoadCoordinator")
            .field("store", &self.store)
            .field("subscriptions", &self.by_handle.len())
            .finish()
    }
}

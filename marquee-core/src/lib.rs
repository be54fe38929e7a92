//! marquee-core: catalog model, visibility boundary, and the lazy-load
//! coordinator that decides when a poster may be fetched.

pub mod catalog;
pub mod coordinator;
pub mod error;
pub mod filter;
pub mod manifest;
pub mod visibility;

pub use catalog::{CatalogChange, CatalogEntry, CatalogItem, CatalogStore};
pub use coordinator::{LazyLoadCoordinator, TileState};
pub use error::{CatalogError, ManifestError};
pub use manifest::{poster_url, Manifest};
pub use visibility::{
    ElementHandle, HandleAllocator, ManualObserver, Rect, ViewportObserver, VisibilityObserver,
    VISIBILITY_THRESHOLD,
};

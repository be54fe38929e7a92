//! Boundary between the coordinator and whatever decides that an element is
//! on screen.
//!
//! Observers do not call back into the coordinator. They queue the handles
//! that crossed the threshold and the driver hands each batch to
//! [`crate::LazyLoadCoordinator::on_intersect_batch`]. A handle is reported at
//! most once per `observe` call: reporting removes it from the pending set.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Fraction of an element's area that must be inside the viewport before it
/// counts as visible. The viewport is used as-is (no root margin).
pub const VISIBILITY_THRESHOLD: f64 = 0.1;

/// Stable identity of one rendered element. Minted by the renderer, never
/// derived from the element's position in the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(u64);

impl ElementHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Hands out fresh, never-reused handles.
#[derive(Debug, Default)]
pub struct HandleAllocator {
    next: u64,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_handle(&mut self) -> ElementHandle {
        let h = ElementHandle(self.next);
        self.next += 1;
        h
    }
}

/// Axis-aligned rectangle in content coordinates (cells for the terminal
/// grid, pixels elsewhere).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x as u64 + self.width as u64).min(other.x as u64 + other.width as u64);
        let y1 = (self.y as u64 + self.height as u64).min(other.y as u64 + other.height as u64);
        if x1 <= x0 as u64 || y1 <= y0 as u64 {
            return None;
        }
        Some(Rect::new(x0, y0, (x1 - x0 as u64) as u32, (y1 - y0 as u64) as u32))
    }

    /// Share of `self` lying inside `viewport`, in `0.0..=1.0`.
    pub fn visible_fraction(&self, viewport: &Rect) -> f64 {
        let total = self.area();
        if total == 0 {
            return 0.0;
        }
        self.intersection(viewport)
            .map(|r| r.area() as f64 / total as f64)
            .unwrap_or(0.0)
    }
}

/// "Tell me when this element becomes visible." One instance is shared by
/// every tile of a grid.
pub trait VisibilityObserver {
    fn observe(&mut self, handle: ElementHandle);
    /// Idempotent; unknown or already-reported handles are ignored.
    fn unobserve(&mut self, handle: ElementHandle);
    fn dispose_all(&mut self);
    fn is_observing(&self, handle: ElementHandle) -> bool;
    fn observed_count(&self) -> usize;
}

/// Geometry-driven observer: reports pending elements whose bounds overlap
/// the viewport by at least [`VISIBILITY_THRESHOLD`].
#[derive(Debug, Default)]
pub struct ViewportObserver {
    viewport: Rect,
    pending: BTreeSet<ElementHandle>,
    bounds: HashMap<ElementHandle, Rect>,
}

impl ViewportObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Record where an observed element currently sits. Bounds are only
    /// kept for observed handles; call after `observe`.
    pub fn set_bounds(&mut self, handle: ElementHandle, bounds: Rect) {
        if self.pending.contains(&handle) {
            self.bounds.insert(handle, bounds);
        }
    }

    /// Drain the handles that are currently visible enough. Elements whose
    /// bounds were never reported are skipped.
    pub fn take_intersections(&mut self) -> Vec<ElementHandle> {
        let viewport = self.viewport;
        let hits: Vec<ElementHandle> = self
            .pending
            .iter()
            .copied()
            .filter(|h| {
                self.bounds
                    .get(h)
                    .map(|b| b.visible_fraction(&viewport) >= VISIBILITY_THRESHOLD)
                    .unwrap_or(false)
            })
            .collect();
        for h in &hits {
            self.pending.remove(h);
            self.bounds.remove(h);
        }
        hits
    }
}

impl VisibilityObserver for ViewportObserver {
    fn observe(&mut self, handle: ElementHandle) {
        self.pending.insert(handle);
    }

    fn unobserve(&mut self, handle: ElementHandle) {
        self.pending.remove(&handle);
        self.bounds.remove(&handle);
    }

    fn dispose_all(&mut self) {
        self.pending.clear();
        self.bounds.clear();
    }

    fn is_observing(&self, handle: ElementHandle) -> bool {
        self.pending.contains(&handle)
    }

    fn observed_count(&self) -> usize {
        self.pending.len()
    }
}

/// Observer whose notifications are fired by hand, in whatever order the
/// caller picks. Records every call it receives.
#[derive(Debug, Default)]
pub struct ManualObserver {
    pending: BTreeSet<ElementHandle>,
    observed: Vec<ElementHandle>,
    unobserved: Vec<ElementHandle>,
    disposals: usize,
}

impl ManualObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate one notification batch. Returns the subset of `handles`
    /// that were still pending, in the given order, and stops observing
    /// them.
    pub fn fire(&mut self, handles: &[ElementHandle]) -> Vec<ElementHandle> {
        handles
            .iter()
            .copied()
            .filter(|h| self.pending.remove(h))
            .collect()
    }

    pub fn fire_all(&mut self) -> Vec<ElementHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    /// Every handle passed to `observe`, duplicates included.
    pub fn observe_calls(&self) -> &[ElementHandle] {
        &self.observed
    }

    pub fn unobserve_calls(&self) -> &[ElementHandle] {
        &self.unobserved
    }

    pub fn disposals(&self) -> usize {
        self.disposals
    }
}

impl VisibilityObserver for ManualObserver {
    fn observe(&mut self, handle: ElementHandle) {
        self.observed.push(handle);
        self.pending.insert(handle);
    }

    fn unobserve(&mut self, handle: ElementHandle) {
        self.unobserved.push(handle);
        self.pending.remove(&handle);
    }

    fn dispose_all(&mut self) {
        self.disposals += 1;
        self.pending.clear();
    }

    fn is_observing(&self, handle: ElementHandle) -> bool {
        self.pending.contains(&handle)
    }

    fn observed_count(&self) -> usize {
        self.pending.len()
    }
}

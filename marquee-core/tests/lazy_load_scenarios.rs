use marquee_core::{
    filter, CatalogEntry, ElementHandle, LazyLoadCoordinator, ManualObserver, TileState,
    VisibilityObserver,
};

fn romcoms() -> LazyLoadCoordinator<ManualObserver> {
    let mut c = LazyLoadCoordinator::new(ManualObserver::new());
    c.initialize_catalog(vec![
        CatalogEntry::new("Notting Hill", "a.jpg"),
        CatalogEntry::new("Big Fat Greek Wedding", "b.jpg"),
    ])
    .expect("catalog");
    c
}

#[test]
fn intersect_loads_only_the_observed_item() {
    let mut c = romcoms();
    let h0 = ElementHandle::new(0);
    c.register(0, h0).unwrap();

    let fired = c.observer_mut().fire(&[h0]);
    let loaded = c.on_intersect_batch(fired).unwrap();

    assert_eq!(loaded, vec![0]);
    assert!(c.store().get(0).unwrap().loaded);
    assert!(!c.store().get(1).unwrap().loaded);
    assert_eq!(c.observer().unobserve_calls(), &[h0]);
    assert!(!c.observer().is_observing(h0));
}

#[test]
fn loaded_item_is_never_observed_again() {
    let mut c = romcoms();
    let h0 = ElementHandle::new(0);
    c.register(0, h0).unwrap();
    c.on_intersect(h0).unwrap();

    // renderer produces a fresh element for the same tile
    let h0b = ElementHandle::new(10);
    assert!(!c.register(0, h0b).unwrap());
    assert_eq!(c.observer().observe_calls(), &[h0]);
    assert_eq!(c.state(0), Some(TileState::Loaded));
}

#[test]
fn second_intersect_for_same_handle_is_ignored() {
    let mut c = romcoms();
    let h0 = ElementHandle::new(0);
    c.register(0, h0).unwrap();
    assert!(c.on_intersect(h0).unwrap());
    let revision = c.store().revision();

    assert!(!c.on_intersect(h0).unwrap());
    assert_eq!(c.store().revision(), revision);
    assert_eq!(c.observer().unobserve_calls().len(), 1);
}

#[test]
fn stray_intersect_after_withdraw_keeps_item_unloaded() {
    let mut c = romcoms();
    let h1 = ElementHandle::new(1);
    c.register(1, h1).unwrap();
    assert_eq!(c.state(1), Some(TileState::Observing(h1)));

    c.withdraw(h1);
    assert_eq!(c.state(1), Some(TileState::Unregistered));

    assert!(!c.on_intersect(h1).unwrap());
    assert!(!c.store().get(1).unwrap().loaded);
    // withdrawing again is harmless
    c.withdraw(h1);
}

#[test]
fn batch_order_does_not_matter() {
    let handles: Vec<ElementHandle> = (0..4).map(ElementHandle::new).collect();
    let entries: Vec<CatalogEntry> = (0..4)
        .map(|i| CatalogEntry::new(format!("title {i}"), format!("{i}.jpg")))
        .collect();

    let mut forward = LazyLoadCoordinator::new(ManualObserver::new());
    forward.initialize_catalog(entries.clone()).unwrap();
    let mut backward = LazyLoadCoordinator::new(ManualObserver::new());
    backward.initialize_catalog(entries).unwrap();
    for (i, h) in handles.iter().enumerate() {
        forward.register(i, *h).unwrap();
        backward.register(i, *h).unwrap();
    }

    // duplicates inside one batch are processed independently too
    let mut f = forward.on_intersect_batch([handles[0], handles[2], handles[0]]).unwrap();
    let mut b = backward.on_intersect_batch([handles[2], handles[0]]).unwrap();
    f.sort();
    b.sort();
    assert_eq!(f, b);
    assert_eq!(forward.store().snapshot(), backward.store().snapshot());
    assert_eq!(forward.subscription_count(), 2);
}

#[test]
fn filtering_resolves_by_tag_not_by_rendered_position() {
    let mut c = romcoms();

    // search "big": the only rendered tile is at position 0 but carries index 1
    let view: Vec<usize> = filter::apply("big", c.store().snapshot())
        .into_iter()
        .map(|(i, _)| i)
        .collect();
    assert_eq!(view, vec![1]);
    let tile = ElementHandle::new(42);
    c.register(view[0], tile).unwrap();
    c.on_intersect(tile).unwrap();

    assert!(c.store().get(1).unwrap().loaded);
    assert!(!c.store().get(0).unwrap().loaded);
}

#[test]
fn filtered_out_then_back_in_reobserves_unloaded_items() {
    let mut c = romcoms();
    let first = ElementHandle::new(0);
    c.register(0, first).unwrap();
    c.withdraw(first);

    let second = ElementHandle::new(1);
    assert!(c.register(0, second).unwrap());
    assert!(c.observer().is_observing(second));
    assert!(!c.observer().is_observing(first));
}

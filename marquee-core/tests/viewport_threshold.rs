use marquee_core::{
    CatalogEntry, ElementHandle, LazyLoadCoordinator, Rect, ViewportObserver, VisibilityObserver,
};

#[test]
fn ten_percent_is_enough_nine_is_not() {
    let mut obs = ViewportObserver::new();
    let nine = ElementHandle::new(1);
    let ten = ElementHandle::new(2);
    obs.observe(nine);
    obs.observe(ten);
    obs.set_viewport(Rect::new(0, 0, 10, 100));
    obs.set_bounds(nine, Rect::new(0, 91, 10, 100)); // 9 rows visible
    obs.set_bounds(ten, Rect::new(0, 90, 10, 100)); // 10 rows visible

    assert_eq!(obs.take_intersections(), vec![ten]);
    assert!(obs.is_observing(nine));
    assert!(!obs.is_observing(ten));
}

#[test]
fn element_is_reported_once_per_observe() {
    let mut obs = ViewportObserver::new();
    let h = ElementHandle::new(1);
    obs.observe(h);
    obs.set_viewport(Rect::new(0, 0, 10, 10));
    obs.set_bounds(h, Rect::new(0, 0, 10, 10));
    assert_eq!(obs.take_intersections(), vec![h]);
    obs.set_bounds(h, Rect::new(0, 0, 10, 10));
    assert!(obs.take_intersections().is_empty());
}

#[test]
fn scrolling_brings_tiles_into_view() {
    let mut c = LazyLoadCoordinator::new(ViewportObserver::new());
    c.initialize_catalog((0..6).map(|i| CatalogEntry::new(format!("t{i}"), format!("{i}.jpg"))))
        .unwrap();

    // one column, tiles 5 rows tall, viewport 10 rows
    let handles: Vec<ElementHandle> = (0..6).map(|i| ElementHandle::new(100 + i)).collect();
    for (i, h) in handles.iter().enumerate() {
        c.register(i, *h).unwrap();
    }
    let place = |c: &mut LazyLoadCoordinator<ViewportObserver>, scroll: u32| {
        let obs = c.observer_mut();
        obs.set_viewport(Rect::new(0, scroll, 20, 10));
        for (i, h) in handles.iter().enumerate() {
            obs.set_bounds(*h, Rect::new(0, i as u32 * 5, 20, 5));
        }
        let hits = obs.take_intersections();
        c.on_intersect_batch(hits).unwrap()
    };

    let mut first = place(&mut c, 0);
    first.sort();
    assert_eq!(first, vec![0, 1]);

    let mut next = place(&mut c, 12);
    next.sort();
    // rows 12..22: tile 2 has 3/5 visible, tile 3 fully, tile 4 2/5
    assert_eq!(next, vec![2, 3, 4]);
    assert!(!c.store().get(5).unwrap().loaded);
    assert_eq!(c.subscription_count(), 1);
}

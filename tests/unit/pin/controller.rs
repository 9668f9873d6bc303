use super::*;
use crate::foundation::core::{Rect, Viewport};

fn setup() -> (Document, ElementId, PinController, ZoneId) {
    let mut doc = Document::new(Viewport::new(1280.0, 800.0).unwrap(), 4000.0);
    let panel = doc.insert("panel", Rect::new(0.0, 1000.0, 1280.0, 1800.0));
    let mut pins = PinController::new();
    let zone = ZoneId(1);
    pins.add(
        zone,
        panel,
        ZoneWindow {
            start: 1000.0,
            end: 2000.0,
        },
        false,
        &mut doc,
    )
    .unwrap();
    (doc, panel, pins, zone)
}

#[test]
fn pin_engagement_keeps_scroll_height() {
    let (mut doc, panel, mut pins, zone) = setup();
    let before = doc.scroll_height();
    assert!(pins.pin(zone, &mut doc).unwrap());
    assert_eq!(pins.state(zone), Some(PinState::Pinned));
    let placeholders: Vec<_> = doc.placeholders().map(|(_, p)| *p).collect();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].height, 800.0);
    assert_eq!(placeholders[0].anchor, panel);
    assert_eq!(doc.scroll_height(), before);

    assert!(pins.unpin(zone, &mut doc).unwrap());
    assert_eq!(doc.placeholders().count(), 0);
    assert_eq!(doc.scroll_height(), before);
    assert_eq!(pins.active(), None);
}

#[test]
fn redundant_pin_and_unpin_are_noops() {
    let (mut doc, _, mut pins, zone) = setup();
    assert!(pins.pin(zone, &mut doc).unwrap());
    assert!(!pins.pin(zone, &mut doc).unwrap());
    assert_eq!(doc.placeholders().count(), 1);
    assert!(pins.unpin(zone, &mut doc).unwrap());
    assert!(!pins.unpin(zone, &mut doc).unwrap());
}

#[test]
fn tick_pins_inside_window_and_unpins_past_distance() {
    let (mut doc, panel, mut pins, zone) = setup();
    assert!(pins.tick(500.0, &mut doc).is_empty());

    let ev = pins.tick(1250.0, &mut doc);
    assert_eq!(
        ev,
        vec![PinEvent {
            zone,
            element: panel,
            pinned: true
        }]
    );
    assert_eq!(doc.layout(panel).unwrap().pin_offset, 250.0);
    assert_eq!(doc.rendered(panel).unwrap().translate.y, 250.0);

    let ev = pins.tick(2500.0, &mut doc);
    assert!(!ev[0].pinned);
    let layout = doc.layout(panel).unwrap();
    assert!(!layout.pinned);
    assert_eq!(layout.pin_offset, 1000.0);
    assert_eq!(doc.placeholders().count(), 0);
}

#[test]
fn resize_while_pinned_recomputes_without_unpinning() {
    let (mut doc, panel, mut pins, zone) = setup();
    pins.tick(1100.0, &mut doc);
    doc.set_rect(panel, Rect::new(0.0, 1000.0, 1280.0, 1600.0));
    pins.update(
        zone,
        ZoneWindow {
            start: 1000.0,
            end: 1500.0,
        },
        &mut doc,
    )
    .unwrap();
    assert_eq!(pins.state(zone), Some(PinState::Pinned));
    assert_eq!(pins.distance(zone), Some(500.0));
    let heights: Vec<f64> = doc.placeholders().map(|(_, p)| p.height).collect();
    assert_eq!(heights, vec![600.0]);
}

#[test]
fn overlapping_regions_are_rejected() {
    let (mut doc, _, mut pins, _) = setup();
    let other = doc.insert("other", Rect::new(0.0, 1500.0, 1280.0, 1900.0));
    let err = pins
        .add(
            ZoneId(2),
            other,
            ZoneWindow {
                start: 1500.0,
                end: 2500.0,
            },
            true,
            &mut doc,
        )
        .unwrap_err();
    assert!(err.is_config());
    assert_eq!(doc.spacing(other), 0.0);
}

#[test]
fn second_region_waits_for_first_to_unpin() {
    let (mut doc, _, mut pins, zone) = setup();
    let other = doc.insert("other", Rect::new(0.0, 2500.0, 1280.0, 2900.0));
    let second = ZoneId(2);
    pins.add(
        second,
        other,
        ZoneWindow {
            start: 2500.0,
            end: 3000.0,
        },
        false,
        &mut doc,
    )
    .unwrap();
    pins.pin(zone, &mut doc).unwrap();
    assert!(!pins.pin(second, &mut doc).unwrap());
    assert_eq!(pins.active(), Some(zone));

    let ev = pins.tick(2600.0, &mut doc);
    assert_eq!(ev.len(), 2);
    assert!(!ev[0].pinned && ev[0].zone == zone);
    assert!(ev[1].pinned && ev[1].zone == second);
}

#[test]
fn remove_leaves_no_spacing_or_placeholder() {
    let mut doc = Document::new(Viewport::new(1280.0, 800.0).unwrap(), 4000.0);
    let panel = doc.insert("panel", Rect::new(0.0, 1000.0, 1280.0, 1800.0));
    let base = doc.scroll_height();
    let mut pins = PinController::new();
    let zone = ZoneId(9);
    pins.add(
        zone,
        panel,
        ZoneWindow {
            start: 1000.0,
            end: 4500.0,
        },
        true,
        &mut doc,
    )
    .unwrap();
    assert_eq!(doc.scroll_height(), base + 3500.0);
    pins.tick(1200.0, &mut doc);
    assert!(pins.remove(zone, &mut doc));
    assert_eq!(doc.scroll_height(), base);
    assert_eq!(doc.layout(panel), Some(LayoutState::default()));
    assert!(!pins.remove(zone, &mut doc));
}

#[test]
fn early_unpin_keeps_reserved_spacing_until_removal() {
    let mut doc = Document::new(Viewport::new(1280.0, 800.0).unwrap(), 4000.0);
    let panel = doc.insert("panel", Rect::new(0.0, 1000.0, 1280.0, 1800.0));
    let mut pins = PinController::new();
    let zone = ZoneId(4);
    let window = ZoneWindow {
        start: 1000.0,
        end: 2000.0,
    };
    pins.add(zone, panel, window, true, &mut doc).unwrap();
    let reserved = doc.scroll_height();

    pins.tick(1500.0, &mut doc);
    assert!(pins.unpin(zone, &mut doc).unwrap());
    assert_eq!(doc.placeholders().count(), 0);
    assert_eq!(doc.spacing(panel), 1000.0);
    assert_eq!(doc.scroll_height(), reserved);

    // Still inside the window: the next tick takes the pin back.
    let ev = pins.tick(1500.0, &mut doc);
    assert_eq!(ev.len(), 1);
    assert!(ev[0].pinned);

    assert!(pins.remove(zone, &mut doc));
    assert_eq!(doc.spacing(panel), 0.0);
    assert_eq!(doc.placeholders().count(), 0);
}

#[test]
fn region_above_is_checked_against_pushed_windows() {
    let (mut doc, panel, mut pins, _) = setup();
    let intro = doc.insert("intro", Rect::new(0.0, 200.0, 1280.0, 600.0));
    pins.add(
        ZoneId(2),
        intro,
        ZoneWindow {
            start: 200.0,
            end: 1200.0,
        },
        true,
        &mut doc,
    )
    .unwrap();
    assert_eq!(pins.len(), 2);
    assert_eq!(doc.layout_top(panel), Some(2000.0));
}

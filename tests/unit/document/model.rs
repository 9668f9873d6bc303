use super::*;

fn doc() -> Document {
    Document::new(Viewport::new(1280.0, 800.0).unwrap(), 4000.0)
}

#[test]
fn scroll_is_clamped_to_content() {
    let mut d = doc();
    assert_eq!(d.max_scroll(), 3200.0);
    assert_eq!(d.set_scroll_y(-5.0), 0.0);
    assert_eq!(d.set_scroll_y(9999.0), 3200.0);
}

#[test]
fn commit_skips_detached_targets() {
    let mut d = doc();
    let a = d.insert("a", Rect::new(0.0, 100.0, 200.0, 300.0));
    let gone = d.insert("gone", Rect::new(0.0, 400.0, 200.0, 500.0));
    assert!(d.remove(gone));

    let mut batch = StyleBatch::new();
    batch.write(a, Property::Opacity, 0.4);
    batch.write(gone, Property::Opacity, 0.9);
    batch.write_parallax(gone, ParallaxOffset::default());
    assert_eq!(batch.len(), 3);

    let skipped = d.commit(batch);
    assert_eq!(skipped.into_iter().collect::<Vec<_>>(), vec![gone]);
    assert_eq!(d.property(a, Property::Opacity), 0.4);
}

#[test]
fn removing_parent_detaches_children() {
    let mut d = doc();
    let p = d.insert("section", Rect::new(0.0, 0.0, 1280.0, 800.0));
    let c = d.insert_child(p, "title", Rect::new(0.0, 10.0, 100.0, 50.0)).unwrap();
    assert!(d.insert_child(ElementId(99), "x", Rect::ZERO).is_err());
    d.remove(p);
    assert!(!d.contains(c));
    assert_eq!(d.find("title"), None);
}

#[test]
fn placeholder_swap_keeps_scroll_height() {
    let mut d = doc();
    let panel = d.insert("panel", Rect::new(0.0, 800.0, 1280.0, 1600.0));
    let before = d.scroll_height();

    d.set_layout(
        panel,
        LayoutState {
            pinned: true,
            pin_offset: 0.0,
        },
    );
    let ph = d.insert_placeholder(panel, 800.0);
    assert_eq!(d.scroll_height(), before);

    d.set_spacing(panel, 500.0);
    assert_eq!(d.scroll_height(), before + 500.0);
    d.set_spacing(panel, 0.0);
    d.remove_placeholder(ph).unwrap();
    d.set_layout(panel, LayoutState::default());
    assert_eq!(d.scroll_height(), before);
    assert!(d.remove_placeholder(ph).is_err());
}

#[test]
fn pin_spacing_pushes_later_elements_only() {
    let mut d = doc();
    let panel = d.insert("panel", Rect::new(0.0, 800.0, 1280.0, 1600.0));
    let inside = d.insert_child(panel, "card", Rect::new(0.0, 900.0, 100.0, 1000.0)).unwrap();
    let above = d.insert("hero", Rect::new(0.0, 0.0, 1280.0, 800.0));
    let below = d.insert("footer", Rect::new(0.0, 1600.0, 1280.0, 2000.0));
    d.set_spacing(panel, 300.0);
    assert_eq!(d.layout_top(above), Some(0.0));
    assert_eq!(d.layout_top(panel), Some(800.0));
    assert_eq!(d.layout_top(inside), Some(900.0));
    assert_eq!(d.layout_top(below), Some(1900.0));
}

#[test]
fn rendered_combines_style_parallax_and_pin_offset() {
    let mut d = doc();
    let panel = d.insert("panel", Rect::new(0.0, 0.0, 200.0, 100.0));
    let child = d.insert_child(panel, "deco", Rect::new(0.0, 0.0, 50.0, 50.0)).unwrap();
    let mut batch = StyleBatch::new();
    batch.write(child, Property::X, 10.0);
    batch.write(child, Property::YPercent, -20.0);
    batch.write(child, Property::Scale, 2.0);
    batch.write_parallax(
        child,
        ParallaxOffset {
            x: 5.0,
            y: 0.0,
            rotate: 15.0,
        },
    );
    d.commit(batch);
    d.set_layout(
        panel,
        LayoutState {
            pinned: true,
            pin_offset: 40.0,
        },
    );

    let r = d.rendered(child).unwrap();
    assert_eq!(r.translate, Vec2::new(15.0, -10.0 + 40.0));
    assert_eq!(r.scale, Vec2::new(2.0, 2.0));
    assert_eq!(r.rotate, 15.0);
    assert!(!r.pinned);
    assert!(d.rendered(panel).unwrap().pinned);
}

#[test]
fn insert_with_id_reserves_the_id() {
    let mut d = doc();
    d.insert_with_id(ElementId(5), "x", None, Rect::ZERO).unwrap();
    assert!(d.insert_with_id(ElementId(5), "y", None, Rect::ZERO).is_err());
    assert_eq!(d.insert("z", Rect::ZERO), ElementId(6));
}

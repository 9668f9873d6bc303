use super::*;
use crate::foundation::core::{Rect, Vec2, Viewport};
use crate::scene::scroll_scene::ScrollScene;

const DT: f64 = 0.016;

fn education(scene: &mut ScrollScene) -> EducationSection {
    let section = scene.insert_element("education", Rect::new(0.0, 1000.0, 1000.0, 2000.0));
    let mut child = |name: &str, rect: Rect| scene.insert_child(section, name, rect).unwrap();
    let title = child("title", Rect::new(100.0, 1020.0, 900.0, 1100.0));
    let line = child("line", Rect::new(495.0, 1100.0, 505.0, 1950.0));
    let cards = vec![
        child("card-0", Rect::new(50.0, 1150.0, 450.0, 1350.0)),
        child("card-1", Rect::new(550.0, 1400.0, 950.0, 1600.0)),
    ];
    let still = child("still", Rect::new(0.0, 1100.0, 40.0, 1140.0));
    let floating = child("floating", Rect::new(960.0, 1500.0, 1000.0, 1540.0));
    EducationSection {
        section,
        title,
        line,
        cards,
        decos: vec![
            Deco::new(still),
            Deco::new(floating).depth(2.0).drift(Vec2::new(10.0, 0.0)),
        ],
    }
}

fn page() -> ScrollScene {
    ScrollScene::new(Viewport::new(1000.0, 800.0).unwrap(), 4000.0)
}

#[test]
fn mount_registers_one_zone_per_piece() {
    let mut scene = page();
    let e = education(&mut scene);
    let id = scene.mount(&e).unwrap();
    // title, line, two cards, two deco reveals, one depth drift
    assert_eq!(scene.mounted(id).unwrap().zones.len(), 7);
    assert_eq!(e.name(), "education");
    assert_eq!(e.elements().len(), 7);
}

#[test]
fn cards_enter_from_alternating_sides() {
    let mut scene = page();
    let e = education(&mut scene);
    scene.mount(&e).unwrap();
    scene.frame(DT);
    assert_eq!(scene.document().property(e.cards[0], Property::X), -80.0);
    assert_eq!(scene.document().property(e.cards[1], Property::X), 80.0);

    scene.scroll_to(1000.0);
    scene.settle(DT, 500);
    assert_eq!(scene.document().property(e.cards[0], Property::X), 0.0);
    assert_eq!(scene.document().property(e.cards[1], Property::Opacity), 1.0);
}

#[test]
fn line_grows_with_section_progress() {
    let mut scene = page();
    let e = education(&mut scene);
    scene.mount(&e).unwrap();
    scene.frame(DT);
    assert_eq!(scene.document().property(e.line, Property::ScaleY), 0.0);

    // "top 50%" -> "bottom 70%" spans 600..1440.
    scene.scroll_to(1020.0);
    scene.settle(DT, 2000);
    assert!((scene.document().property(e.line, Property::ScaleY) - 0.5).abs() < 1e-9);

    scene.scroll_to(1440.0);
    scene.settle(DT, 2000);
    assert_eq!(scene.document().property(e.line, Property::ScaleY), 1.0);
    assert_eq!(scene.document().property(e.line, Property::Opacity), 1.0);
}

#[test]
fn deep_decorations_drift_across_the_section() {
    let mut scene = page();
    let e = education(&mut scene);
    scene.mount(&e).unwrap();
    let floating = e.decos[1].element;

    scene.scroll_to(2000.0);
    scene.settle(DT, 3000);
    assert_eq!(scene.document().property(floating, Property::YPercent), -40.0);
    assert_eq!(scene.document().property(floating, Property::XPercent), 20.0);
    assert_eq!(scene.document().property(e.decos[0].element, Property::YPercent), 0.0);
}

use super::*;
use crate::foundation::core::{Rect, Viewport};
use crate::scene::scroll_scene::ScrollScene;

fn skills(scene: &mut ScrollScene) -> SkillsSection {
    let section = scene.insert_element("skills", Rect::new(0.0, 1000.0, 1000.0, 1800.0));
    let title = scene
        .insert_child(section, "title", Rect::new(200.0, 1200.0, 800.0, 1260.0))
        .unwrap();
    let letters: Vec<ElementId> = (0..3)
        .map(|i| {
            let x = 260.0 + 40.0 * i as f64;
            let rect = Rect::new(x, 1200.0, x + 40.0, 1260.0);
            scene.insert_child(title, format!("letter-{i}"), rect).unwrap()
        })
        .collect();
    let portal = scene
        .insert_child(section, "portal", Rect::new(0.0, 1000.0, 1000.0, 1800.0))
        .unwrap();
    let content = scene
        .insert_child(portal, "grid", Rect::new(0.0, 1000.0, 1000.0, 1800.0))
        .unwrap();
    let card = scene
        .insert_element("card", Rect::new(0.0, 5000.0, 300.0, 5200.0));
    let bar = scene
        .insert_child(card, "bar", Rect::new(0.0, 5150.0, 300.0, 5160.0))
        .unwrap();
    SkillsSection {
        section,
        title,
        focus: letters[1],
        letters,
        portal,
        content,
        cards: vec![SkillCard {
            card,
            bar,
            level: 80.0,
        }],
        pin_distance: 3500.0,
    }
}

fn page() -> ScrollScene {
    ScrollScene::new(Viewport::new(1000.0, 800.0).unwrap(), 8000.0)
}

#[test]
fn portal_geometry_centers_the_focus_letter() {
    let mut scene = page();
    let s = skills(&mut scene);
    let g = PortalGeometry::measure(scene.document(), s.section, s.focus).unwrap();
    // Focus letter spans 300..340 x 1200..1260; its center sits 230px into the section.
    assert_eq!(g.target_x, 180.0);
    assert_eq!(g.target_y, 170.0);
    assert_eq!(g.scale_x, 0.04);
    assert_eq!(g.scale_y, 0.075);
    assert_eq!(g.offset_x, -180.0);
    assert_eq!(g.offset_y, -170.0);

    let err = PortalGeometry::measure(scene.document(), s.section, ElementId(999)).unwrap_err();
    assert!(matches!(err, ScrollweaveError::Layout(_)));
}

#[test]
fn master_timeline_runs_one_and_a_quarter_seconds() {
    let mut scene = page();
    let s = skills(&mut scene);
    let g = PortalGeometry::measure(scene.document(), s.section, s.focus).unwrap();
    let tl = s.master(&g).unwrap().build(|_, p| p.default_value()).unwrap();
    assert!((tl.duration() - 1.25).abs() < 1e-9);

    let content_in = tl
        .tweens()
        .iter()
        .find(|t| t.target == s.content && t.property == Property::Opacity)
        .unwrap();
    assert!((content_in.start - 0.35).abs() < 1e-9);

    let end = tl.end_state();
    assert_eq!(end.get(s.title, Property::Scale), Some(TITLE_ZOOM));
    assert_eq!(end.get(s.portal, Property::ScaleX), Some(1.0));
    assert_eq!(end.get(s.portal, Property::Opacity), Some(0.0));
    assert_eq!(end.get(s.letters[0], Property::Opacity), Some(0.0));
}

#[test]
fn single_letter_title_skips_the_fade_step() {
    let mut scene = page();
    let mut s = skills(&mut scene);
    s.letters = vec![s.focus];
    let g = PortalGeometry::measure(scene.document(), s.section, s.focus).unwrap();
    let spec = s.master(&g).unwrap();
    assert_eq!(spec.steps.len(), 7);
}

#[test]
fn mount_pins_the_section_for_the_configured_distance() {
    let mut scene = page();
    let s = skills(&mut scene);
    let id = scene.mount(&s).unwrap();
    assert_eq!(scene.mounted(id).unwrap().zones.len(), 3);

    scene.frame(0.016);
    assert_eq!(scene.pins().len(), 1);
    let zone = scene
        .registry()
        .ids()
        .find(|&z| scene.pins().contains(z))
        .unwrap();
    let w = scene.registry().window(zone).unwrap();
    assert_eq!((w.start, w.end), (1000.0, 4500.0));

    scene.scroll_to(4500.0);
    scene.settle(0.016, 2000);
    assert_eq!(scene.document().property(s.title, Property::Scale), TITLE_ZOOM);
    assert_eq!(scene.document().property(s.content, Property::Opacity), 1.0);
    assert_eq!(scene.document().property(s.portal, Property::Opacity), 0.0);
}

#[test]
fn skill_bar_fills_to_its_level() {
    let mut scene = page();
    let s = skills(&mut scene);
    scene.mount(&s).unwrap();
    let bar = s.cards[0].bar;

    scene.frame(0.016);
    assert_eq!(scene.document().property(bar, Property::ScaleX), 0.0);

    // The 3500px pin spacing pushes the card from 5000 to 8500.
    scene.scroll_to(9000.0);
    scene.settle(0.016, 2000);
    assert_eq!(scene.document().property(bar, Property::ScaleX), 0.8);
}

#[test]
fn focus_must_be_a_title_letter() {
    let mut scene = page();
    let mut s = skills(&mut scene);
    s.focus = s.portal;
    let err = scene.mount(&s).unwrap_err();
    assert!(err.is_config());
    assert!(scene.registry().is_empty());
}

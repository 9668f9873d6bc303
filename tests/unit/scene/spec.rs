use super::*;
use crate::animation::property::Property;
use crate::trigger::config::Scrub;

const PAGE: &str = r#"{
  "viewport": { "width": 1000, "height": 800 },
  "contentHeight": 5000,
  "elements": [
    { "id": 1, "name": "hero", "rect": { "x0": 0, "y0": 0, "x1": 1000, "y1": 800 } },
    { "id": 2, "name": "box", "rect": { "x0": 0, "y0": 2000, "x1": 1000, "y1": 2400 },
      "style": { "opacity": 0 } },
    { "id": 3, "name": "badge", "parent": 2, "rect": { "x0": 10, "y0": 2010, "x1": 60, "y1": 2060 } }
  ],
  "animations": [
    {
      "trigger": { "trigger": 2, "scrub": true },
      "timeline": {
        "steps": [
          { "targets": [2], "from": { "opacity": 0 }, "to": { "opacity": 1 }, "ease": "linear" }
        ]
      }
    }
  ],
  "intros": [
    { "steps": [ { "targets": [1], "from": { "y": 40 }, "to": { "y": 0 }, "duration": 0.5 } ] }
  ],
  "parallax": [
    { "element": 3, "depth": { "x": 0, "y": -0.5 } },
    { "element": 3, "depth": { "x": 0, "y": 100 }, "animation": 0 }
  ],
  "breakpoints": [
    {
      "query": "(min-width: 768px)",
      "enable": { "set": [ { "element": 1, "props": { "x": 0 } } ] },
      "disable": { "set": [ { "element": 1, "props": { "x": -20 } } ] }
    }
  ]
}"#;

fn page() -> SceneSpec {
    SceneSpec::from_json(PAGE).unwrap()
}

fn paths(spec: &SceneSpec) -> Vec<String> {
    spec.issues().into_iter().map(|i| i.path).collect()
}

#[test]
fn parses_a_full_page_description() {
    let spec = page();
    assert_eq!(spec.elements.len(), 3);
    assert_eq!(spec.elements[2].parent, Some(ElementId(2)));
    assert_eq!(spec.animations[0].trigger.scrub, Scrub::Immediate);
    assert_eq!(spec.parallax[1].animation, Some(0));
    assert_eq!(spec.breakpoints[0].query, MediaQuery::min_width(768.0));
    assert!(spec.issues().is_empty(), "{:?}", spec.issues());
}

#[test]
fn unknown_top_level_fields_are_rejected() {
    let err = SceneSpec::from_json(r#"{ "viewport": { "width": 1, "height": 1 }, "contentHeight": 0, "extra": 1 }"#)
        .unwrap_err();
    assert!(err.to_string().contains("extra"), "{err}");
}

#[test]
fn document_keeps_ids_and_initial_style() {
    let doc = page().document().unwrap();
    assert_eq!(doc.find("badge"), Some(ElementId(3)));
    assert_eq!(doc.property(ElementId(2), Property::Opacity), 0.0);
    assert_eq!(doc.property(ElementId(1), Property::Opacity), 1.0);
    assert_eq!(doc.layout_top(ElementId(3)), Some(2010.0));
}

#[test]
fn issues_point_at_the_offending_field() {
    let mut spec = page();
    spec.elements[2].parent = Some(ElementId(9));
    spec.animations[0].timeline.steps[0].targets.push(ElementId(7));
    spec.parallax[1].animation = Some(4);
    spec.breakpoints[0].disable.set[0].element = ElementId(8);

    assert_eq!(
        paths(&spec),
        vec![
            "$.elements[2].parent",
            "$.animations[0].timeline.steps[0].targets[1]",
            "$.parallax[1].animation",
            "$.breakpoints[0].disable.set[0].element",
        ]
    );
}

#[test]
fn duplicate_ids_and_bad_viewport_are_reported() {
    let mut spec = page();
    spec.viewport.width = 0.0;
    spec.elements[1].id = ElementId(1);
    let issues = spec.issues();
    assert_eq!(issues[0].path, "$.viewport");
    assert!(issues.iter().any(|i| i.path == "$.elements[1]" && i.message.contains("duplicate")));
}

#[test]
fn inverted_window_is_an_issue_on_the_trigger() {
    let mut spec = page();
    spec.animations[0].trigger = spec.animations[0]
        .trigger
        .clone()
        .window("bottom top", "top bottom")
        .unwrap();
    let issues = spec.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path, "$.animations[0].trigger");
    assert!(issues[0].message.contains("ends before it starts"), "{}", issues[0]);
}

#[test]
fn validate_joins_every_issue() {
    let mut spec = page();
    spec.content_height = -1.0;
    spec.parallax[0].element = ElementId(42);
    let err = spec.validate().unwrap_err();
    assert!(err.is_config());
    let msg = err.to_string();
    assert!(msg.contains("$.contentHeight: must be >= 0"), "{msg}");
    assert!(msg.contains("$.parallax[0].element"), "{msg}");
}

#[test]
fn sections_report_missing_elements() {
    let spec = SceneSpec::from_json(
        r#"{
          "viewport": { "width": 1000, "height": 800 },
          "contentHeight": 3000,
          "elements": [
            { "id": 1, "name": "card", "rect": { "x0": 0, "y0": 1200, "x1": 300, "y1": 1500 } }
          ],
          "sections": [
            { "kind": "reveal", "targets": [1, 2], "from": { "opacity": 0 }, "to": { "opacity": 1 } }
          ]
        }"#,
    )
    .unwrap();
    assert_eq!(paths(&spec), vec!["$.sections[0]"]);
}

#[test]
fn scene_from_description_registers_everything() {
    let mut scene = ScrollScene::from_spec(&page()).unwrap();
    assert_eq!(scene.registry().len(), 1);
    assert_eq!(scene.engine().len(), 2);
    assert_eq!(scene.parallax().len(), 2);
    assert_eq!(scene.gate().len(), 1);

    scene.scroll_to(1800.0);
    let r = scene.frame(0.016);
    assert_eq!(r.breakpoints.len(), 1);
    assert!((scene.document().property(ElementId(2), Property::Opacity) - 0.5).abs() < 1e-9);
}

#[test]
fn breakpoint_branches_apply_their_settings() {
    let mut scene = ScrollScene::from_spec(&page()).unwrap();
    scene.frame(0.016);
    assert_eq!(scene.document().property(ElementId(1), Property::X), 0.0);

    scene.resize(Viewport::new(500.0, 800.0).unwrap());
    scene.frame(0.016);
    assert_eq!(scene.document().property(ElementId(1), Property::X), -20.0);
}

#[test]
fn invalid_description_does_not_build_a_scene() {
    let mut spec = page();
    spec.animations[0].trigger.trigger = ElementId(99);
    assert!(ScrollScene::from_spec(&spec).unwrap_err().is_config());
}

use super::*;

#[test]
fn parses_four_slots() {
    let t: ToggleActions = "play none none reset".parse().unwrap();
    assert_eq!(t, ToggleActions::replay());
    assert_eq!(t.action(ToggleSlot::LeaveBack), ToggleAction::Reset);
    assert_eq!(t.to_string(), "play none none reset");
    assert!(t.rearms());
    assert!(!ToggleActions::default().rearms());
}

#[test]
fn rejects_wrong_arity_and_unknown_actions() {
    assert!("play none none".parse::<ToggleActions>().unwrap_err().is_config());
    assert!("play none none none none".parse::<ToggleActions>().is_err());
    assert!("play none jump reset".parse::<ToggleActions>().is_err());
}

#[test]
fn serde_round_trips_through_text() {
    let t: ToggleActions = serde_json::from_str(r#""restart pause resume complete""#).unwrap();
    assert_eq!(t.enter, ToggleAction::Restart);
    assert_eq!(t.enter_back, ToggleAction::Resume);
    assert_eq!(
        serde_json::to_string(&t).unwrap(),
        r#""restart pause resume complete""#
    );
}

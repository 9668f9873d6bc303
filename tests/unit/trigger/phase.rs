use super::*;

#[test]
fn full_forward_jump_walks_every_phase_in_order() {
    let w = walk(ZonePhase::Before, ZonePhase::After);
    assert_eq!(
        w.as_slice(),
        &[
            PhaseTransition::Enter,
            PhaseTransition::Activate,
            PhaseTransition::Leave,
            PhaseTransition::Exit
        ]
    );
    let reached: Vec<ZonePhase> = w.iter().map(|t| t.to()).collect();
    assert_eq!(
        reached,
        vec![
            ZonePhase::Entering,
            ZonePhase::Active,
            ZonePhase::Leaving,
            ZonePhase::After
        ]
    );
    assert!(!w.spilled());
}

#[test]
fn full_backward_jump_mirrors_forward() {
    let w = walk(ZonePhase::After, ZonePhase::Before);
    assert_eq!(
        w.as_slice(),
        &[
            PhaseTransition::EnterBack,
            PhaseTransition::Reactivate,
            PhaseTransition::LeaveBack,
            PhaseTransition::Rewind
        ]
    );
    assert!(w.iter().all(|t| !t.is_forward()));
}

#[test]
fn illegal_edges_do_not_exist() {
    assert_eq!(PhaseTransition::between(ZonePhase::Before, ZonePhase::Leaving), None);
    assert_eq!(PhaseTransition::between(ZonePhase::Before, ZonePhase::After), None);
    assert_eq!(
        PhaseTransition::between(ZonePhase::Active, ZonePhase::Leaving),
        Some(PhaseTransition::Leave)
    );
    assert!(walk(ZonePhase::Active, ZonePhase::Active).is_empty());
}

#[test]
fn settled_phase_treats_edges_as_inside() {
    let w = ZoneWindow {
        start: 100.0,
        end: 200.0,
    };
    assert_eq!(ZonePhase::settled_at(&w, 99.9), ZonePhase::Before);
    assert_eq!(ZonePhase::settled_at(&w, 100.0), ZonePhase::Active);
    assert_eq!(ZonePhase::settled_at(&w, 200.0), ZonePhase::Active);
    assert_eq!(ZonePhase::settled_at(&w, 200.1), ZonePhase::After);
}

#[test]
fn only_boundary_crossings_map_to_toggle_slots() {
    assert_eq!(PhaseTransition::Enter.slot(), Some(ToggleSlot::Enter));
    assert_eq!(PhaseTransition::LeaveBack.slot(), Some(ToggleSlot::LeaveBack));
    assert_eq!(PhaseTransition::Activate.slot(), None);
    assert_eq!(PhaseTransition::Rewind.slot(), None);
}

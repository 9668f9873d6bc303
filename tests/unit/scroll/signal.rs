use super::*;

fn vp(w: f64, h: f64) -> Viewport {
    Viewport::new(w, h).unwrap()
}

#[test]
fn many_events_in_one_frame_emit_one_sample() {
    let mut s = ScrollSignal::new(vp(1280.0, 800.0));
    for y in [10.0, 20.0, 30.0, 400.0] {
        s.on_scroll(y);
    }
    assert!(s.has_pending());
    let f = s.flush(|y, _| y);
    assert_eq!(f.sample.scroll_y, 400.0);
    assert_eq!(f.sample.frame, 1);
    assert!(f.scrolled);
    assert!(!f.resized);
    assert_eq!(s.coalesced(), 3);

    let idle = s.flush(|y, _| y);
    assert!(!idle.scrolled);
    assert_eq!(idle.sample.frame, 2);
    assert_eq!(idle.sample.scroll_y, 400.0);
}

#[test]
fn resize_is_reported_and_clamp_applies() {
    let mut s = ScrollSignal::new(vp(1280.0, 800.0));
    s.on_resize(vp(600.0, 800.0));
    s.on_scroll(5000.0);
    let f = s.flush(|y, v| y.min(v.width));
    assert!(f.resized);
    assert_eq!(f.sample.scroll_y, 600.0);
    assert_eq!(s.current().viewport.width, 600.0);

    s.on_resize(vp(600.0, 800.0));
    assert!(!s.flush(|y, _| y).resized);
}

#[test]
fn progress_reads_last_flushed_offset() {
    let mut s = ScrollSignal::new(vp(1280.0, 800.0));
    let w = ZoneWindow {
        start: 100.0,
        end: 300.0,
    };
    s.on_scroll(200.0);
    assert_eq!(s.progress(&w), 0.0);
    s.flush(|y, _| y);
    assert_eq!(s.progress(&w), 0.5);
    s.on_scroll(f64::NAN);
    assert!(!s.has_pending());
}

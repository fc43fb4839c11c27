use super::*;

#[test]
fn changed_reports_only_new_states_test() {
    let mut tracker = StateChangeTracker::default();

    assert_eq!(Some(&("ctx", 1)), tracker.changed(("ctx", 1)));
    assert_eq!(None, tracker.changed(("ctx", 1)));
    assert_eq!(Some(&("ctx", 2)), tracker.changed(("ctx", 2)));
    assert_eq!(None, tracker.changed(("ctx", 2)));
}

#[test]
fn initial_state_is_not_reported_test() {
    let mut tracker = StateChangeTracker::new(Some(5));

    assert_eq!(None, tracker.changed(5));
    assert_eq!(Some(&6), tracker.changed(6));
}

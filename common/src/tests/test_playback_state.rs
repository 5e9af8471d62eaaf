use crate::coordinates::Coordinates;
use crate::location_target::LocationTarget;
use crate::notification::Notification;
use crate::playback_state::{PlaybackState, TargetKind};

#[test]
fn target_kind_of_targets() {
    let point = Coordinates::new(52.0, 11.0).unwrap();
    assert_eq!(TargetKind::of(&LocationTarget::Empty), None);
    assert_eq!(
        TargetKind::of(&LocationTarget::SinglePoint(point)),
        Some(TargetKind::Single)
    );
    assert_eq!(
        TargetKind::of(&LocationTarget::Route(vec![point, point])),
        Some(TargetKind::Route)
    );
}

#[test]
fn playback_state_flags() {
    assert!(!PlaybackState::default().is_active());
    assert!(PlaybackState::Playing(TargetKind::Route).is_active());
    assert!(!PlaybackState::Playing(TargetKind::Route).is_paused());
    assert!(PlaybackState::Paused(TargetKind::Single).is_active());
    assert!(PlaybackState::Paused(TargetKind::Single).is_paused());
}

#[test]
fn display_notification() {
    assert_eq!(
        Notification::info("Route finished").to_string(),
        "Route finished"
    );
    assert_eq!(
        Notification::error("Please set coordinates first").to_string(),
        "error: Please set coordinates first"
    );
}

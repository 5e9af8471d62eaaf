use crate::location_target::{LocationTarget, SavedRoute};
use crate::playback_state::TargetKind;
use crate::test_helper::route::{get_l_route, get_single_point};

#[test]
fn create_target_by_point_count() {
    assert_eq!(LocationTarget::create(vec![]), LocationTarget::Empty);
    assert_eq!(
        LocationTarget::create(vec![get_single_point()]),
        LocationTarget::SinglePoint(get_single_point())
    );
    assert_eq!(
        LocationTarget::create(get_l_route()),
        LocationTarget::Route(get_l_route())
    );
}

#[test]
fn points_keep_travel_order() {
    assert!(LocationTarget::Empty.points().is_empty());
    assert_eq!(
        LocationTarget::SinglePoint(get_single_point()).points(),
        &[get_single_point()]
    );
    assert_eq!(
        LocationTarget::Route(get_l_route()).points(),
        get_l_route().as_slice()
    );
}

#[test]
fn target_kind_of_target() {
    assert_eq!(TargetKind::of(&LocationTarget::Empty), None);
    assert_eq!(
        TargetKind::of(&LocationTarget::SinglePoint(get_single_point())),
        Some(TargetKind::Single)
    );
    assert_eq!(
        TargetKind::of(&LocationTarget::Route(get_l_route())),
        Some(TargetKind::Route)
    );
}

#[test]
fn saved_route_converts_to_target() {
    let single = SavedRoute::new("single", vec![get_single_point()]);
    assert_eq!(
        LocationTarget::from(&single),
        LocationTarget::SinglePoint(get_single_point())
    );

    let route = SavedRoute::new("l", get_l_route());
    assert_eq!(
        LocationTarget::from(&route),
        LocationTarget::Route(get_l_route())
    );
}

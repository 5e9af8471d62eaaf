use crate::{haversine_distance, initial_bearing, interpolate, route_distance};
use common::coordinates::Coordinates;
use common::test_helper::route::{get_l_route, get_north_route};

fn pos(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).unwrap()
}

#[test]
fn distance_of_hundredth_degree_latitude() {
    let route = get_north_route();
    let distance = haversine_distance(&route[0], &route[1]);
    assert!((distance - 1111.9508).abs() < 0.01, "distance {distance}");
}

#[test]
fn distance_berlin_paris() {
    let distance = haversine_distance(&pos(52.52, 13.405), &pos(48.8566, 2.3522));
    assert!((distance - 877_464.5).abs() < 1.0, "distance {distance}");
}

#[test]
fn distance_is_symmetric_and_zero_for_same_point() {
    let a = pos(52.026649, 11.282535);
    let b = pos(52.026807, 11.281746);
    assert_eq!(haversine_distance(&a, &a), 0.0);
    assert!((haversine_distance(&a, &b) - haversine_distance(&b, &a)).abs() < 1e-9);
}

#[test]
fn bearing_to_cardinal_directions() {
    let origin = pos(0.0, 0.0);
    assert!((initial_bearing(&origin, &pos(1.0, 0.0)) - 0.0).abs() < 1e-9);
    assert!((initial_bearing(&origin, &pos(0.0, 1.0)) - 90.0).abs() < 1e-9);
    assert!((initial_bearing(&origin, &pos(-1.0, 0.0)) - 180.0).abs() < 1e-9);
    assert!((initial_bearing(&origin, &pos(0.0, -1.0)) - 270.0).abs() < 1e-9);
}

#[test]
fn bearing_berlin_paris() {
    let bearing = initial_bearing(&pos(52.52, 13.405), &pos(48.8566, 2.3522));
    assert!((bearing - 246.743).abs() < 0.01, "bearing {bearing}");
}

#[test]
fn bearing_of_identical_points_is_zero() {
    let a = pos(52.0, 11.0);
    assert_eq!(initial_bearing(&a, &a), 0.0);
}

#[test]
fn interpolate_clamps_fraction() {
    let route = get_north_route();
    assert_eq!(interpolate(&route[0], &route[1], -0.5), route[0]);
    assert_eq!(interpolate(&route[0], &route[1], 1.5), route[1]);

    let middle = interpolate(&route[0], &route[1], 0.5);
    assert!((middle.latitude() - 52.005).abs() < 1e-12);
    assert_eq!(middle.longitude(), 11.0);
}

#[test]
fn interpolate_across_antimeridian() {
    let middle = interpolate(&pos(0.0, 179.0), &pos(0.0, -179.0), 0.5);
    assert!((middle.longitude().abs() - 180.0).abs() < 1e-9);

    let quarter = interpolate(&pos(0.0, 179.0), &pos(0.0, -179.0), 0.75);
    assert!((quarter.longitude() - -179.5).abs() < 1e-9);
}

#[test]
fn route_distance_sums_segments() {
    assert_eq!(route_distance(&[]), 0.0);
    assert_eq!(route_distance(&get_north_route()[..1]), 0.0);

    let distance = route_distance(&get_l_route());
    assert!((distance - (111.1951 + 68.4570)).abs() < 0.01, "distance {distance}");
}

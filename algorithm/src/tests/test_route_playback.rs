use crate::{PlaybackError, RoutePlayback, haversine_distance};
use common::coordinates::Coordinates;
use common::test_helper::route::{get_l_route, get_north_route, get_single_point};

fn pos(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude).unwrap()
}

#[test]
fn reject_routes_with_less_than_two_points() {
    assert_eq!(
        RoutePlayback::new(&[]).unwrap_err(),
        PlaybackError::NotEnoughPoints(0)
    );
    assert_eq!(
        RoutePlayback::new(&[get_single_point()]).unwrap_err(),
        PlaybackError::NotEnoughPoints(1)
    );
}

#[test]
fn start_on_first_point() {
    let route = get_north_route();
    let playback = RoutePlayback::new(&route).unwrap();
    let sample = playback.current();
    assert_eq!(sample.coordinates, route[0]);
    assert!(sample.bearing.abs() < 1e-9);
    assert_eq!(playback.distance_traveled(), 0.0);
    assert!(!playback.is_finished());
}

#[test]
fn advance_interpolates_by_distance_fraction() {
    let route = get_north_route();
    let mut playback = RoutePlayback::new(&route).unwrap();
    let length = playback.total_distance();

    let sample = playback.advance(length / 4.0);
    assert!((sample.coordinates.latitude() - 52.0025).abs() < 1e-9);
    assert_eq!(sample.coordinates.longitude(), 11.0);

    let sample = playback.advance(length / 4.0);
    assert!((sample.coordinates.latitude() - 52.005).abs() < 1e-9);
    assert!((playback.distance_traveled() - length / 2.0).abs() < 1e-9);
}

#[test]
fn advance_at_speed_over_ticks() {
    let mut playback = RoutePlayback::new(&get_north_route()).unwrap();
    let speed = 30.0;
    for _ in 0..10 {
        playback.advance(speed * 1.0);
    }
    assert!((playback.distance_traveled() - 300.0).abs() < 1e-9);
    assert!(!playback.is_finished());
}

#[test]
fn overshoot_carries_into_next_segment() {
    let route = get_l_route();
    let first_length = haversine_distance(&route[0], &route[1]);
    let mut playback = RoutePlayback::new(&route).unwrap();

    let sample = playback.advance(first_length + 10.0);
    assert_eq!(playback.segment_index(), 1);
    assert!((sample.bearing - 90.0).abs() < 0.01, "bearing {}", sample.bearing);
    assert_eq!(sample.coordinates.latitude(), 52.001);
    assert!(sample.coordinates.longitude() > 11.0);
    assert!((playback.distance_traveled() - (first_length + 10.0)).abs() < 1e-9);
}

#[test]
fn finish_on_last_point() {
    let route = get_l_route();
    let mut playback = RoutePlayback::new(&route).unwrap();

    let sample = playback.advance(playback.total_distance() + 500.0);
    assert!(playback.is_finished());
    assert_eq!(sample.coordinates, route[2]);
    assert!((sample.bearing - 90.0).abs() < 0.01);
    assert!((playback.distance_traveled() - playback.total_distance()).abs() < 1e-9);

    let sample = playback.advance(100.0);
    assert_eq!(sample.coordinates, route[2]);
}

#[test]
fn ignore_negative_and_nan_distances() {
    let route = get_north_route();
    let mut playback = RoutePlayback::new(&route).unwrap();
    playback.advance(100.0);
    playback.advance(-50.0);
    playback.advance(f64::NAN);
    assert!((playback.distance_traveled() - 100.0).abs() < 1e-9);
}

#[test]
fn skip_zero_length_segments() {
    let route = vec![pos(52.0, 11.0), pos(52.0, 11.0), pos(52.001, 11.0)];
    let mut playback = RoutePlayback::new(&route).unwrap();
    assert_eq!(playback.segment_index(), 1);

    let sample = playback.advance(10.0);
    assert!(sample.coordinates.latitude() > 52.0);
    assert!(sample.bearing.abs() < 1e-9);
}

#[test]
fn keep_bearing_on_trailing_duplicate_point() {
    let route = vec![pos(52.0, 11.0), pos(52.0, 11.001), pos(52.0, 11.001)];
    let mut playback = RoutePlayback::new(&route).unwrap();
    let sample = playback.advance(1_000.0);
    assert!(playback.is_finished());
    assert!((sample.bearing - 90.0).abs() < 0.01);
}

#[test]
fn route_of_identical_points_is_finished_immediately() {
    let route = vec![pos(52.0, 11.0), pos(52.0, 11.0)];
    let playback = RoutePlayback::new(&route).unwrap();
    assert!(playback.is_finished());
    assert_eq!(playback.current().coordinates, route[1]);
}

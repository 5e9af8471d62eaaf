// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::coordinates::Coordinates;

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Calculates the great-circle distance in meters between two positions.
///
/// Uses the haversine formula on a spherical earth with [`EARTH_RADIUS_M`].
///
/// # Parameters
/// - `from`: Start of the segment.
/// - `to`: End of the segment.
///
/// # Returns
/// The distance between `from` and `to` in meters.
pub fn haversine_distance(from: &Coordinates, to: &Coordinates) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let dlat = lat2 - lat1;
    let dlon = (to.longitude() - from.longitude()).to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
}

/// Calculates the initial bearing (forward azimuth) from `from` towards `to`.
///
/// # Returns
/// The bearing in degrees clockwise from true north in the range `[0, 360)`.
/// Identical positions yield `0`.
pub fn initial_bearing(from: &Coordinates, to: &Coordinates) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let dlon = (to.longitude() - from.longitude()).to_radians();
    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    let bearing = x.atan2(y).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative angles
    if bearing >= 360.0 { 0.0 } else { bearing }
}

/// Linearly interpolates between two positions.
///
/// `fraction` is clamped to `[0, 1]`, `0` yields `from` and `1` yields `to`.
/// Latitude and longitude are interpolated independently, so the result
/// only follows the great circle for short segments. Segments crossing the
/// antimeridian are interpolated across it instead of around the globe.
pub fn interpolate(from: &Coordinates, to: &Coordinates, fraction: f64) -> Coordinates {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let mut dlon = to.longitude() - from.longitude();
    if dlon > 180.0 {
        dlon -= 360.0;
    } else if dlon < -180.0 {
        dlon += 360.0;
    }
    let latitude = from.latitude() + (to.latitude() - from.latitude()) * fraction;
    let mut longitude = from.longitude() + dlon * fraction;
    if longitude > 180.0 {
        longitude -= 360.0;
    } else if longitude < -180.0 {
        longitude += 360.0;
    }
    // a convex combination of valid positions stays in range
    Coordinates::new(latitude, longitude).unwrap_or(*from)
}

/// Sums the great-circle distances of all consecutive point pairs.
///
/// Returns `0` for less than two points.
pub fn route_distance(points: &[Coordinates]) -> f64 {
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0], &pair[1]))
        .sum()
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{coordinates::Coordinates, location_target::SavedRoute};

fn coordinates(latitude: f64, longitude: f64) -> Coordinates {
    Coordinates::new(latitude, longitude)
        .unwrap_or_else(|e| panic!("Invalid test coordinates. Error: {e}"))
}

/// Start/finish line of the Oschersleben race track.
pub fn get_single_point() -> Coordinates {
    coordinates(52.0270889, 11.2803483)
}

/// Two points on the same meridian, 0.01° (about 1112 m) apart, heading north.
pub fn get_north_route() -> Vec<Coordinates> {
    vec![coordinates(52.0, 11.0), coordinates(52.01, 11.0)]
}

/// Three points forming an "L": north first, then east.
pub fn get_l_route() -> Vec<Coordinates> {
    vec![
        coordinates(52.0, 11.0),
        coordinates(52.001, 11.0),
        coordinates(52.001, 11.001),
    ]
}

pub fn get_saved_route() -> SavedRoute {
    SavedRoute::new(
        "Oschersleben",
        vec![
            coordinates(52.026649, 11.282535),
            coordinates(52.026751, 11.282047),
            coordinates(52.026807, 11.281746),
        ],
    )
}

pub fn get_saved_route_as_json<'a>() -> &'a str {
    r#"
    {
        "name": "Oschersleben",
        "points": [
            { "latitude": 52.026649, "longitude": 11.282535 },
            { "latitude": 52.026751, "longitude": 11.282047 },
            { "latitude": 52.026807, "longitude": 11.281746 }
        ]
    }
    "#
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::coordinates::Coordinates;
use serde::{Deserialize, Serialize};

/// What the user asked to mock: nothing, a single point or a route.
///
/// Use [`LocationTarget::create`] to pick the variant from a list of
/// points, so a route always has at least two points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum LocationTarget {
    #[default]
    Empty,
    SinglePoint(Coordinates),
    Route(Vec<Coordinates>),
}

impl LocationTarget {
    /// Creates the matching target for the given points.
    ///
    /// * no points – [`LocationTarget::Empty`]
    /// * one point – [`LocationTarget::SinglePoint`]
    /// * more points – [`LocationTarget::Route`]
    pub fn create(points: Vec<Coordinates>) -> Self {
        match points.len() {
            0 => LocationTarget::Empty,
            1 => LocationTarget::SinglePoint(points[0]),
            _ => LocationTarget::Route(points),
        }
    }

    /// Returns the points of the target in travel order.
    pub fn points(&self) -> &[Coordinates] {
        match self {
            LocationTarget::Empty => &[],
            LocationTarget::SinglePoint(point) => std::slice::from_ref(point),
            LocationTarget::Route(points) => points,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, LocationTarget::Empty)
    }
}

/// A route the user stored under a name for later playback.
///
/// Two saved routes are considered the same entry when name and points
/// are equal, which is what deletion matches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    pub name: String,
    pub points: Vec<Coordinates>,
}

impl SavedRoute {
    pub fn new(name: &str, points: Vec<Coordinates>) -> Self {
        SavedRoute {
            name: name.to_string(),
            points,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<&SavedRoute> for LocationTarget {
    fn from(route: &SavedRoute) -> Self {
        LocationTarget::create(route.points.clone())
    }
}

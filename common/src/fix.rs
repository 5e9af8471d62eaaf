// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::coordinates::Coordinates;
use crate::serde::epoch_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Altitude in meters reported with every fix.
pub const DEFAULT_ALTITUDE: f64 = 3.0;
/// Horizontal accuracy radius in meters.
pub const DEFAULT_ACCURACY: f64 = 3.0;
/// Vertical accuracy in meters.
pub const DEFAULT_VERTICAL_ACCURACY: f64 = 0.1;
/// Bearing accuracy in degrees.
pub const DEFAULT_BEARING_ACCURACY: f64 = 0.1;
/// Speed accuracy in meters per second.
pub const DEFAULT_SPEED_ACCURACY: f64 = 0.01;
/// Speed reported while standing on a single point.
///
/// Some consumers discard fixes with a speed of exactly zero as invalid.
pub const STATIONARY_SPEED: f64 = 0.01;

/// One synthetic location report handed to a mock location provider.
///
/// Besides position, bearing and speed a fix carries the accuracy fields a
/// real receiver would report. They are fixed to small values so consumers
/// treat the fix as a high quality one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    coordinates: Coordinates,
    altitude: f64,
    bearing: f64,
    speed: f64,
    accuracy: f64,
    vertical_accuracy: f64,
    bearing_accuracy: f64,
    speed_accuracy: f64,
    #[serde(with = "epoch_millis")]
    timestamp: DateTime<Utc>,
}

impl Fix {
    /// Creates a new [`Fix`] with the default altitude and accuracy values.
    ///
    /// # Arguments
    ///
    /// * `coordinates` – The reported position.
    /// * `bearing` – Direction of travel in degrees clockwise from north, `[0, 360)`.
    /// * `speed` – Speed over ground in meters per second.
    /// * `timestamp` – The moment this fix is reported.
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::{coordinates::Coordinates, fix::Fix};
    ///
    /// let pos = Coordinates::new(52.0, 13.0).unwrap();
    /// let fix = Fix::new(pos, 90.0, 15.5, chrono::Utc::now());
    /// assert_eq!(fix.speed(), 15.5);
    /// ```
    pub fn new(coordinates: Coordinates, bearing: f64, speed: f64, timestamp: DateTime<Utc>) -> Fix {
        Fix {
            coordinates,
            altitude: DEFAULT_ALTITUDE,
            bearing,
            speed,
            accuracy: DEFAULT_ACCURACY,
            vertical_accuracy: DEFAULT_VERTICAL_ACCURACY,
            bearing_accuracy: DEFAULT_BEARING_ACCURACY,
            speed_accuracy: DEFAULT_SPEED_ACCURACY,
            timestamp,
        }
    }

    /// Creates a fix for a device standing still at `coordinates`.
    pub fn stationary(coordinates: Coordinates, timestamp: DateTime<Utc>) -> Fix {
        Fix::new(coordinates, 0.0, STATIONARY_SPEED, timestamp)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn coordinates(&self) -> Coordinates {
        self.coordinates
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates.latitude()
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates.longitude()
    }

    /// Returns the altitude in meters.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Returns the bearing in degrees clockwise from north.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Returns the speed in meters per second.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns the horizontal accuracy radius in meters.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn vertical_accuracy(&self) -> f64 {
        self.vertical_accuracy
    }

    pub fn bearing_accuracy(&self) -> f64 {
        self.bearing_accuracy
    }

    pub fn speed_accuracy(&self) -> f64 {
        self.speed_accuracy
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

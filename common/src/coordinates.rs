// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Errors reported when a latitude/longitude pair can't be turned into [`Coordinates`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordinatesError {
    #[error("Latitude must be between -90 and 90, got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be between -180 and 180, got {0}")]
    LongitudeOutOfRange(f64),

    #[error("Failed to parse coordinates from \"{0}\"")]
    Parse(String),
}

/// A validated geographical coordinate in decimal degrees.
///
/// A `Coordinates` value always holds a latitude in `[-90, 90]` and a
/// longitude in `[-180, 180]`. Every constructor, including
/// deserialization, runs the same range check, so code that receives a
/// `Coordinates` never has to validate it again.
///
/// # Example
///
/// ```rust
/// use common::coordinates::Coordinates;
///
/// let pos = Coordinates::new(52.026649, 11.282535).unwrap();
/// assert_eq!(pos.to_string(), "(52.026649, 11.282535)");
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

/// Unvalidated wire representation, only used as the deserialization source.
#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// Creates new [`Coordinates`] after checking the latitude and longitude ranges.
    ///
    /// # Errors
    ///
    /// * [`CoordinatesError::LatitudeOutOfRange`] if `latitude` is not in `[-90, 90]` or NaN.
    /// * [`CoordinatesError::LongitudeOutOfRange`] if `longitude` is not in `[-180, 180]` or NaN.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::LongitudeOutOfRange(longitude));
        }
        Ok(Coordinates {
            latitude,
            longitude,
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Returns the latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

fn format_degrees(value: f64) -> String {
    let formatted = format!("{value:.7}");
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {})",
            format_degrees(self.latitude),
            format_degrees(self.longitude)
        )
    }
}

/// Parses `lat,lon` as well as the display form `(lat, lon)`.
impl FromStr for Coordinates {
    type Err = CoordinatesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let Some((lat, lon)) = inner.split_once(',') else {
            return Err(CoordinatesError::Parse(s.to_string()));
        };
        let latitude =
            f64::from_str(lat.trim()).map_err(|_| CoordinatesError::Parse(s.to_string()))?;
        let longitude =
            f64::from_str(lon.trim()).map_err(|_| CoordinatesError::Parse(s.to_string()))?;
        Coordinates::new(latitude, longitude)
    }
}

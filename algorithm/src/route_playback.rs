// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::geo::{haversine_distance, initial_bearing, interpolate};
use common::coordinates::Coordinates;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaybackError {
    #[error("A route needs at least two points, got {0}")]
    NotEnoughPoints(usize),
}

/// Position and direction of travel at the current playback distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSample {
    pub coordinates: Coordinates,
    /// Degrees clockwise from north, `[0, 360)`.
    pub bearing: f64,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    start: Coordinates,
    end: Coordinates,
    length: f64,
    bearing: f64,
}

/// Moves a virtual device along a route.
///
/// The route is split into segments between consecutive points. For each
/// segment the great-circle length and the initial bearing are computed
/// once. Playback keeps the current segment and the distance already
/// traveled on it; [`advance`](RoutePlayback::advance) adds distance and
/// carries any overshoot into the following segments.
///
/// The reported position is interpolated linearly by the traveled fraction
/// of the segment length. This is an approximation that is only accurate
/// for short segments, which is what a hand placed route consists of.
///
/// Once the end of the last segment is reached the playback is finished
/// and stays on the final point.
#[derive(Debug, Clone)]
pub struct RoutePlayback {
    segments: Vec<Segment>,
    segment: usize,
    /// Distance traveled on the current segment in meters.
    distance_traveled: f64,
    /// Summed length of all segments before the current one.
    completed_distance: f64,
    finished: bool,
}

impl RoutePlayback {
    /// Creates a playback positioned on the first point of `points`.
    ///
    /// # Errors
    /// [`PlaybackError::NotEnoughPoints`] if less than two points are given.
    pub fn new(points: &[Coordinates]) -> Result<Self, PlaybackError> {
        if points.len() < 2 {
            return Err(PlaybackError::NotEnoughPoints(points.len()));
        }
        let mut segments = Vec::with_capacity(points.len() - 1);
        let mut last_bearing = 0.0;
        for pair in points.windows(2) {
            let length = haversine_distance(&pair[0], &pair[1]);
            // a zero length segment has no direction, keep the previous one
            let bearing = if length > 0.0 {
                initial_bearing(&pair[0], &pair[1])
            } else {
                last_bearing
            };
            last_bearing = bearing;
            segments.push(Segment {
                start: pair[0],
                end: pair[1],
                length,
                bearing,
            });
        }
        let mut playback = RoutePlayback {
            segments,
            segment: 0,
            distance_traveled: 0.0,
            completed_distance: 0.0,
            finished: false,
        };
        playback.settle();
        Ok(playback)
    }

    /// Moves `distance` meters further along the route and returns the new sample.
    ///
    /// Negative or NaN distances are ignored. After the route is finished
    /// the final point is returned.
    pub fn advance(&mut self, distance: f64) -> PlaybackSample {
        if !self.finished && distance > 0.0 {
            self.distance_traveled += distance;
            self.settle();
        }
        self.current()
    }

    /// Returns the sample at the current playback distance.
    pub fn current(&self) -> PlaybackSample {
        let segment = &self.segments[self.segment];
        let fraction = if segment.length > 0.0 {
            self.distance_traveled / segment.length
        } else {
            1.0
        };
        PlaybackSample {
            coordinates: interpolate(&segment.start, &segment.end, fraction),
            bearing: segment.bearing,
        }
    }

    /// Returns the total route length in meters.
    pub fn total_distance(&self) -> f64 {
        self.segments.iter().map(|s| s.length).sum()
    }

    /// Returns the distance traveled from the first point in meters.
    pub fn distance_traveled(&self) -> f64 {
        self.completed_distance + self.distance_traveled
    }

    /// Returns the index of the segment the playback is on.
    pub fn segment_index(&self) -> usize {
        self.segment
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Moves on to the segment that contains the traveled distance.
    fn settle(&mut self) {
        loop {
            let length = self.segments[self.segment].length;
            if self.distance_traveled < length {
                return;
            }
            if self.segment + 1 == self.segments.len() {
                self.distance_traveled = length;
                self.finished = true;
                return;
            }
            self.distance_traveled -= length;
            self.completed_distance += length;
            self.segment += 1;
        }
    }
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use algorithm::{PlaybackError, RoutePlayback};
use chrono::{DateTime, Utc};
use common::{
    coordinates::Coordinates, fix::Fix, location_target::LocationTarget,
    playback_state::TargetKind,
};

enum Motion {
    Stationary(Coordinates),
    Route(RoutePlayback),
}

/// Errors when a target can't be played back.
#[derive(Debug, PartialEq)]
pub(crate) enum SessionError {
    EmptyTarget,
    InvalidRoute(PlaybackError),
}

/// The position state of one started mock location target.
///
/// A session lives from `start` until `stop`, a new `start` replaces it.
pub(crate) struct Session {
    kind: TargetKind,
    motion: Motion,
    paused: bool,
    finish_reported: bool,
}

impl Session {
    pub(crate) fn new(target: &LocationTarget) -> Result<Self, SessionError> {
        let (kind, motion) = match target {
            LocationTarget::Empty => return Err(SessionError::EmptyTarget),
            LocationTarget::SinglePoint(point) => (TargetKind::Single, Motion::Stationary(*point)),
            LocationTarget::Route(points) => (
                TargetKind::Route,
                Motion::Route(RoutePlayback::new(points).map_err(SessionError::InvalidRoute)?),
            ),
        };
        Ok(Session {
            kind,
            motion,
            paused: false,
            finish_reported: false,
        })
    }

    pub(crate) fn kind(&self) -> TargetKind {
        self.kind
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Moves `distance` meters along the route unless the session is paused.
    pub(crate) fn advance(&mut self, distance: f64) {
        if self.paused {
            return;
        }
        if let Motion::Route(route) = &mut self.motion {
            route.advance(distance);
        }
    }

    /// Returns `true` exactly once, the first time it is called after the
    /// end of the route was reached.
    pub(crate) fn take_finished(&mut self) -> bool {
        let Motion::Route(route) = &self.motion else {
            return false;
        };
        if route.is_finished() && !self.finish_reported {
            self.finish_reported = true;
            return true;
        }
        false
    }

    /// Builds the fix for the current position.
    ///
    /// The speed drops to zero while paused and at the end of the route.
    pub(crate) fn fix(&self, speed: f64, timestamp: DateTime<Utc>) -> Fix {
        match &self.motion {
            Motion::Stationary(point) => Fix::stationary(*point, timestamp),
            Motion::Route(route) => {
                let sample = route.current();
                let speed = if self.paused || route.is_finished() {
                    0.0
                } else {
                    speed
                };
                Fix::new(sample.coordinates, sample.bearing, speed, timestamp)
            }
        }
    }
}

// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Geodesy helpers and the route playback state machine.

mod geo;
mod route_playback;

pub use geo::{EARTH_RADIUS_M, haversine_distance, initial_bearing, interpolate, route_distance};
pub use route_playback::{PlaybackError, PlaybackSample, RoutePlayback};

#[cfg(test)]
mod tests;

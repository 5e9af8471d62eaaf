// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};

pub const DEFAULT_CLEAR_ROUTE_ON_STOP: bool = true;
pub const DEFAULT_SPEED_METERS_PER_SEC: f64 = 30.0;

/// User preferences that survive a restart.
///
/// # Fields
///
/// - `clear_route_on_stop` – Forget the current target once mocking is stopped.
/// - `speed_meters_per_sec` – Travel speed used for route playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub clear_route_on_stop: bool,
    pub speed_meters_per_sec: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            clear_route_on_stop: DEFAULT_CLEAR_ROUTE_ON_STOP,
            speed_meters_per_sec: DEFAULT_SPEED_METERS_PER_SEC,
        }
    }
}

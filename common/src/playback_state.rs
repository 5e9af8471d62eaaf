// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::location_target::LocationTarget;
use serde::{Deserialize, Serialize};

/// The kind of target a running playback mocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    Single,
    Route,
}

impl TargetKind {
    /// Returns the kind of `target`, `None` for an empty target.
    pub fn of(target: &LocationTarget) -> Option<TargetKind> {
        match target {
            LocationTarget::Empty => None,
            LocationTarget::SinglePoint(_) => Some(TargetKind::Single),
            LocationTarget::Route(_) => Some(TargetKind::Route),
        }
    }
}

/// State of the mock location playback.
///
/// Only a running playback can be paused, so there is no paused idle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No mock location is reported and the provider is not registered.
    #[default]
    Idle,
    /// Fixes are reported and the position advances along the target.
    Playing(TargetKind),
    /// Fixes are still reported, but the position is frozen.
    Paused(TargetKind),
}

impl PlaybackState {
    pub fn is_active(&self) -> bool {
        !matches!(self, PlaybackState::Idle)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused(_))
    }
}

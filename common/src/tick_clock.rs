// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use std::time::{Duration, Instant};

/// Measures the time that passed between two playback ticks.
///
/// The playback engine multiplies the measured time with the travel
/// speed, so the distance covered matches the real time between two
/// reported fixes even if a tick is delayed.
///
/// Implementations must be based on a monotonic clock, wall clock
/// adjustments must not move the mocked position.
pub trait TickClock {
    /// Marks the current moment as the start of the next measurement.
    fn reset(&mut self);

    /// Returns the time since the last [`reset`](Self::reset) or `lap` call
    /// and starts a new measurement.
    ///
    /// Returns [`Duration::ZERO`] if the clock was never reset.
    fn lap(&mut self) -> Duration;
}

/// A [`TickClock`] backed by [`Instant`].
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Option<Instant>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock { last: None }
    }
}

impl TickClock for MonotonicClock {
    fn reset(&mut self) {
        self.last = Some(Instant::now());
    }

    fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = self.last.map_or(Duration::ZERO, |last| now - last);
        self.last = Some(now);
        elapsed
    }
}

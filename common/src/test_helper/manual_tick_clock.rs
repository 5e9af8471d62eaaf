// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::tick_clock::TickClock;
use std::sync::mpsc;
use std::time::Duration;

/// A [`TickClock`] for tests that reports an externally controlled step
/// instead of real elapsed time.
///
/// Every [`lap`](TickClock::lap) returns the current step. The step can be
/// changed from outside through the channel returned by
/// [`sender`](ManualTickClock::sender), also after the clock was moved
/// into a running module.
pub struct ManualTickClock {
    sender: mpsc::Sender<Duration>,
    receiver: mpsc::Receiver<Duration>,
    step: Duration,
    laps: usize,
}

impl ManualTickClock {
    pub fn new(step: Duration) -> Self {
        let (sender, receiver) = mpsc::channel::<Duration>();
        ManualTickClock {
            sender,
            receiver,
            step,
            laps: 0,
        }
    }

    /// Returns a sender to change the reported step.
    pub fn sender(&self) -> mpsc::Sender<Duration> {
        self.sender.clone()
    }

    /// Returns how often [`lap`](TickClock::lap) was called.
    pub fn laps(&self) -> usize {
        self.laps
    }
}

impl Default for ManualTickClock {
    /// Creates a clock reporting one second per lap.
    fn default() -> Self {
        ManualTickClock::new(Duration::from_secs(1))
    }
}

impl TickClock for ManualTickClock {
    fn reset(&mut self) {}

    fn lap(&mut self) -> Duration {
        while let Ok(step) = self.receiver.try_recv() {
            self.step = step;
        }
        self.laps += 1;
        self.step
    }
}

/// Changes the step reported by a [`ManualTickClock`].
///
/// Panics if the clock was dropped.
pub fn set_tick_step(sender: &mpsc::Sender<Duration>, step: Duration) {
    sender
        .send(step)
        .unwrap_or_else(|_| panic!("Failed to send step to the manual tick clock"));
}

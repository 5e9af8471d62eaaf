// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Mock location playback
//!
//! The engine that feeds mocked fixes for a single point or along a route
//! into a [`MockLocationProvider`] at a fixed interval.

mod session;

use chrono::Utc;
use common::{
    notification::Notification,
    playback_state::PlaybackState,
    settings::DEFAULT_SPEED_METERS_PER_SEC,
    tick_clock::{MonotonicClock, TickClock},
};
use mock_provider::{MockLocationProvider, ProviderError};
use module_core::{EventKind, Module, ModuleCtx, MockTarget};
use session::{Session, SessionError};
use std::{sync::Arc, time::Duration};
use tokio::{sync::broadcast::error::RecvError, time::MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Timing configuration of the [`MockLocationModule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackConfig {
    /// Time between two reported fixes.
    pub tick_interval: Duration,
}

impl Default for PlaybackConfig {
    /// One fix per second.
    fn default() -> Self {
        PlaybackConfig {
            tick_interval: Duration::from_secs(1),
        }
    }
}

fn is_valid_speed(speed: f64) -> bool {
    speed.is_finite() && speed >= 0.0
}

/// Reports mocked fixes through a [`MockLocationProvider`].
///
/// The module owns the provider for its whole lifetime. A start request
/// registers the provider and reports the first fix right away, afterwards
/// a fix is reported every [`PlaybackConfig::tick_interval`]. For a route
/// the position advances by `speed × Δt` per tick, where `Δt` is measured
/// with the [`TickClock`]. A paused playback keeps reporting the frozen
/// position with a fresh timestamp.
///
/// # Type Parameters
/// - `P`: The provider the fixes are handed to.
/// - `T`: The clock measuring the time between ticks. Defaults to [`MonotonicClock`].
pub struct MockLocationModule<P: MockLocationProvider, T: TickClock = MonotonicClock> {
    ctx: ModuleCtx,
    provider: P,
    clock: T,
    config: PlaybackConfig,
    speed: f64,
    session: Option<Session>,
    state: PlaybackState,
}

impl<P: MockLocationProvider> MockLocationModule<P, MonotonicClock> {
    /// Creates the module with a [`MonotonicClock`] and one fix per second.
    pub fn new(ctx: ModuleCtx, provider: P) -> Self {
        MockLocationModule::new_with_clock(
            ctx,
            provider,
            MonotonicClock::new(),
            PlaybackConfig::default(),
        )
    }
}

impl<P: MockLocationProvider, T: TickClock> MockLocationModule<P, T> {
    /// Creates the module with a custom clock and timing.
    pub fn new_with_clock(ctx: ModuleCtx, provider: P, clock: T, config: PlaybackConfig) -> Self {
        MockLocationModule {
            ctx,
            provider,
            clock,
            config,
            speed: DEFAULT_SPEED_METERS_PER_SEC,
            session: None,
            state: PlaybackState::Idle,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    fn notify(&self, notification: Notification) {
        debug!("Notification: {notification}");
        let _ = self
            .ctx
            .publish_event(EventKind::NotificationEvent(Arc::new(notification)));
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        info!("Playback state {:?} -> {:?}", self.state, state);
        self.state = state;
        let _ = self.ctx.publish_event(EventKind::PlaybackStateEvent(state));
    }

    /// Starts mocking `request.target`, replacing a running playback.
    async fn start(&mut self, request: &MockTarget) {
        let session = match Session::new(&request.target) {
            Ok(session) => session,
            Err(SessionError::EmptyTarget) => {
                self.notify(Notification::error("Please set coordinates first"));
                return;
            }
            Err(SessionError::InvalidRoute(e)) => {
                self.notify(Notification::error(&format!("Invalid route: {e}")));
                return;
            }
        };
        if !is_valid_speed(request.speed) {
            self.notify(Notification::error(&format!(
                "Invalid speed {} m/s",
                request.speed
            )));
            return;
        }

        self.session = None;
        if let Err(e) = self.provider.remove_test_provider().await {
            debug!("No stale mock location provider removed: {e}");
        }
        if let Err(e) = self.register_provider().await {
            error!("Failed to register mock location provider. Error: {e}");
            let message = if e.is_permission_denied() {
                format!("Mock location permission denied: {e}")
            } else {
                format!("Error starting mock: {e}")
            };
            self.notify(Notification::error(&message));
            self.set_state(PlaybackState::Idle);
            return;
        }

        let kind = session.kind();
        self.speed = request.speed;
        self.session = Some(session);
        self.clock.reset();
        info!(
            "Start mocking {:?} with {} point(s) at {} m/s",
            kind,
            request.target.points().len(),
            self.speed
        );
        self.report_fix().await;
        if self.session.is_some() {
            self.set_state(PlaybackState::Playing(kind));
            self.notify(Notification::info("Location Mocking Started"));
        }
    }

    async fn register_provider(&mut self) -> Result<(), ProviderError> {
        self.provider.add_test_provider().await?;
        if let Err(e) = self.provider.set_enabled(true).await {
            if let Err(remove_err) = self.provider.remove_test_provider().await {
                debug!("Failed to remove disabled mock location provider: {remove_err}");
            }
            return Err(e);
        }
        Ok(())
    }

    /// Advances the playback by the time since the last tick and reports the position.
    async fn tick(&mut self) {
        let elapsed = self.clock.lap();
        let distance = self.speed * elapsed.as_secs_f64();
        if let Some(session) = &mut self.session {
            session.advance(distance);
        }
        self.report_fix().await;
    }

    /// Hands the fix of the current position to the provider.
    ///
    /// A denied permission ends the playback, every other error is reported
    /// and the next tick tries again.
    async fn report_fix(&mut self) {
        let Some(session) = &mut self.session else {
            return;
        };
        let fix = session.fix(self.speed, Utc::now());
        let finished = session.take_finished();

        match self.provider.set_location(&fix).await {
            Ok(()) => {
                debug!("Mocked fix {} bearing {:.1}", fix.coordinates(), fix.bearing());
                let _ = self.ctx.publish_event(EventKind::MockFixEvent(Arc::new(fix)));
            }
            Err(e) if e.is_permission_denied() => {
                error!("Mock location permission revoked. Error: {e}");
                self.session = None;
                if let Err(e) = self.provider.remove_test_provider().await {
                    debug!("Failed to remove revoked mock location provider: {e}");
                }
                self.notify(Notification::error(&format!(
                    "Mock location permission denied: {e}"
                )));
                self.set_state(PlaybackState::Idle);
                return;
            }
            Err(e) => {
                warn!("Failed to mock location. Error: {e}");
                self.notify(Notification::error(&format!("Error: {e}")));
            }
        }

        if finished {
            info!("Route finished at {}", fix.coordinates());
            let _ = self.ctx.publish_event(EventKind::RouteFinishedEvent);
            self.notify(Notification::info("Route finished"));
        }
    }

    fn pause(&mut self) {
        let Some(session) = &mut self.session else {
            debug!("Pause ignored, no mock location running");
            return;
        };
        if session.is_paused() {
            return;
        }
        session.set_paused(true);
        let kind = session.kind();
        self.set_state(PlaybackState::Paused(kind));
    }

    fn resume(&mut self) {
        let Some(session) = &mut self.session else {
            debug!("Resume ignored, no mock location running");
            return;
        };
        if !session.is_paused() {
            return;
        }
        session.set_paused(false);
        let kind = session.kind();
        self.clock.reset();
        self.set_state(PlaybackState::Playing(kind));
    }

    fn set_speed(&mut self, speed: f64) {
        if !is_valid_speed(speed) {
            self.notify(Notification::error(&format!("Invalid speed {speed} m/s")));
            return;
        }
        info!("Speed set to {speed} m/s");
        self.speed = speed;
    }

    /// Ends the playback and removes the provider.
    async fn stop(&mut self) {
        self.session = None;
        match self.provider.remove_test_provider().await {
            Ok(()) => {
                info!("Mock location stopped");
                self.notify(Notification::info("Mock Location Stopped"));
            }
            Err(ProviderError::NotRegistered) => {
                self.notify(Notification::info("Mock Location already stopped"));
            }
            Err(e) => {
                error!("Failed to remove mock location provider. Error: {e}");
                self.notify(Notification::error(&format!("Error stopping mock: {e}")));
            }
        }
        self.set_state(PlaybackState::Idle);
    }
}

#[async_trait::async_trait]
impl<P, T> Module for MockLocationModule<P, T>
where
    P: MockLocationProvider,
    T: TickClock + Send,
{
    async fn run(&mut self) -> Result<(), ()> {
        let mut timer = tokio::time::interval(self.config.tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => match event.kind {
                            EventKind::QuitEvent => {
                                if self.session.is_some() {
                                    self.stop().await;
                                }
                                run = false;
                            }
                            EventKind::StartMockRequestEvent(request) => {
                                self.start(&request.data).await;
                                timer.reset();
                            }
                            EventKind::PauseMockEvent => self.pause(),
                            EventKind::ResumeMockEvent => self.resume(),
                            EventKind::SetSpeedEvent(speed) => self.set_speed(speed),
                            EventKind::StopMockEvent => self.stop().await,
                            _ => (),
                        },
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Playback lagged behind, {skipped} events dropped");
                        }
                        Err(RecvError::Closed) => {
                            error!("Event bus closed");
                            return Err(());
                        }
                    }
                }
                _ = timer.tick(), if self.session.is_some() => self.tick().await,
            }
        }
        Ok(())
    }
}

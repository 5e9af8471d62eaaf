// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::command::{Command, HELP};
use common::{
    coordinates::Coordinates,
    location_target::{LocationTarget, SavedRoute},
    playback_state::PlaybackState,
    settings::Settings,
};
use module_core::{
    EmptyRequestPtr, Event, EventKind, MockTarget, Module, ModuleCtx, Request, RouteRequestPtr,
    SaveSettingsRequestPtr, StartMockRequestPtr,
};
use tokio::sync::{broadcast::error::RecvError, mpsc};
use tracing::{debug, error, info, warn};

/// Bus address of the controller, storage responses carry it as receiver.
pub const CONTROLLER_ADDR: u64 = 0x6d6f636b;

/// Where the initial mock target comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetSource {
    /// Points given on the command line or read from a route file.
    Points(Vec<Coordinates>),
    /// A route saved under the given name.
    SavedRoute(String),
}

/// What the controller does on startup.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerOptions {
    pub target: TargetSource,
    /// Speed from the command line, overrides and replaces the stored speed.
    pub speed: Option<f64>,
    /// Name to save the command line points under.
    pub save_route: Option<String>,
    /// Print the saved routes and quit.
    pub list_routes: bool,
}

/// Connects the user to the playback and storage modules.
///
/// Loads the settings, resolves the target and starts mocking once both
/// are known. Afterwards it translates the user's commands into bus events
/// and prints the notifications of the other modules.
pub struct Controller {
    ctx: ModuleCtx,
    options: ControllerOptions,
    commands: mpsc::Receiver<String>,
    target: LocationTarget,
    settings: Option<Settings>,
    speed: f64,
    target_resolved: bool,
    state: PlaybackState,
    next_request_id: u64,
}

impl Controller {
    pub fn new(ctx: ModuleCtx, options: ControllerOptions, commands: mpsc::Receiver<String>) -> Self {
        let (target, target_resolved) = match &options.target {
            TargetSource::Points(points) => (LocationTarget::create(points.clone()), true),
            TargetSource::SavedRoute(_) => (LocationTarget::Empty, false),
        };
        Controller {
            ctx,
            options,
            commands,
            target,
            settings: None,
            speed: common::settings::DEFAULT_SPEED_METERS_PER_SEC,
            target_resolved,
            state: PlaybackState::Idle,
            next_request_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    fn publish(&self, kind: EventKind) {
        if let Err(e) = self.ctx.publish_event(kind) {
            error!("Failed to publish event. Error: {e}");
        }
    }

    fn quit(&self) {
        self.publish(EventKind::QuitEvent);
    }

    fn request_startup_data(&mut self) {
        if self.options.list_routes || !self.target_resolved {
            let id = self.next_id();
            self.publish(EventKind::LoadSavedRoutesRequestEvent(EmptyRequestPtr::new(
                Request::empty_request(id, CONTROLLER_ADDR),
            )));
        }
        if self.options.list_routes {
            return;
        }
        let id = self.next_id();
        self.publish(EventKind::LoadSettingsRequestEvent(EmptyRequestPtr::new(
            Request::empty_request(id, CONTROLLER_ADDR),
        )));
        if let Some(name) = self.options.save_route.clone() {
            let points = self.target.points().to_vec();
            if points.is_empty() {
                warn!("No points given, route \"{name}\" not saved");
            } else {
                let id = self.next_id();
                self.publish(EventKind::SaveRouteRequestEvent(RouteRequestPtr::new(
                    Request {
                        id,
                        sender_addr: CONTROLLER_ADDR,
                        data: SavedRoute::new(&name, points),
                    },
                )));
            }
        }
    }

    fn save_speed(&mut self) {
        let Some(settings) = &mut self.settings else {
            return;
        };
        settings.speed_meters_per_sec = self.speed;
        let settings = *settings;
        let id = self.next_id();
        self.publish(EventKind::SaveSettingsRequestEvent(SaveSettingsRequestPtr::new(
            Request {
                id,
                sender_addr: CONTROLLER_ADDR,
                data: settings,
            },
        )));
    }

    fn handle_settings(&mut self, settings: Settings) {
        info!("Loaded settings {:?}", settings);
        self.settings = Some(settings);
        match self.options.speed {
            Some(speed) => {
                self.speed = speed;
                if speed != settings.speed_meters_per_sec {
                    self.save_speed();
                }
            }
            None => self.speed = settings.speed_meters_per_sec,
        }
        self.start_when_ready();
    }

    fn handle_saved_routes(&mut self, routes: &[SavedRoute]) {
        if self.options.list_routes {
            if routes.is_empty() {
                println!("No saved routes");
            }
            for route in routes {
                println!("{} ({} points)", route.name, route.points.len());
            }
            self.quit();
            return;
        }
        if self.target_resolved {
            return;
        }
        self.target_resolved = true;
        if let TargetSource::SavedRoute(name) = &self.options.target {
            match routes.iter().find(|route| &route.name == name) {
                Some(route) => {
                    info!("Using saved route \"{name}\"");
                    self.target = LocationTarget::from(route);
                }
                None => println!("error: No saved route named \"{name}\""),
            }
        }
        self.start_when_ready();
    }

    /// Starts mocking as soon as the settings are loaded and the target is known.
    fn start_when_ready(&mut self) {
        if self.settings.is_none() || !self.target_resolved {
            return;
        }
        if self.target.is_empty() {
            println!("{HELP}");
            return;
        }
        self.start();
    }

    fn start(&mut self) {
        let id = self.next_id();
        self.publish(EventKind::StartMockRequestEvent(StartMockRequestPtr::new(
            Request {
                id,
                sender_addr: CONTROLLER_ADDR,
                data: MockTarget {
                    target: self.target.clone(),
                    speed: self.speed,
                },
            },
        )));
    }

    /// Executes one line of user input, returns `false` to quit.
    fn handle_command(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return true;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("error: {e}. {HELP}");
                return true;
            }
        };
        debug!("Command {:?}", command);
        match command {
            Command::Start => self.start(),
            Command::Pause => self.publish(EventKind::PauseMockEvent),
            Command::Resume => self.publish(EventKind::ResumeMockEvent),
            Command::Stop => {
                self.publish(EventKind::StopMockEvent);
                if self.settings.is_some_and(|s| s.clear_route_on_stop) && !self.target.is_empty() {
                    info!("Route cleared");
                    self.target = LocationTarget::Empty;
                }
            }
            Command::Speed(speed) => {
                self.speed = speed;
                self.publish(EventKind::SetSpeedEvent(speed));
                self.save_speed();
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => {
                self.quit();
                return false;
            }
        }
        true
    }

    fn handle_event(&mut self, event: Event) -> bool {
        match event.kind {
            EventKind::QuitEvent => return false,
            EventKind::LoadSettingsResponseEvent(resp) if resp.receiver_addr == CONTROLLER_ADDR => {
                self.handle_settings(resp.data);
            }
            EventKind::LoadSavedRoutesResponseEvent(resp)
                if resp.receiver_addr == CONTROLLER_ADDR =>
            {
                self.handle_saved_routes(&resp.data);
            }
            EventKind::SaveRouteResponseEvent(resp) if resp.receiver_addr == CONTROLLER_ADDR => {
                match resp.data {
                    Ok(()) => println!("Route saved"),
                    Err(e) => println!("error: Failed to save route: {e}"),
                }
            }
            EventKind::SaveSettingsResponseEvent(resp) if resp.receiver_addr == CONTROLLER_ADDR => {
                if let Err(e) = resp.data {
                    warn!("Failed to save settings. Error: {e}");
                }
            }
            EventKind::NotificationEvent(notification) => println!("{notification}"),
            EventKind::PlaybackStateEvent(state) => {
                debug!("Playback state {:?}", state);
                self.state = state;
            }
            EventKind::RouteFinishedEvent => info!("Route finished"),
            EventKind::MockFixEvent(fix) => {
                debug!(
                    "Fix {} bearing {:.1} speed {:.1}",
                    fix.coordinates(),
                    fix.bearing(),
                    fix.speed()
                );
            }
            _ => (),
        }
        true
    }
}

#[async_trait::async_trait]
impl Module for Controller {
    async fn run(&mut self) -> Result<(), ()> {
        self.request_startup_data();
        let mut input_open = true;
        let mut run = true;
        while run {
            tokio::select! {
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => run = self.handle_event(event),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Controller lagged behind, {skipped} events dropped");
                        }
                        Err(RecvError::Closed) => {
                            error!("Event bus closed");
                            return Err(());
                        }
                    }
                }
                line = self.commands.recv(), if input_open => {
                    match line {
                        Some(line) => run = self.handle_command(&line),
                        None => {
                            debug!("Command input closed");
                            input_open = false;
                        }
                    }
                }
            }
        }
        info!("Controller stopped in state {:?}", self.state);
        Ok(())
    }
}

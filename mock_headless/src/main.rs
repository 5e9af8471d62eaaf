// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

mod command;
mod controller;
mod route_file;

use clap::Parser;
use common::coordinates::Coordinates;
use controller::{Controller, ControllerOptions, TargetSource};
use dirs::data_local_dir;
use mock_provider::gpsd::{DEFAULT_GPSD_ADDRESS, GpsdProvider};
use module_core::{Event, EventBus, EventKind, Module};
use playback::{MockLocationModule, PlaybackConfig};
use std::{io::BufRead, path::PathBuf, time::Duration};
use storage::SettingsStorage;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Mocks GPS fixes for a point or along a route", long_about = None)]
struct Cli {
    /// Point to mock as LAT,LON. Repeat it to build a route.
    #[arg(short, long = "point", value_name = "LAT,LON", allow_hyphen_values = true)]
    points: Vec<Coordinates>,
    /// CSV file with a latitude,longitude header and one point per line.
    #[arg(short = 'f', long, conflicts_with_all = ["points", "saved_route"])]
    route_file: Option<PathBuf>,
    /// Mock the route saved under this name.
    #[arg(short = 'r', long, conflicts_with = "points")]
    saved_route: Option<String>,
    /// Travel speed in meters per second, stored as new default.
    #[arg(short, long)]
    speed: Option<f64>,
    /// Save the given points under this name.
    #[arg(long, conflicts_with = "saved_route")]
    save_route: Option<String>,
    /// Print the saved routes and exit.
    #[arg(short, long)]
    list_routes: bool,
    /// Address the gpsd compatible server listens on.
    #[arg(short = 'a', long, default_value = DEFAULT_GPSD_ADDRESS)]
    gpsd_address: String,
    /// Milliseconds between two mocked fixes.
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
    /// Folder of the settings file.
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

fn get_storage_dir(cli: &Cli) -> Result<PathBuf, ()> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    let mut storage_dir = data_local_dir().ok_or_else(|| {
        error!("Could not determine local data directory");
    })?;
    storage_dir.push("mocklocations");
    Ok(storage_dir)
}

fn get_target_source(cli: &Cli) -> Result<TargetSource, ()> {
    if let Some(route_file) = &cli.route_file {
        let points = route_file::read_route_file(route_file).map_err(|e| {
            error!("{e}");
        })?;
        return Ok(TargetSource::Points(points));
    }
    if let Some(name) = &cli.saved_route {
        return Ok(TargetSource::SavedRoute(name.clone()));
    }
    Ok(TargetSource::Points(cli.points.clone()))
}

/// Forwards stdin lines to `sender` from a dedicated thread.
///
/// A blocking read on stdin would keep the runtime from shutting down, so
/// the thread is detached and ends with the process.
fn spawn_stdin_reader(sender: mpsc::Sender<String>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read stdin. Error: {e}");
                    break;
                }
            }
        }
        debug!("stdin closed");
    });
}

fn install_ctrlc_handler(eb: &EventBus) -> Result<(), ()> {
    let sender = eb.sender();
    ctrlc::set_handler(move || {
        info!("Interrupted, shutting down");
        let _ = sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .map_err(|e| {
        error!("Failed to install Ctrl-C handler. Error: {e}");
    })
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Some(speed) = cli.speed
        && (!speed.is_finite() || speed < 0.0)
    {
        error!("Invalid speed {speed} m/s");
        return Err(());
    }
    let storage_dir = get_storage_dir(&cli)?;
    let target = get_target_source(&cli)?;

    let eb = EventBus::default();
    install_ctrlc_handler(&eb)?;
    let (command_sender, command_receiver) = mpsc::channel(16);
    spawn_stdin_reader(command_sender);

    let mut storage = SettingsStorage::new(&storage_dir, eb.context());
    let mut playback = MockLocationModule::new_with_clock(
        eb.context(),
        GpsdProvider::new(&cli.gpsd_address),
        common::tick_clock::MonotonicClock::new(),
        PlaybackConfig {
            tick_interval: Duration::from_millis(cli.tick_ms),
        },
    );
    let mut controller = Controller::new(
        eb.context(),
        ControllerOptions {
            target,
            speed: cli.speed,
            save_route: cli.save_route.clone(),
            list_routes: cli.list_routes,
        },
        command_receiver,
    );

    info!("Starting modules...");
    let (storage, playback, controller) =
        tokio::join!(storage.run(), playback.run(), controller.run());
    storage.and(playback).and(controller)
}

#[cfg(test)]
mod tests;

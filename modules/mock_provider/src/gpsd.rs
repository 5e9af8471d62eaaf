// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{MockLocationProvider, ProviderError};
use chrono::{DateTime, SecondsFormat, Utc};
use common::fix::Fix;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
};
use tokio::{
    net::{TcpListener, TcpStream},
    sync::{broadcast, oneshot},
    task::{JoinHandle, JoinSet},
};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info, warn};

/// Default address gpsd listens on.
pub const DEFAULT_GPSD_ADDRESS: &str = "127.0.0.1:2947";
/// Device path reported to gpsd clients.
pub const DEFAULT_DEVICE: &str = "mock";

const RELEASE: &str = "3.25";
const PROTO_MAJOR: u8 = 3;
const PROTO_MINOR: u8 = 15;
const MAX_COMMAND_LENGTH: usize = 1024;
const MODE_3D_FIX: u8 = 3;

#[derive(Serialize)]
struct VersionReport {
    class: &'static str,
    release: &'static str,
    rev: &'static str,
    proto_major: u8,
    proto_minor: u8,
}

#[derive(Serialize)]
struct DeviceReport<'a> {
    class: &'static str,
    path: &'a str,
    driver: &'static str,
    activated: String,
}

#[derive(Serialize)]
struct DevicesReport<'a> {
    class: &'static str,
    devices: Vec<DeviceReport<'a>>,
}

#[derive(Serialize)]
struct WatchReport {
    class: &'static str,
    enable: bool,
    json: bool,
}

#[derive(Serialize)]
struct TpvReport<'a> {
    class: &'static str,
    device: &'a str,
    mode: u8,
    time: String,
    lat: f64,
    lon: f64,
    alt: f64,
    #[serde(rename = "altHAE")]
    alt_hae: f64,
    track: f64,
    speed: f64,
    epx: f64,
    epy: f64,
    epv: f64,
    eps: f64,
    epd: f64,
}

#[derive(Serialize)]
struct PollReport<'a> {
    class: &'static str,
    time: String,
    active: usize,
    tpv: Vec<TpvReport<'a>>,
}

#[derive(Serialize)]
struct ErrorReport<'a> {
    class: &'static str,
    message: &'a str,
}

/// Arguments of a `?WATCH=` command, missing fields keep gpsd's defaults.
#[derive(Deserialize, Default)]
struct WatchRequest {
    enable: Option<bool>,
}

fn gpsd_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn tpv_report<'a>(device: &'a str, fix: &Fix) -> TpvReport<'a> {
    TpvReport {
        class: "TPV",
        device,
        mode: MODE_3D_FIX,
        time: gpsd_time(&fix.timestamp()),
        lat: fix.latitude(),
        lon: fix.longitude(),
        alt: fix.altitude(),
        alt_hae: fix.altitude(),
        track: fix.bearing(),
        speed: fix.speed(),
        epx: fix.accuracy(),
        epy: fix.accuracy(),
        epv: fix.vertical_accuracy(),
        eps: fix.speed_accuracy(),
        epd: fix.bearing_accuracy(),
    }
}

fn to_line<T: Serialize>(report: &T) -> String {
    serde_json::to_string(report).unwrap_or_else(|e| {
        error!("Failed to serialize gpsd report. Error: {e}");
        String::from(r#"{"class":"ERROR","message":"internal error"}"#)
    })
}

/// State shared between the provider and the connected clients.
struct Shared {
    device: String,
    activated: DateTime<Utc>,
    last_fix: RwLock<Option<Fix>>,
}

impl Shared {
    fn version(&self) -> String {
        to_line(&VersionReport {
            class: "VERSION",
            release: RELEASE,
            rev: RELEASE,
            proto_major: PROTO_MAJOR,
            proto_minor: PROTO_MINOR,
        })
    }

    fn devices(&self) -> String {
        to_line(&DevicesReport {
            class: "DEVICES",
            devices: vec![DeviceReport {
                class: "DEVICE",
                path: &self.device,
                driver: "mock",
                activated: gpsd_time(&self.activated),
            }],
        })
    }

    fn poll(&self) -> String {
        let last_fix = *self.last_fix.read().unwrap_or_else(|e| e.into_inner());
        let tpv: Vec<TpvReport> = last_fix
            .iter()
            .map(|fix| tpv_report(&self.device, fix))
            .collect();
        to_line(&PollReport {
            class: "POLL",
            time: gpsd_time(&Utc::now()),
            active: 1,
            tpv,
        })
    }

    /// Executes the `;` separated commands of one client line.
    ///
    /// Returns the reply lines and updates the `watching` flag of the client.
    fn handle_commands(&self, line: &str, watching: &mut bool) -> Vec<String> {
        let mut replies = vec![];
        for command in line.split(';').map(str::trim).filter(|c| !c.is_empty()) {
            let (name, args) = command.split_once('=').unwrap_or((command, ""));
            match name {
                "?WATCH" => {
                    let request = if args.is_empty() {
                        WatchRequest::default()
                    } else {
                        match serde_json::from_str::<WatchRequest>(args) {
                            Ok(request) => request,
                            Err(e) => {
                                replies.push(to_line(&ErrorReport {
                                    class: "ERROR",
                                    message: &format!("Invalid WATCH: {e}"),
                                }));
                                continue;
                            }
                        }
                    };
                    *watching = request.enable.unwrap_or(true);
                    if *watching {
                        replies.push(self.devices());
                    }
                    replies.push(to_line(&WatchReport {
                        class: "WATCH",
                        enable: *watching,
                        json: true,
                    }));
                }
                "?VERSION" => replies.push(self.version()),
                "?DEVICES" => replies.push(self.devices()),
                "?POLL" => replies.push(self.poll()),
                _ => replies.push(to_line(&ErrorReport {
                    class: "ERROR",
                    message: &format!("Unrecognized request '{name}'"),
                })),
            }
        }
        replies
    }
}

async fn serve_client(
    stream: TcpStream,
    shared: Arc<Shared>,
    mut reports: broadcast::Receiver<Arc<String>>,
) {
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_COMMAND_LENGTH));
    if let Err(e) = framed.send(shared.version()).await {
        warn!("Failed to greet gpsd client. Error: {e}");
        return;
    }
    let mut watching = false;
    loop {
        tokio::select! {
            command = framed.next() => match command {
                Some(Ok(line)) => {
                    debug!("gpsd client command: {line}");
                    for reply in shared.handle_commands(&line, &mut watching) {
                        if let Err(e) = framed.send(reply).await {
                            warn!("Failed to reply to gpsd client. Error: {e}");
                            return;
                        }
                    }
                }
                Some(Err(e)) => {
                    warn!("gpsd client receive error {e:?}");
                    return;
                }
                None => {
                    debug!("gpsd client disconnected");
                    return;
                }
            },
            report = reports.recv() => match report {
                Ok(line) if watching => {
                    if let Err(e) = framed.send(line.as_str()).await {
                        warn!("Failed to send report to gpsd client. Error: {e}");
                        return;
                    }
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("gpsd client lagged behind, {skipped} reports dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return,
            }
        }
    }
}

async fn accept_clients(
    listener: TcpListener,
    shared: Arc<Shared>,
    reports: broadcast::Sender<Arc<String>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut clients = JoinSet::new();
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, address)) => {
                    info!("gpsd client {address} connected");
                    clients.spawn(serve_client(stream, shared.clone(), reports.subscribe()));
                }
                Err(e) => error!("Failed to accept gpsd client. Error: {e}"),
            },
            Some(_) = clients.join_next(), if !clients.is_empty() => {}
        }
    }
    drop(listener);
    clients.shutdown().await;
    debug!("gpsd server closed");
}

/// A running gpsd server.
///
/// [`GpsdServer::close`] returns once the listener and every client are
/// closed. Dropping it only aborts the accept task.
struct GpsdServer {
    local_addr: SocketAddr,
    shared: Arc<Shared>,
    reports: broadcast::Sender<Arc<String>>,
    shutdown: Option<oneshot::Sender<()>>,
    accept_task: JoinHandle<()>,
}

impl GpsdServer {
    async fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.accept_task).await {
            warn!("gpsd server task ended abnormally. Error: {e}");
        }
    }
}

impl Drop for GpsdServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

/// A [`MockLocationProvider`] that impersonates gpsd.
///
/// Registering the provider binds a TCP listener that speaks the gpsd JSON
/// protocol. Clients get the `VERSION` banner on connect and, once they
/// sent `?WATCH`, a `TPV` report for every mocked fix. Any gpsd client
/// (cgps, gpsmon, navigation software, ...) pointed at the address
/// therefore sees the mocked location as the receiver position.
pub struct GpsdProvider {
    address: String,
    device: String,
    server: Option<GpsdServer>,
    enabled: bool,
}

impl GpsdProvider {
    /// Creates a provider that listens on `address` once registered.
    pub fn new(address: &str) -> Self {
        GpsdProvider {
            address: address.to_string(),
            device: DEFAULT_DEVICE.to_string(),
            server: None,
            enabled: false,
        }
    }

    /// Returns the bound address while the provider is registered.
    ///
    /// Useful when the provider was created with port `0`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.as_ref().map(|server| server.local_addr)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[async_trait::async_trait]
impl MockLocationProvider for GpsdProvider {
    async fn add_test_provider(&mut self) -> Result<(), ProviderError> {
        if self.server.is_some() {
            return Err(ProviderError::AlreadyRegistered);
        }
        let listener = TcpListener::bind(&self.address).await?;
        let local_addr = listener.local_addr()?;
        let shared = Arc::new(Shared {
            device: self.device.clone(),
            activated: Utc::now(),
            last_fix: RwLock::new(None),
        });
        let (reports, _) = broadcast::channel(16);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let accept_task = tokio::spawn(accept_clients(
            listener,
            shared.clone(),
            reports.clone(),
            shutdown_rx,
        ));
        info!("gpsd mock provider listening on {local_addr}");
        self.server = Some(GpsdServer {
            local_addr,
            shared,
            reports,
            shutdown: Some(shutdown),
            accept_task,
        });
        self.enabled = false;
        Ok(())
    }

    async fn set_enabled(&mut self, enabled: bool) -> Result<(), ProviderError> {
        if self.server.is_none() {
            return Err(ProviderError::NotRegistered);
        }
        self.enabled = enabled;
        debug!("gpsd mock provider enabled: {enabled}");
        Ok(())
    }

    async fn set_location(&mut self, fix: &Fix) -> Result<(), ProviderError> {
        let Some(server) = &self.server else {
            return Err(ProviderError::NotRegistered);
        };
        if !self.enabled {
            return Err(ProviderError::Disabled);
        }
        *server
            .shared
            .last_fix
            .write()
            .unwrap_or_else(|e| e.into_inner()) = Some(*fix);
        let line = Arc::new(to_line(&tpv_report(&server.shared.device, fix)));
        // no receiver just means no client is connected
        let _ = server.reports.send(line);
        Ok(())
    }

    async fn remove_test_provider(&mut self) -> Result<(), ProviderError> {
        let Some(mut server) = self.server.take() else {
            return Err(ProviderError::NotRegistered);
        };
        self.enabled = false;
        server.close().await;
        info!("gpsd mock provider on {} removed", server.local_addr);
        Ok(())
    }
}

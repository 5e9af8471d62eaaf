// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Storage Modul for the mock location settings
//!
//! Persists the user settings and the saved routes in a flat key-value JSON file.

use common::{
    location_target::SavedRoute,
    settings::{DEFAULT_CLEAR_ROUTE_ON_STOP, DEFAULT_SPEED_METERS_PER_SEC, Settings},
};
use module_core::{
    EmptyRequestPtr, EventKind, LoadSavedRoutesResponsePtr, LoadSettingsResponsePtr, ModuleCtx,
    Response, RouteRequestPtr, SaveSettingsRequestPtr, StorageResponsePtr,
};
use serde_json::{Map, Value};
use std::{
    fs::DirBuilder,
    io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    sync::broadcast::error::RecvError,
};
use tracing::{debug, error, info, warn};

/// Name of the settings file inside the storage root directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

const KEY_CLEAR_ROUTE_ON_STOP: &str = "clear_route_on_stop";
const KEY_SPEED_METERS_PER_SEC: &str = "speed_meters_per_sec";
const KEY_SAVED_ROUTES_JSON: &str = "saved_routes_json";

type Values = Map<String, Value>;

/// A file based key-value storage for [`Settings`] and [`SavedRoute`]s.
///
/// All values live in one JSON object stored in `<root_dir>/settings.json`:
///
/// ```json
/// {
///   "clear_route_on_stop": true,
///   "speed_meters_per_sec": 30.0,
///   "saved_routes_json": "[{\"name\":\"Home\",\"points\":[...]}]"
/// }
/// ```
///
/// The saved routes are kept as a serialized JSON string under one key.
/// Missing keys load as defaults, a saved routes value that can't be parsed
/// loads as an empty list.
///
/// ## Important
///
/// `SettingsStorage` **does not implement any internal synchronization or locking mechanisms**.
/// Therefore, **only one instance should be used per `root_dir` in the application at any time**.
pub struct SettingsStorage {
    file_path: PathBuf,
    module_ctx: ModuleCtx,
}

impl SettingsStorage {
    pub fn new(root_dir: &Path, ctx: ModuleCtx) -> Self {
        if let Err(e) = DirBuilder::new().recursive(true).create(root_dir) {
            error!(
                "Failed to create storage folder {}. Error: {}",
                root_dir.to_string_lossy(),
                e
            );
        }
        let mut file_path = root_dir.to_path_buf();
        file_path.push(SETTINGS_FILE_NAME);
        info!("Using settings file: {}", file_path.to_string_lossy());
        SettingsStorage {
            file_path,
            module_ctx: ctx,
        }
    }

    /// Reads the stored key-value object.
    ///
    /// A missing file yields an empty object. A file that isn't a JSON
    /// object is logged and treated as empty, so the next save replaces it.
    async fn load_values(&self) -> io::Result<Values> {
        let json = match self.load_file().await {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings file {}", self.file_path.to_string_lossy());
                return Ok(Values::new());
            }
            Err(e) => return Err(e),
        };
        match serde_json::from_str::<Values>(&json) {
            Ok(values) => Ok(values),
            Err(e) => {
                error!(
                    "Failed to parse settings file {}. Error: {}",
                    self.file_path.to_string_lossy(),
                    e
                );
                Ok(Values::new())
            }
        }
    }

    async fn save_values(&self, values: &Values) -> io::Result<()> {
        let json = serde_json::to_string_pretty(values)?;
        self.save_bytes(json.as_bytes()).await
    }

    /// Writes `data` to the settings file and syncs it to disk.
    ///
    /// Errors:
    /// - Returns `io::ErrorKind::NotFound` if the root directory is missing.
    async fn save_bytes(&self, data: &[u8]) -> io::Result<()> {
        let mut file = tokio::fs::File::create(&self.file_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        Ok(())
    }

    async fn load_file(&self) -> io::Result<String> {
        let mut file = tokio::fs::File::open(&self.file_path).await?;
        let mut json = String::default();
        file.read_to_string(&mut json).await?;
        Ok(json)
    }

    async fn load_settings(&self) -> io::Result<Settings> {
        let values = self.load_values().await?;
        Ok(Settings {
            clear_route_on_stop: values
                .get(KEY_CLEAR_ROUTE_ON_STOP)
                .and_then(Value::as_bool)
                .unwrap_or(DEFAULT_CLEAR_ROUTE_ON_STOP),
            speed_meters_per_sec: values
                .get(KEY_SPEED_METERS_PER_SEC)
                .and_then(Value::as_f64)
                .unwrap_or(DEFAULT_SPEED_METERS_PER_SEC),
        })
    }

    async fn save_settings(&self, settings: &Settings) -> io::Result<()> {
        let mut values = self.load_values().await?;
        values.insert(
            KEY_CLEAR_ROUTE_ON_STOP.to_string(),
            Value::from(settings.clear_route_on_stop),
        );
        values.insert(
            KEY_SPEED_METERS_PER_SEC.to_string(),
            Value::from(settings.speed_meters_per_sec),
        );
        self.save_values(&values).await
    }

    async fn load_saved_routes(&self) -> io::Result<Vec<SavedRoute>> {
        let values = self.load_values().await?;
        Ok(saved_routes(&values))
    }

    /// Appends `route` to the saved routes.
    async fn save_route(&self, route: &SavedRoute) -> io::Result<()> {
        let mut values = self.load_values().await?;
        let mut routes = saved_routes(&values);
        routes.push(route.clone());
        set_saved_routes(&mut values, &routes)?;
        self.save_values(&values).await
    }

    /// Removes every saved route equal to `route`.
    ///
    /// Errors:
    /// - Returns `io::ErrorKind::NotFound` if no saved route matches.
    async fn delete_route(&self, route: &SavedRoute) -> io::Result<()> {
        let mut values = self.load_values().await?;
        let mut routes = saved_routes(&values);
        let count = routes.len();
        routes.retain(|saved| saved != route);
        if routes.len() == count {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        set_saved_routes(&mut values, &routes)?;
        self.save_values(&values).await
    }

    fn send_response(&self, kind: EventKind) {
        if let Err(e) = self.module_ctx.publish_event(kind) {
            warn!("Failed to send storage response. Error: {e}");
        }
    }

    fn storage_response(
        req_id: u64,
        receiver_addr: u64,
        result: io::Result<()>,
    ) -> StorageResponsePtr {
        StorageResponsePtr::new(Response::new(
            req_id,
            receiver_addr,
            result.map_err(|e| e.kind()),
        ))
    }

    async fn handle_load_settings_request(&self, req: &EmptyRequestPtr) {
        let settings = match self.load_settings().await {
            Ok(settings) => {
                debug!("Loaded settings {:?}", settings);
                settings
            }
            Err(e) => {
                error!("Failed to load settings, using defaults. Error: {e}");
                Settings::default()
            }
        };
        let resp = LoadSettingsResponsePtr::new(Response::new(req.id, req.sender_addr, settings));
        self.send_response(EventKind::LoadSettingsResponseEvent(resp));
    }

    async fn handle_save_settings_request(&self, req: &SaveSettingsRequestPtr) {
        let result = self.save_settings(&req.data).await;
        match &result {
            Ok(()) => debug!("Stored settings {:?}", req.data),
            Err(e) => error!("Failed to store settings. Error: {e}"),
        }
        let resp = SettingsStorage::storage_response(req.id, req.sender_addr, result);
        self.send_response(EventKind::SaveSettingsResponseEvent(resp));
    }

    async fn handle_load_saved_routes_request(&self, req: &EmptyRequestPtr) {
        let routes = match self.load_saved_routes().await {
            Ok(routes) => {
                debug!("Loaded {} saved route(s)", routes.len());
                routes
            }
            Err(e) => {
                error!("Failed to load saved routes. Error: {e}");
                vec![]
            }
        };
        let resp = LoadSavedRoutesResponsePtr::new(Response::new(
            req.id,
            req.sender_addr,
            Arc::new(routes),
        ));
        self.send_response(EventKind::LoadSavedRoutesResponseEvent(resp));
    }

    async fn handle_save_route_request(&self, req: &RouteRequestPtr) {
        let result = self.save_route(&req.data).await;
        match &result {
            Ok(()) => info!("Saved route \"{}\"", req.data.name),
            Err(e) => error!("Failed to save route \"{}\". Error: {e}", req.data.name),
        }
        let resp = SettingsStorage::storage_response(req.id, req.sender_addr, result);
        self.send_response(EventKind::SaveRouteResponseEvent(resp));
    }

    async fn handle_delete_route_request(&self, req: &RouteRequestPtr) {
        let result = self.delete_route(&req.data).await;
        match &result {
            Ok(()) => info!("Deleted route \"{}\"", req.data.name),
            Err(e) => debug!("Failed to delete route \"{}\". Error: {e}", req.data.name),
        }
        let resp = SettingsStorage::storage_response(req.id, req.sender_addr, result);
        self.send_response(EventKind::DeleteRouteResponseEvent(resp));
    }
}

/// Parses the saved routes blob, an unreadable blob yields no routes.
fn saved_routes(values: &Values) -> Vec<SavedRoute> {
    let Some(blob) = values.get(KEY_SAVED_ROUTES_JSON) else {
        return vec![];
    };
    let Some(json) = blob.as_str() else {
        error!("Saved routes are not stored as JSON string");
        return vec![];
    };
    serde_json::from_str::<Vec<SavedRoute>>(json).unwrap_or_else(|e| {
        error!("Failed to parse saved routes. Error: {e}");
        vec![]
    })
}

fn set_saved_routes(values: &mut Values, routes: &[SavedRoute]) -> io::Result<()> {
    let json = serde_json::to_string(routes)?;
    values.insert(KEY_SAVED_ROUTES_JSON.to_string(), Value::from(json));
    Ok(())
}

#[async_trait::async_trait]
impl module_core::Module for SettingsStorage {
    async fn run(&mut self) -> Result<(), ()> {
        let mut run = true;
        while run {
            tokio::select! {
                event = self.module_ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            match event.kind {
                                EventKind::QuitEvent => run = false,
                                EventKind::LoadSettingsRequestEvent(request) => {
                                    self.handle_load_settings_request(&request).await;
                                },
                                EventKind::SaveSettingsRequestEvent(request) => {
                                    self.handle_save_settings_request(&request).await;
                                },
                                EventKind::LoadSavedRoutesRequestEvent(request) => {
                                    self.handle_load_saved_routes_request(&request).await;
                                },
                                EventKind::SaveRouteRequestEvent(request) => {
                                    self.handle_save_route_request(&request).await;
                                },
                                EventKind::DeleteRouteRequestEvent(request) => {
                                    self.handle_delete_route_request(&request).await;
                                },
                                _ => ()
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!("Storage lagged behind, {skipped} events dropped");
                        }
                        Err(RecvError::Closed) => {
                            error!("Event bus closed");
                            return Err(());
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;

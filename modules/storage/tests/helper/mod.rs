// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use module_core::{EventBus, Module};
use std::path::PathBuf;
use storage::{SETTINGS_FILE_NAME, SettingsStorage};
use tokio::task::JoinHandle;

pub fn get_path(folder_name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push("mock-locations");
    path.push(folder_name);
    path
}

pub fn get_settings_file(folder_name: &str) -> PathBuf {
    let mut path = get_path(folder_name);
    path.push(SETTINGS_FILE_NAME);
    path
}

pub fn setup_empty_test_folder(folder_name: &str) {
    let path = get_path(folder_name);
    if let Ok(true) = std::fs::exists(&path) {
        std::fs::remove_dir_all(&path)
            .unwrap_or_else(|_| panic!("Failed to cleanup test dir {}", path.to_string_lossy()));
    }
    std::fs::create_dir_all(&path).unwrap_or_else(|err| {
        panic!(
            "Failed to create test dir for {}. Reason: {err}",
            path.to_string_lossy()
        )
    });
}

pub fn write_settings_file(folder_name: &str, content: &str) {
    let path = get_settings_file(folder_name);
    std::fs::write(&path, content).unwrap_or_else(|e| {
        panic!(
            "Failed to write settings file {}. Error: {e}",
            path.to_string_lossy()
        )
    });
}

pub fn create_storage_module(folder: &str, event_bus: &EventBus) -> JoinHandle<Result<(), ()>> {
    let ctx = event_bus.context();
    let folder = get_path(folder);
    let storage = SettingsStorage::new(&folder, ctx);
    tokio::spawn(async move {
        let mut storage = storage;
        storage.run().await
    })
}

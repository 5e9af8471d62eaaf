// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{MockLocationProvider, ProviderError};
use common::fix::Fix;
use std::sync::{Arc, Mutex};

/// A call received by a [`RecordingProvider`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    Add,
    SetEnabled(bool),
    SetLocation(Fix),
    Remove,
}

/// The failure a [`RecordingProvider`] shall report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InjectedFailure {
    /// Every call fails with [`ProviderError::PermissionDenied`].
    PermissionDenied,
    /// `set_location` fails with an I/O error the given number of times.
    TransientLocationErrors(usize),
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<ProviderCall>,
    registered: bool,
    enabled: bool,
    failure: Option<InjectedFailure>,
}

/// In-memory [`MockLocationProvider`] that records every call.
///
/// It follows the provider lifecycle rules (e.g. removing an unregistered
/// provider fails with [`ProviderError::NotRegistered`]) and can inject
/// failures. Clones share the same recording, so a test keeps a clone
/// while the original is moved into the module under test.
#[derive(Debug, Clone, Default)]
pub struct RecordingProvider {
    recording: Arc<Mutex<Recording>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        RecordingProvider::default()
    }

    pub fn with_failure(failure: InjectedFailure) -> Self {
        let provider = RecordingProvider::default();
        provider.inject_failure(Some(failure));
        provider
    }

    pub fn inject_failure(&self, failure: Option<InjectedFailure>) {
        self.lock().failure = failure;
    }

    /// Returns all calls received so far.
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    /// Returns the fixes handed to `set_location` in order.
    pub fn fixes(&self) -> Vec<Fix> {
        self.lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                ProviderCall::SetLocation(fix) => Some(*fix),
                _ => None,
            })
            .collect()
    }

    pub fn is_registered(&self) -> bool {
        self.lock().registered
    }

    pub fn is_enabled(&self) -> bool {
        self.lock().enabled
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recording> {
        self.recording.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn permission_denied() -> ProviderError {
    ProviderError::PermissionDenied(String::from("mock locations not allowed"))
}

#[async_trait::async_trait]
impl MockLocationProvider for RecordingProvider {
    async fn add_test_provider(&mut self) -> Result<(), ProviderError> {
        let mut recording = self.lock();
        recording.calls.push(ProviderCall::Add);
        if recording.failure == Some(InjectedFailure::PermissionDenied) {
            return Err(permission_denied());
        }
        if recording.registered {
            return Err(ProviderError::AlreadyRegistered);
        }
        recording.registered = true;
        Ok(())
    }

    async fn set_enabled(&mut self, enabled: bool) -> Result<(), ProviderError> {
        let mut recording = self.lock();
        recording.calls.push(ProviderCall::SetEnabled(enabled));
        if recording.failure == Some(InjectedFailure::PermissionDenied) {
            return Err(permission_denied());
        }
        if !recording.registered {
            return Err(ProviderError::NotRegistered);
        }
        recording.enabled = enabled;
        Ok(())
    }

    async fn set_location(&mut self, fix: &Fix) -> Result<(), ProviderError> {
        let mut recording = self.lock();
        recording.calls.push(ProviderCall::SetLocation(*fix));
        match recording.failure {
            Some(InjectedFailure::PermissionDenied) => return Err(permission_denied()),
            Some(InjectedFailure::TransientLocationErrors(remaining)) if remaining > 0 => {
                recording.failure = Some(InjectedFailure::TransientLocationErrors(remaining - 1));
                return Err(ProviderError::Io(std::io::Error::other("location rejected")));
            }
            _ => (),
        }
        if !recording.registered {
            return Err(ProviderError::NotRegistered);
        }
        if !recording.enabled {
            return Err(ProviderError::Disabled);
        }
        Ok(())
    }

    async fn remove_test_provider(&mut self) -> Result<(), ProviderError> {
        let mut recording = self.lock();
        recording.calls.push(ProviderCall::Remove);
        if !recording.registered {
            return Err(ProviderError::NotRegistered);
        }
        recording.registered = false;
        recording.enabled = false;
        Ok(())
    }
}

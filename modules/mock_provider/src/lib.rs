// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Mock location provider
//!
//! Provides the interface to the hook that substitutes real GPS fixes with
//! mocked ones, and a gpsd compatible implementation of it.

use common::fix::Fix;

pub mod gpsd;
pub mod test_helper;

/// Errors reported by a [`MockLocationProvider`].
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The application is not allowed to mock locations. Retrying does not help.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Mock location provider is not registered")]
    NotRegistered,

    #[error("Mock location provider is already registered")]
    AlreadyRegistered,

    #[error("Mock location provider is disabled")]
    Disabled,

    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl ProviderError {
    /// Returns `true` for errors that end mocking for good.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ProviderError::PermissionDenied(_))
    }
}

impl From<std::io::Error> for ProviderError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ProviderError::PermissionDenied(e.to_string())
        } else {
            ProviderError::Io(e)
        }
    }
}

/// The hook through which mocked fixes reach location consumers.
///
/// The lifecycle mirrors a test provider of a location service: register
/// it, enable it, push fixes, and finally remove it again. Removing it
/// must restore the state before registration.
#[async_trait::async_trait]
pub trait MockLocationProvider: Send {
    /// Registers the mock location provider.
    ///
    /// # Errors
    /// * [`ProviderError::AlreadyRegistered`] if it is registered already.
    /// * [`ProviderError::PermissionDenied`] if mocking is not authorized.
    async fn add_test_provider(&mut self) -> Result<(), ProviderError>;

    /// Enables or disables a registered provider.
    async fn set_enabled(&mut self, enabled: bool) -> Result<(), ProviderError>;

    /// Reports `fix` to every location consumer.
    ///
    /// # Errors
    /// * [`ProviderError::NotRegistered`] if the provider is not registered.
    /// * [`ProviderError::Disabled`] if the provider is disabled.
    async fn set_location(&mut self, fix: &Fix) -> Result<(), ProviderError>;

    /// Unregisters the provider.
    ///
    /// # Errors
    /// * [`ProviderError::NotRegistered`] if there is nothing to remove.
    async fn remove_test_provider(&mut self) -> Result<(), ProviderError>;
}

#[async_trait::async_trait]
impl<P: MockLocationProvider + ?Sized> MockLocationProvider for Box<P> {
    async fn add_test_provider(&mut self) -> Result<(), ProviderError> {
        (**self).add_test_provider().await
    }

    async fn set_enabled(&mut self, enabled: bool) -> Result<(), ProviderError> {
        (**self).set_enabled(enabled).await
    }

    async fn set_location(&mut self, fix: &Fix) -> Result<(), ProviderError> {
        (**self).set_location(fix).await
    }

    async fn remove_test_provider(&mut self) -> Result<(), ProviderError> {
        (**self).remove_test_provider().await
    }
}

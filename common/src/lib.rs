// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common module for mock locations
//!
//! Provides the common data types that are used across every module.

pub mod coordinates;
pub mod fix;
pub mod location_target;
pub mod notification;
pub mod playback_state;
pub mod serde;
pub mod settings;
pub mod test_helper;
pub mod tick_clock;

#[cfg(test)]
mod tests;

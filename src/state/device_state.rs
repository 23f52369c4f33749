// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State shared by every device.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ConnectionStatus, DeviceStatus, Timer};

/// Whether the device has been refreshed since it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StatePhase {
    /// Only the device list entry is known.
    #[default]
    Unknown,
    /// At least one refresh succeeded.
    Known,
}

/// Common state of a device.
///
/// Seeded from the device list entry and replaced field by field by
/// refreshes and command acknowledgements.
///
/// # Examples
///
/// ```
/// use vesync_lib::state::{DeviceState, StatePhase};
/// use vesync_lib::types::{ConnectionStatus, DeviceStatus};
///
/// let mut state = DeviceState::from_descriptor("on", "online");
/// assert_eq!(state.phase(), StatePhase::Unknown);
/// assert!(state.is_on());
///
/// state.mark_refreshed();
/// assert_eq!(state.phase(), StatePhase::Known);
///
/// state.mark_offline();
/// assert_eq!(state.connection_status(), ConnectionStatus::Offline);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceState {
    device_status: DeviceStatus,
    connection_status: ConnectionStatus,
    phase: StatePhase,
    active_time: Option<i64>,
    last_update: Option<DateTime<Utc>>,
    timer: Option<Timer>,
}

impl DeviceState {
    /// Creates state from device list status strings.
    #[must_use]
    pub fn from_descriptor(device_status: &str, connection_status: &str) -> Self {
        Self {
            device_status: DeviceStatus::from_wire(device_status),
            connection_status: ConnectionStatus::from_wire(connection_status),
            ..Self::default()
        }
    }

    // ========== Accessors ==========

    /// Power status.
    #[must_use]
    pub const fn device_status(&self) -> DeviceStatus {
        self.device_status
    }

    /// Cloud connection status.
    #[must_use]
    pub const fn connection_status(&self) -> ConnectionStatus {
        self.connection_status
    }

    /// Refresh phase.
    #[must_use]
    pub const fn phase(&self) -> StatePhase {
        self.phase
    }

    /// Minutes since switched on, where reported.
    #[must_use]
    pub const fn active_time(&self) -> Option<i64> {
        self.active_time
    }

    /// Time of the last successful refresh.
    #[must_use]
    pub const fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    /// Last known countdown timer; `None` until fetched or when none runs.
    #[must_use]
    pub const fn timer(&self) -> Option<&Timer> {
        self.timer.as_ref()
    }

    /// Returns `true` if the device is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.device_status.is_on()
    }

    /// Returns `true` if the device is online.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        self.connection_status.is_online()
    }

    // ========== Updates ==========

    /// Sets the power status.
    pub fn set_device_status(&mut self, status: DeviceStatus) {
        self.device_status = status;
    }

    /// Sets the connection status.
    pub fn set_connection_status(&mut self, status: ConnectionStatus) {
        self.connection_status = status;
    }

    /// Sets the active time.
    pub fn set_active_time(&mut self, minutes: i64) {
        self.active_time = Some(minutes);
    }

    /// Replaces the timer.
    pub fn set_timer(&mut self, timer: Option<Timer>) {
        self.timer = timer;
    }

    /// Records a successful refresh.
    ///
    /// A reply means the device is reachable, so the connection status
    /// becomes online.
    pub fn mark_refreshed(&mut self) {
        self.phase = StatePhase::Known;
        self.connection_status = ConnectionStatus::Online;
        self.last_update = Some(Utc::now());
    }

    /// Records that the server reported the device unreachable.
    pub fn mark_offline(&mut self) {
        self.connection_status = ConnectionStatus::Offline;
    }
}

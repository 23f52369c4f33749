// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power and connection status of a device.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reported power status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Device is switched on.
    On,
    /// Device is switched off.
    Off,
    /// Status has not been reported yet.
    #[default]
    Unknown,
}

impl DeviceStatus {
    /// Parses the status strings used by the cloud API.
    ///
    /// Anything other than `on`/`off` (case-insensitive) maps to `Unknown`.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("on") {
            Self::On
        } else if value.eq_ignore_ascii_case("off") {
            Self::Off
        } else {
            Self::Unknown
        }
    }

    /// Converts a boolean switch state.
    #[must_use]
    pub const fn from_bool(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` if the device is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported cloud connection status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Device is connected to the cloud.
    Online,
    /// Device is not connected.
    Offline,
    /// Status has not been reported yet.
    #[default]
    Unknown,
}

impl ConnectionStatus {
    /// Parses the status strings used by the cloud API.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        if value.eq_ignore_ascii_case("online") {
            Self::Online
        } else if value.eq_ignore_ascii_case("offline") {
            Self::Offline
        } else {
            Self::Unknown
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }

    /// Returns `true` if the device is online.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

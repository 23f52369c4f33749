// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet event types.

use crate::capabilities::DeviceFamily;

use super::DeviceKey;

/// Events emitted by the fleet manager.
///
/// # Examples
///
/// ```
/// use vesync_lib::capabilities::DeviceFamily;
/// use vesync_lib::event::{DeviceKey, FleetEvent};
///
/// let key = DeviceKey::new("cid-1", None);
/// let added = FleetEvent::DeviceAdded {
///     key: key.clone(),
///     name: "Kitchen".to_string(),
///     family: DeviceFamily::Outlet,
/// };
/// assert_eq!(added.key(), &key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FleetEvent {
    /// A device appeared in the device list.
    DeviceAdded {
        /// Fleet key.
        key: DeviceKey,
        /// Display name.
        name: String,
        /// Device family.
        family: DeviceFamily,
    },

    /// A device disappeared from the device list.
    DeviceRemoved {
        /// Fleet key.
        key: DeviceKey,
    },

    /// A refresh changed the device's connection status.
    ConnectionChanged {
        /// Fleet key.
        key: DeviceKey,
        /// Whether the device is now online.
        online: bool,
    },

    /// A refresh failed.
    UpdateFailed {
        /// Fleet key.
        key: DeviceKey,
        /// Rendered error.
        error: String,
    },
}

impl FleetEvent {
    /// Returns the key of the device this event concerns.
    #[must_use]
    pub fn key(&self) -> &DeviceKey {
        match self {
            Self::DeviceAdded { key, .. }
            | Self::DeviceRemoved { key }
            | Self::ConnectionChanged { key, .. }
            | Self::UpdateFailed { key, .. } => key,
        }
    }

    /// Creates a `DeviceRemoved` event.
    #[must_use]
    pub fn device_removed(key: DeviceKey) -> Self {
        Self::DeviceRemoved { key }
    }

    /// Creates an `UpdateFailed` event from an error.
    #[must_use]
    pub fn update_failed(key: DeviceKey, error: &crate::Error) -> Self {
        Self::UpdateFailed {
            key,
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn key_of_every_variant() {
        let key = DeviceKey::new("c", Some(1));
        assert_eq!(FleetEvent::device_removed(key.clone()).key(), &key);
        let failed = FleetEvent::update_failed(key.clone(), &Error::DeviceNotFound);
        assert_eq!(failed.key(), &key);
        assert!(matches!(failed, FleetEvent::UpdateFailed { ref error, .. } if error == "device not found"));
    }
}

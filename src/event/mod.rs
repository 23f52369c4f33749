// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet events.
//!
//! The fleet manager publishes a [`FleetEvent`] on an [`EventBus`] when a
//! device list fetch adds or removes devices and when a refresh fails or
//! changes a device's connection status.
//!
//! # Examples
//!
//! ```
//! use vesync_lib::event::{DeviceKey, EventBus, FleetEvent};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.publish(FleetEvent::device_removed(DeviceKey::new("cid-1", None)));
//! ```

mod device_key;
mod event_bus;
mod fleet_event;

pub use device_key::DeviceKey;
pub use event_bus::EventBus;
pub use fleet_event::FleetEvent;

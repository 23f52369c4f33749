// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet manager for one VeSync account.
//!
//! [`VeSync`] logs in, fetches the account's device list, keeps one
//! handle per device and refreshes them concurrently.
//!
//! # Examples
//!
//! ## Discovery and refresh
//!
//! ```no_run
//! use vesync_lib::manager::{ManagerConfig, Region, VeSync};
//!
//! #[tokio::main]
//! async fn main() -> vesync_lib::Result<()> {
//!     let config = ManagerConfig::new().with_region(Region::Eu);
//!     let manager = VeSync::new(config)?;
//!     manager.login("user@example.com", "secret").await?;
//!     manager.get_devices().await?;
//!     manager.update().await;
//!
//!     for device in manager.devices() {
//!         println!("{} online={}", device.name(), device.is_online());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Fleet events
//!
//! ```no_run
//! use vesync_lib::event::FleetEvent;
//! use vesync_lib::manager::{ManagerConfig, VeSync};
//!
//! # fn example() -> vesync_lib::Result<()> {
//! let manager = VeSync::new(ManagerConfig::new())?;
//! let mut events = manager.subscribe();
//!
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         match event {
//!             FleetEvent::DeviceAdded { key, name, .. } => println!("{key} added: {name}"),
//!             FleetEvent::UpdateFailed { key, error } => println!("{key}: {error}"),
//!             _ => {}
//!         }
//!     }
//! });
//! # Ok(())
//! # }
//! ```

mod config;
mod fleet;
mod session;

pub use config::{ManagerConfig, Region};
pub use fleet::{FleetDiff, UpdateReport, VeSync};
pub use session::hash_password;

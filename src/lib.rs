// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `VeSync` Lib - A Rust library to control VeSync cloud devices.
//!
//! This library provides async APIs for the outlets, switches, bulbs,
//! humidifiers, air purifiers, fans and thermostats sold under the
//! Etekcity and Levoit brands, through the VeSync cloud.
//!
//! # Supported Features
//!
//! - **Discovery**: login, paged device list, fleet reconciliation
//! - **Power control**: every family with an on/off switch
//! - **Light control**: brightness, color temperature, RGB and HSV colors
//! - **Air control**: fan levels, purifier and humidifier modes, mist levels
//! - **Energy monitoring**: power, voltage and daily energy of metering plugs
//! - **Thermostats**: work and fan modes, setpoint holds, eco types, keypad lock
//!
//! Which operations a device offers is decided by its model. Every model
//! in the [`registry`] declares a set of [`Feature`]s and the legal values
//! for its commands; operations outside that set fail before any request
//! is sent.
//!
//! # Quick Start
//!
//! ```no_run
//! use vesync_lib::manager::{ManagerConfig, VeSync};
//!
//! #[tokio::main]
//! async fn main() -> vesync_lib::Result<()> {
//!     let manager = VeSync::new(ManagerConfig::new())?;
//!     manager.login("user@example.com", "secret").await?;
//!     manager.get_devices().await?;
//!     manager.update().await;
//!
//!     for device in manager.devices() {
//!         if let Some(switch) = device.as_toggleable() {
//!             switch.turn_off().await?;
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Family-specific control
//!
//! ```no_run
//! use vesync_lib::types::PurifierMode;
//! use vesync_lib::manager::VeSync;
//!
//! # async fn example(manager: &VeSync) -> vesync_lib::Result<()> {
//! for device in manager.devices() {
//!     if let Some(purifier) = device.as_purifier() {
//!         purifier.set_mode(PurifierMode::Manual).await?;
//!         purifier.set_fan_speed(Some(2)).await?;
//!         println!("air quality: {:?}", purifier.details().air_quality());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom transport
//!
//! The core of the library runs over any [`protocol::Transport`]; the
//! reqwest transport is behind the default `http` feature.
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use vesync_lib::error::TransportError;
//! use vesync_lib::manager::{ManagerConfig, VeSync};
//! use vesync_lib::protocol::{HttpMethod, RawResponse, Transport};
//!
//! #[derive(Debug)]
//! struct Offline;
//!
//! #[async_trait]
//! impl Transport for Offline {
//!     async fn perform_request(
//!         &self,
//!         _method: HttpMethod,
//!         _path: &str,
//!         _headers: &[(&str, &str)],
//!         _body: Vec<u8>,
//!     ) -> Result<RawResponse, TransportError> {
//!         Err(TransportError::ConnectionFailed("offline".into()))
//!     }
//! }
//!
//! let manager = VeSync::with_transport(ManagerConfig::new(), Arc::new(Offline));
//! assert_eq!(manager.device_count(), 0);
//! ```

pub mod capabilities;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod registry;
pub mod response;
pub mod state;
pub mod types;

pub use capabilities::{DeviceFamily, Feature, FeatureMap, FeatureSet};
pub use device::{
    Bulb, ColorControllable, Device, DeviceInfo, Dimmable, EnergyMonitoring, Fan, Humidifier,
    Outlet, Purifier, Schedulable, Switch, Thermostat, Toggleable, VeSyncDevice,
};
pub use error::{
    ApiError, AuthError, DecodeError, Error, Result, TransportError, ValidationError,
};
pub use event::{DeviceKey, FleetEvent};
pub use manager::{FleetDiff, ManagerConfig, Region, UpdateReport, VeSync};
pub use state::{DeviceState, StatePhase, Supported};

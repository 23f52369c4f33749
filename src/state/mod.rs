// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state types.
//!
//! [`DeviceState`] holds what every device reports (power, connection,
//! refresh phase). The family states hold model-specific readings; any
//! field whose feature the model lacks reads [`Supported::NotSupported`].
//!
//! # Examples
//!
//! ```
//! use vesync_lib::state::Supported;
//!
//! let level: Supported<u8> = Supported::Value(3);
//! assert_eq!(level.get(), Some(3));
//! assert_eq!(Supported::<u8>::NotSupported.to_string(), "not supported");
//! ```

mod device_state;
mod family;
mod supported;

pub use device_state::{DeviceState, StatePhase};
pub use family::{
    BulbState, EnergyPeriod, EnergyReading, FanState, HumidifierState, OutletState, PurifierState,
    SwitchState, ThermostatState,
};
pub use supported::Supported;

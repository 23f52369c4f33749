// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the registry, the wire models and the devices.
//!
//! Every constrained value validates on construction and reports failures
//! as [`ValidationError`](crate::error::ValidationError), so invalid input
//! is rejected before a request envelope is ever built.

mod color;
mod level;
mod modes;
mod status;
mod thermostat;
mod timer;

pub use color::{
    COLOR_TEMP_MAX_KELVIN, COLOR_TEMP_MIN_KELVIN, Color, ColorMode, HsvColor, RgbColor,
    kelvin_to_percent, percent_to_kelvin,
};
pub use level::{LevelRange, bump_level};
pub use modes::{AutoPreference, FanMode, HumidifierMode, NightlightMode, PurifierMode};
pub use status::{ConnectionStatus, DeviceStatus};
pub use thermostat::{
    EcoType, HoldOption, RoutineType, ThermostatFanMode, ThermostatRoutine, ThermostatWorkMode,
    WorkStatus,
};
pub use timer::{Timer, TimerAction};

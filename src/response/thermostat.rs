// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat result shapes.

use serde::{Deserialize, Serialize};

use crate::capabilities::DeviceFamily;
use crate::types::ThermostatRoutine;

use super::de;
use super::shape::{Candidate, FamilyResult};

/// `getTsStatus` reply of the Aura thermostat.
///
/// Modes are numeric codes; see [`crate::types::ThermostatWorkMode`] and
/// its siblings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatStatus {
    /// Work mode codes the installation supports.
    #[serde(default)]
    pub support_mode: Vec<u8>,
    /// Work mode code.
    #[serde(deserialize_with = "de::flex_u8")]
    pub work_mode: u8,
    /// Equipment status code.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub work_status: u8,
    /// Fan mode code.
    #[serde(deserialize_with = "de::flex_u8")]
    pub fan_mode: u8,
    /// Fan running.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub fan_status: bool,
    /// `f` or `c`.
    #[serde(default)]
    pub temp_unit: String,
    /// Current temperature.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub temperature: f64,
    /// Relative humidity.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub humidity: u8,
    /// Heating setpoint.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub heat_to_temp: f64,
    /// Cooling setpoint.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub cool_to_temp: f64,
    /// Keypad locked.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub lock_status: bool,
    /// Schedule (0) or hold (1).
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub schedule_or_hold: i64,
    /// Unix time the hold ends.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub hold_end_time: i64,
    /// Hold option code.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub hold_option: u8,
    /// Minimum gap between setpoints.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub deadband: f64,
    /// Eco type code.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub eco_type: u8,
    /// Active alert code.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub alert_status: i64,
    /// Stored routines.
    #[serde(default)]
    pub routines: Vec<ThermostatRoutine>,
    /// Identifier of the running routine.
    #[serde(default)]
    pub routine_running_id: Option<i64>,
}

/// Thermostat payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum ThermostatResult {
    /// Aura thermostat.
    Aura(ThermostatStatus),
}

static THERMOSTAT_SHAPES: [Candidate<ThermostatResult>; 1] = [Candidate {
    name: "aura",
    required: &["workMode", "fanMode", "supportMode"],
    distinguishing: &[],
    decode: |v| serde_json::from_value(v).map(ThermostatResult::Aura),
}];

impl FamilyResult for ThermostatResult {
    const FAMILY: DeviceFamily = DeviceFamily::Thermostat;

    fn candidates() -> &'static [Candidate<Self>] {
        &THERMOSTAT_SHAPES
    }
}

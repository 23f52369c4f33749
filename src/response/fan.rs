// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan result shapes.

use serde::{Deserialize, Serialize};

use crate::capabilities::DeviceFamily;

use super::de;
use super::shape::{Candidate, FamilyResult};

/// `getTowerFanStatus` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerFanStatus {
    /// Power state.
    #[serde(deserialize_with = "de::flex_bool")]
    pub power_switch: bool,
    /// Wire mode name.
    pub work_mode: String,
    /// Level set in normal mode.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub manual_speed_level: u8,
    /// Level currently running.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub fan_speed_level: u8,
    /// Display configured on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub screen_switch: bool,
    /// Display currently lit.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub screen_state: bool,
    /// Oscillation configured on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub oscillation_switch: bool,
    /// Currently oscillating.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub oscillation_state: bool,
    /// Beeps muted.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub mute_switch: bool,
    /// Current mute state.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub mute_state: bool,
    /// Seconds left on the running timer.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub timer_remain: i64,
    /// Ambient temperature in tenths of a degree Fahrenheit.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub temperature: Option<f64>,
    /// Firmware error code.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub error_code: i64,
    /// Display shows the temperature instead of the level.
    #[serde(default, deserialize_with = "de::opt_flex_bool")]
    pub displaying_type: Option<bool>,
}

/// Fan payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum FanResult {
    /// Tower fan.
    Tower(TowerFanStatus),
}

static FAN_SHAPES: [Candidate<FanResult>; 1] = [Candidate {
    name: "tower_fan",
    required: &["workMode", "oscillationSwitch"],
    distinguishing: &[],
    decode: |v| serde_json::from_value(v).map(FanResult::Tower),
}];

impl FamilyResult for FanResult {
    const FAMILY: DeviceFamily = DeviceFamily::Fan;

    fn candidates() -> &'static [Candidate<Self>] {
        &FAN_SHAPES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::BypassVersion;
    use crate::response::decode;
    use serde_json::json;

    #[test]
    fn tower_fan_status() {
        let body = serde_json::to_vec(&json!({
            "code": 0,
            "result": {"code": 0, "result": {
                "powerSwitch": 1, "workMode": "normal", "manualSpeedLevel": 5,
                "fanSpeedLevel": 5, "screenState": 1, "screenSwitch": 1,
                "oscillationSwitch": 1, "oscillationState": 1, "muteSwitch": 0,
                "muteState": 0, "timerRemain": 0, "temperature": 735, "errorCode": 0,
                "scheduleCount": 0, "displayingType": 0
            }}
        }))
        .unwrap();
        let FanResult::Tower(status) = decode(&body, BypassVersion::V2).unwrap();
        assert_eq!(status.manual_speed_level, 5);
        assert!(status.oscillation_switch);
        assert_eq!(status.displaying_type, Some(false));
    }
}

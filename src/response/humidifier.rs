// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Humidifier result shapes.
//!
//! Classic-line humidifiers answer in snake_case with boolean switches.
//! The OasisMist 1000S and Superior 6000S answer in camelCase with
//! integer switches and a `workMode` key.

use serde::{Deserialize, Serialize};

use crate::capabilities::DeviceFamily;

use super::de;
use super::shape::{Candidate, FamilyResult, Presence};

/// Stored configuration of a classic humidifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClassicConfiguration {
    /// Target humidity used in auto mode.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub auto_target_humidity: u8,
    /// Display setting.
    #[serde(default, alias = "indicator_light_status", deserialize_with = "de::flex_bool")]
    pub display: bool,
    /// Stop when the target is reached.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub automatic_stop: bool,
}

/// `getHumidifierStatus` reply of the Classic, Dual, LV600S and
/// OasisMist lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicHumidifier {
    /// Power state.
    #[serde(deserialize_with = "de::flex_bool")]
    pub enabled: bool,
    /// Mist level as set by the user.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub mist_virtual_level: u8,
    /// Mist level actually running.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub mist_level: u8,
    /// Wire mode name.
    pub mode: String,
    /// Display on; Classic200S reports `indicator_light_status`.
    #[serde(default, alias = "indicator_light_status", deserialize_with = "de::flex_bool")]
    pub display: bool,
    /// Tank is empty.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub water_lacks: bool,
    /// Current relative humidity.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub humidity: Option<u8>,
    /// Humidity above target.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub humidity_high: bool,
    /// Stopped after reaching target.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub automatic_stop_reach_target: bool,
    /// Tank removed.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub water_tank_lifted: bool,
    /// Warm mist on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub warm_enabled: bool,
    /// Warm mist level.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub warm_level: Option<u8>,
    /// Nightlight brightness.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub night_light_brightness: Option<u8>,
    /// Stored configuration.
    #[serde(default)]
    pub configuration: Option<ClassicConfiguration>,
}

/// Drying mode block of the Superior 6000S.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DryingModeStatus {
    /// Drying intensity.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub drying_level: i64,
    /// Automatic drying enabled.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub auto_drying_switch: bool,
    /// Current drying state code.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub drying_state: i64,
    /// Remaining drying time in seconds.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub drying_remain: i64,
}

/// Nightlight block of the OasisMist 1000S.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkModeNightLight {
    /// Nightlight on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub night_light_switch: bool,
    /// Nightlight brightness.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub brightness: u8,
}

/// `getHumidifierStatus` reply of `workMode` humidifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkModeHumidifier {
    /// Power state.
    #[serde(deserialize_with = "de::flex_bool")]
    pub power_switch: bool,
    /// Current relative humidity.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub humidity: u8,
    /// Target humidity.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub target_humidity: u8,
    /// Mist level as set by the user.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub virtual_level: u8,
    /// Mist level actually running.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub mist_level: u8,
    /// Wire mode name.
    pub work_mode: String,
    /// Tank is empty.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub water_lacks_state: bool,
    /// Tank removed.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub water_tank_lifted: bool,
    /// Auto stop configured.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub auto_stop_switch: bool,
    /// Auto stop currently in effect.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub auto_stop_state: bool,
    /// Display configured on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub screen_switch: bool,
    /// Display currently lit.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub screen_state: bool,
    /// Firmware error code.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub error_code: i64,
    /// Ambient temperature, Superior only.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub temperature: Option<f64>,
    /// Child lock, Superior only.
    #[serde(default, deserialize_with = "de::opt_flex_bool")]
    pub child_lock_switch: Option<bool>,
    /// Remaining wick life, Superior only.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub filter_life_percent: Option<u8>,
    /// Drying mode, Superior only.
    #[serde(default)]
    pub drying_mode: Option<DryingModeStatus>,
    /// Nightlight, 1000S only.
    #[serde(default)]
    pub night_light: Option<WorkModeNightLight>,
}

/// Humidifier payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum HumidifierResult {
    /// Superior 6000S.
    Superior(WorkModeHumidifier),
    /// OasisMist 1000S.
    WorkMode(WorkModeHumidifier),
    /// Classic line.
    Classic(ClassicHumidifier),
}

static HUMIDIFIER_SHAPES: [Candidate<HumidifierResult>; 3] = [
    Candidate {
        name: "superior",
        required: &["workMode", "powerSwitch"],
        distinguishing: &[Presence::Object("dryingMode")],
        decode: |v| serde_json::from_value(v).map(HumidifierResult::Superior),
    },
    Candidate {
        name: "work_mode",
        required: &["workMode", "powerSwitch"],
        distinguishing: &[],
        decode: |v| serde_json::from_value(v).map(HumidifierResult::WorkMode),
    },
    Candidate {
        name: "classic",
        required: &["enabled", "mode"],
        distinguishing: &[Presence::Absent("workMode")],
        decode: |v| serde_json::from_value(v).map(HumidifierResult::Classic),
    },
];

impl FamilyResult for HumidifierResult {
    const FAMILY: DeviceFamily = DeviceFamily::Humidifier;

    fn candidates() -> &'static [Candidate<Self>] {
        &HUMIDIFIER_SHAPES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::BypassVersion;
    use crate::error::{DecodeError, Error};
    use crate::response::decode;
    use serde_json::json;

    fn v2(result: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({"code": 0, "result": {"code": 0, "result": result}})).unwrap()
    }

    #[test]
    fn classic_status() {
        let body = v2(json!({
            "enabled": true, "humidity": 45, "mist_virtual_level": 3, "mist_level": 3,
            "mode": "manual", "water_lacks": false, "humidity_high": false,
            "water_tank_lifted": false, "display": true, "automatic_stop_reach_target": false,
            "night_light_brightness": 50,
            "configuration": {"auto_target_humidity": 55, "display": true, "automatic_stop": true}
        }));
        let HumidifierResult::Classic(status) = decode(&body, BypassVersion::V2).unwrap() else {
            panic!("expected classic shape");
        };
        assert!(status.enabled);
        assert_eq!(status.humidity, Some(45));
        assert_eq!(status.night_light_brightness, Some(50));
        assert_eq!(status.configuration.map(|c| c.auto_target_humidity), Some(55));
    }

    #[test]
    fn classic200s_indicator_alias() {
        let body = v2(json!({
            "enabled": false, "mode": "auto", "indicator_light_status": true,
            "water_lacks": true
        }));
        let HumidifierResult::Classic(status) = decode(&body, BypassVersion::V2).unwrap() else {
            panic!("expected classic shape");
        };
        assert!(status.display);
        assert!(status.water_lacks);
    }

    #[test]
    fn superior_has_drying_mode() {
        let body = v2(json!({
            "powerSwitch": 1, "humidity": 40, "targetHumidity": 60, "virtualLevel": 5,
            "mistLevel": 5, "workMode": "autoPro", "waterLacksState": 0,
            "waterTankLifted": 0, "autoStopSwitch": 1, "autoStopState": 0,
            "screenSwitch": 1, "screenState": 1, "temperature": 715,
            "dryingMode": {"dryingLevel": 1, "autoDryingSwitch": 1, "dryingState": 2, "dryingRemain": 7200}
        }));
        let HumidifierResult::Superior(status) = decode(&body, BypassVersion::V2).unwrap() else {
            panic!("expected superior shape");
        };
        assert!(status.power_switch);
        assert_eq!(status.work_mode, "autoPro");
        assert!(status.drying_mode.is_some_and(|d| d.auto_drying_switch));
    }

    #[test]
    fn oasis_1000s_without_drying_mode() {
        let body = v2(json!({
            "powerSwitch": 0, "workMode": "sleep", "targetHumidity": 50,
            "nightLight": {"nightLightSwitch": 1, "brightness": 60}
        }));
        let result: HumidifierResult = decode(&body, BypassVersion::V2).unwrap();
        assert!(matches!(
            result,
            HumidifierResult::WorkMode(ref s) if !s.power_switch && s.night_light.is_some()
        ));
    }

    #[test]
    fn unrelated_payload_is_unknown_shape() {
        let body = v2(json!({"foo": 1}));
        let err = decode::<HumidifierResult>(&body, BypassVersion::V2).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::UnknownShape { family: DeviceFamily::Humidifier })
        ));
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air purifier result shapes.

use serde::{Deserialize, Serialize};

use crate::capabilities::DeviceFamily;

use super::de;
use super::shape::{Candidate, FamilyResult, Presence};

fn default_off() -> String {
    "off".to_string()
}

fn default_offline() -> String {
    "offline".to_string()
}

/// Auto-mode preference and room size.
///
/// Core models send `type`/`room_size`; Vital and Sprout models send
/// `autoPreferenceType`/`roomSize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPreference {
    /// Preference wire name.
    #[serde(rename = "type", alias = "autoPreferenceType", default)]
    pub kind: String,
    /// Room size in square feet.
    #[serde(alias = "roomSize", default, deserialize_with = "de::flex_i64")]
    pub room_size: i64,
}

/// Stored configuration of a Core purifier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoreConfiguration {
    /// Display setting.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub display: bool,
    /// Display stays lit.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub display_forever: bool,
    /// Auto-mode preference.
    #[serde(default)]
    pub auto_preference: Option<RoomPreference>,
}

/// `getPurifierStatus` reply of the Core line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorePurifier {
    /// Power state.
    #[serde(deserialize_with = "de::flex_bool")]
    pub enabled: bool,
    /// Remaining filter life in percent.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub filter_life: u8,
    /// Wire mode name.
    pub mode: String,
    /// Fan level.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub level: u8,
    /// Firmware error code.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub device_error_code: i64,
    /// Air quality index, 1 (best) to 4.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub air_quality: Option<u8>,
    /// PM2.5 in µg/m³.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub air_quality_value: Option<f64>,
    /// Display on.
    #[serde(default, deserialize_with = "de::opt_flex_bool")]
    pub display: Option<bool>,
    /// Child lock on.
    #[serde(default, deserialize_with = "de::opt_flex_bool")]
    pub child_lock: Option<bool>,
    /// Nightlight `on`/`off`/`dim`.
    #[serde(default)]
    pub night_light: Option<String>,
    /// Stored configuration.
    #[serde(default)]
    pub configuration: Option<CoreConfiguration>,
}

/// Filter block of the LV-PUR131S.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterLife {
    /// Replacement due.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub change: bool,
    /// Hours used.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub use_hour: i64,
    /// Remaining life in percent.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub percent: u8,
}

/// `deviceDetail` reply of the LV-PUR131S.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lv131Purifier {
    /// `on` or `off`.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// `online` or `offline`.
    #[serde(default = "default_offline")]
    pub connection_status: String,
    /// Minutes since switched on.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub active_time: i64,
    /// Display `on`/`off`.
    #[serde(default = "default_off")]
    pub screen_status: String,
    /// Fan level, absent outside manual mode.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub level: Option<u8>,
    /// Wire mode name.
    pub mode: String,
    /// Air quality label such as `excellent`.
    #[serde(default)]
    pub air_quality: String,
    /// Child lock `on`/`off`.
    #[serde(default = "default_off")]
    pub child_lock: String,
    /// Filter status.
    #[serde(default)]
    pub filter_life: Option<FilterLife>,
}

/// `getPurifierStatus` reply of the Vital and Everest lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalPurifier {
    /// Power state.
    #[serde(deserialize_with = "de::flex_bool")]
    pub power_switch: bool,
    /// Remaining filter life in percent.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub filter_life_percent: u8,
    /// Wire mode name.
    pub work_mode: String,
    /// Level set in manual mode.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub manual_speed_level: u8,
    /// Level currently running.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub fan_speed_level: u8,
    /// Air quality index, 1 (best) to 4.
    #[serde(rename = "AQLevel", default, deserialize_with = "de::opt_flex_u8")]
    pub aq_level: Option<u8>,
    /// PM2.5 in µg/m³.
    #[serde(rename = "PM25", default, deserialize_with = "de::opt_flex_f64")]
    pub pm25: Option<f64>,
    /// Display configured on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub screen_switch: bool,
    /// Display currently lit.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub screen_state: bool,
    /// Child lock on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub child_lock_switch: bool,
    /// Light detection on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub light_detection_switch: bool,
    /// Ambient light detected.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub environment_light_state: bool,
    /// Firmware error code.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub error_code: i64,
    /// Auto-mode preference.
    #[serde(default)]
    pub auto_preference: Option<RoomPreference>,
    /// Vent angle, Everest only.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub fan_rotate_angle: Option<f64>,
}

/// Nightlight block of Sprout purifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SproutNightlight {
    /// Nightlight on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub night_light_switch: bool,
    /// Nightlight brightness.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub brightness: u8,
    /// Nightlight color temperature.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub color_temperature: i64,
}

/// `getPurifierStatus` reply of Sprout purifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SproutPurifier {
    /// Power state.
    #[serde(deserialize_with = "de::flex_bool")]
    pub power_switch: bool,
    /// Wire mode name.
    pub work_mode: String,
    /// Level set in manual mode.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub manual_speed_level: Option<u8>,
    /// Level currently running.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub fan_speed_level: Option<u8>,
    /// Air quality index.
    #[serde(rename = "AQLevel", default, deserialize_with = "de::opt_flex_u8")]
    pub aq_level: Option<u8>,
    /// PM2.5 in µg/m³.
    #[serde(rename = "PM25", default, deserialize_with = "de::opt_flex_f64")]
    pub pm25: Option<f64>,
    /// Display configured on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub screen_switch: bool,
    /// Child lock on.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub child_lock_switch: bool,
    /// Relative humidity.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub humidity: Option<u8>,
    /// Ambient temperature.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub temperature: Option<f64>,
    /// Firmware error code.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub error_code: i64,
    /// Nightlight.
    #[serde(default)]
    pub nightlight: Option<SproutNightlight>,
    /// Auto-mode preference.
    #[serde(default)]
    pub auto_preference: Option<RoomPreference>,
}

/// Purifier payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum PurifierResult {
    /// Sprout line.
    Sprout(SproutPurifier),
    /// Vital and Everest lines.
    Vital(VitalPurifier),
    /// LV-PUR131S.
    Lv131(Lv131Purifier),
    /// Core line.
    Core(CorePurifier),
}

static PURIFIER_SHAPES: [Candidate<PurifierResult>; 4] = [
    Candidate {
        name: "sprout",
        required: &["workMode", "powerSwitch"],
        distinguishing: &[Presence::Object("nightlight")],
        decode: |v| serde_json::from_value(v).map(PurifierResult::Sprout),
    },
    Candidate {
        name: "vital",
        required: &["workMode", "powerSwitch"],
        distinguishing: &[],
        decode: |v| serde_json::from_value(v).map(PurifierResult::Vital),
    },
    Candidate {
        name: "lv131",
        required: &["deviceStatus", "mode"],
        distinguishing: &[Presence::Absent("workMode")],
        decode: |v| serde_json::from_value(v).map(PurifierResult::Lv131),
    },
    Candidate {
        name: "core",
        required: &["enabled", "mode"],
        distinguishing: &[Presence::Absent("workMode")],
        decode: |v| serde_json::from_value(v).map(PurifierResult::Core),
    },
];

impl FamilyResult for PurifierResult {
    const FAMILY: DeviceFamily = DeviceFamily::Purifier;

    fn candidates() -> &'static [Candidate<Self>] {
        &PURIFIER_SHAPES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::BypassVersion;
    use crate::response::decode;
    use serde_json::json;

    fn v2(result: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({"code": 0, "result": {"code": 0, "result": result}})).unwrap()
    }

    #[test]
    fn core_status() {
        let body = v2(json!({
            "enabled": true, "filter_life": 80, "mode": "manual", "level": 2,
            "air_quality": 1, "air_quality_value": 3, "display": true, "child_lock": false,
            "night_light": "dim", "device_error_code": 0,
            "configuration": {"display": true, "display_forever": false,
                              "auto_preference": {"type": "efficient", "room_size": 600}}
        }));
        let PurifierResult::Core(status) = decode(&body, BypassVersion::V2).unwrap() else {
            panic!("expected core shape");
        };
        assert_eq!(status.level, 2);
        assert_eq!(status.night_light.as_deref(), Some("dim"));
        let pref = status.configuration.and_then(|c| c.auto_preference).unwrap();
        assert_eq!(pref.kind, "efficient");
        assert_eq!(pref.room_size, 600);
    }

    #[test]
    fn vital_status() {
        let body = v2(json!({
            "powerSwitch": 1, "filterLifePercent": 90, "workMode": "pet",
            "manualSpeedLevel": 3, "fanSpeedLevel": 3, "AQLevel": 2, "PM25": 12,
            "screenState": 1, "childLockSwitch": 0, "screenSwitch": 1,
            "lightDetectionSwitch": 1, "environmentLightState": 0, "errorCode": 0,
            "autoPreference": {"autoPreferenceType": "quiet", "roomSize": 0}
        }));
        let PurifierResult::Vital(status) = decode(&body, BypassVersion::V2).unwrap() else {
            panic!("expected vital shape");
        };
        assert_eq!(status.work_mode, "pet");
        assert_eq!(status.aq_level, Some(2));
        assert!(status.light_detection_switch);
        assert_eq!(status.auto_preference.map(|p| p.kind), Some("quiet".to_string()));
    }

    #[test]
    fn sprout_precedes_vital() {
        let body = v2(json!({
            "powerSwitch": 0, "workMode": "auto", "screenSwitch": 0, "childLockSwitch": 0,
            "nightlight": {"nightLightSwitch": true, "brightness": 30, "colorTemperature": 3000}
        }));
        let result: PurifierResult = decode(&body, BypassVersion::V2).unwrap();
        assert!(matches!(result, PurifierResult::Sprout(ref s) if s.nightlight.is_some()));
    }

    #[test]
    fn lv131_detail() {
        let body = serde_json::to_vec(&json!({
            "code": 0, "msg": null,
            "result": {
                "screenStatus": "on", "activeTime": 10, "levelNew": 0, "level": 2,
                "mode": "manual", "airQuality": "excellent", "deviceName": "Bedroom",
                "childLock": "off", "deviceStatus": "on", "connectionStatus": "online",
                "filterLife": {"change": false, "useHour": 100, "percent": 95}
            }
        }))
        .unwrap();
        let PurifierResult::Lv131(detail) = decode(&body, BypassVersion::V1).unwrap() else {
            panic!("expected lv131 shape");
        };
        assert_eq!(detail.level, Some(2));
        assert_eq!(detail.filter_life.map(|f| f.percent), Some(95));
    }
}

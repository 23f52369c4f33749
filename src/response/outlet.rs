// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Outlet result shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::capabilities::DeviceFamily;

use super::de;
use super::shape::{Candidate, FamilyResult, Presence};

fn default_off() -> String {
    "off".to_string()
}

fn default_offline() -> String {
    "offline".to_string()
}

/// Detail of 10A and 15A outlets.
///
/// Missing `deviceStatus` reads as `off`, `connectionStatus` as
/// `offline`, readings as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutletDetail {
    /// `on` or `off`.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// `online` or `offline`.
    #[serde(default = "default_offline")]
    pub connection_status: String,
    /// Minutes since the outlet was switched on.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub active_time: i64,
    /// Current power draw in W.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub power: f64,
    /// Current voltage in V.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub voltage: f64,
    /// Energy used today in kWh.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub energy: Option<f64>,
    /// Nightlight `on`/`off`, 15A only.
    #[serde(default)]
    pub night_light_status: Option<String>,
    /// Nightlight mode `on`/`off`/`auto`, 15A only.
    #[serde(default)]
    pub night_light_auto_mode: Option<String>,
    /// Nightlight brightness, 15A only.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub night_light_brightness: Option<u8>,
}

/// One socket of the dual outdoor plug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdoorSubDevice {
    /// Socket number, 1-based.
    #[serde(deserialize_with = "de::flex_u8")]
    pub sub_device_no: u8,
    /// Factory name.
    #[serde(default)]
    pub default_name: String,
    /// User-assigned name.
    #[serde(default)]
    pub sub_device_name: String,
    /// `on` or `off`.
    #[serde(default = "default_off")]
    pub sub_device_status: String,
}

/// Detail of the dual outdoor plug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdoorDetail {
    /// `on` if any socket is on.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// `online` or `offline`.
    #[serde(default = "default_offline")]
    pub connection_status: String,
    /// Minutes since switched on.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub active_time: i64,
    /// Current power draw in W.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub power: f64,
    /// Current voltage in V.
    #[serde(default, deserialize_with = "de::flex_f64")]
    pub voltage: f64,
    /// Energy used today in kWh.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub energy: Option<f64>,
    /// Per-socket status.
    pub sub_devices: Vec<OutdoorSubDevice>,
}

/// `getProperty` reply of property-style plugs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOutlet {
    /// Relay state, `1` for on.
    #[serde(rename = "powerSwitch_1", deserialize_with = "de::flex_bool")]
    pub power_switch_1: bool,
    /// Voltage in V.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub real_time_voltage: Option<f64>,
    /// Power draw in W.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub real_time_power: Option<f64>,
    /// Energy in kWh.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub electrical_energy: Option<f64>,
    /// Over-voltage threshold.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub voltage_upper_threshold: Option<f64>,
    /// Over-current threshold.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub current_upper_threshold: Option<f64>,
    /// Protection state reported by the plug.
    #[serde(default)]
    pub protection_status: Option<String>,
}

/// `getSwitch` reply: just the relay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchEnabled {
    /// Relay state.
    #[serde(deserialize_with = "de::flex_bool")]
    pub enabled: bool,
}

/// Outlet payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum OutletResult {
    /// Dual outdoor plug.
    Outdoor(OutdoorDetail),
    /// Property-style plug.
    Property(PropertyOutlet),
    /// Plain switch state.
    Switch(SwitchEnabled),
    /// 10A / 15A detail.
    Detail(OutletDetail),
}

static OUTLET_SHAPES: [Candidate<OutletResult>; 4] = [
    Candidate {
        name: "outdoor_detail",
        required: &["subDevices"],
        distinguishing: &[Presence::Array("subDevices")],
        decode: |v| serde_json::from_value(v).map(OutletResult::Outdoor),
    },
    Candidate {
        name: "property_outlet",
        required: &["powerSwitch_1"],
        distinguishing: &[],
        decode: |v| serde_json::from_value(v).map(OutletResult::Property),
    },
    Candidate {
        name: "switch_enabled",
        required: &["enabled"],
        distinguishing: &[Presence::Absent("deviceStatus")],
        decode: |v| serde_json::from_value(v).map(OutletResult::Switch),
    },
    Candidate {
        name: "outlet_detail",
        required: &["deviceStatus"],
        distinguishing: &[Presence::Absent("subDevices")],
        decode: |v| serde_json::from_value(v).map(OutletResult::Detail),
    },
];

impl FamilyResult for OutletResult {
    const FAMILY: DeviceFamily = DeviceFamily::Outlet;

    fn candidates() -> &'static [Candidate<Self>] {
        &OUTLET_SHAPES
    }
}

// ============================================================================
// Legacy outlet
// ============================================================================

/// Decodes a `high:low` hex reading of old firmware.
#[allow(clippy::cast_precision_loss)]
fn hex_reading(value: &str) -> Option<f64> {
    let (high, low) = value.split_once(':')?;
    let high = i64::from_str_radix(high.trim(), 16).ok()?;
    let low = i64::from_str_radix(low.trim(), 16).ok()?;
    Some(((high + low) as f64 / 8192.0 * 100.0).round() / 100.0)
}

fn legacy_reading<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let reading = match Value::deserialize(d)? {
        Value::String(s) if s.contains(':') => hex_reading(&s),
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    if reading.is_none() {
        tracing::warn!("Unreadable legacy outlet reading");
    }
    Ok(reading.unwrap_or_default())
}

/// Detail of the 7A round outlet, served by its legacy endpoint.
///
/// Power and voltage arrive either as numbers or, on old firmware, as
/// `high:low` hex pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyOutletDetail {
    /// `on` or `off`.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// Minutes since the outlet was switched on.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub active_time: i64,
    /// Energy used today in kWh.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub energy: Option<f64>,
    /// Power draw in W.
    #[serde(default, deserialize_with = "legacy_reading")]
    pub power: f64,
    /// Voltage in V.
    #[serde(default, deserialize_with = "legacy_reading")]
    pub voltage: f64,
}

// ============================================================================
// Energy history
// ============================================================================

/// One bucket of an energy history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyEntry {
    /// Bucket start as reported, a Unix timestamp.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub timestamp: i64,
    /// Energy in kWh.
    #[serde(alias = "energyKWH", default, deserialize_with = "de::flex_f64")]
    pub energy: f64,
    /// Cost of the bucket, where a tariff is configured.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub money: Option<f64>,
}

/// Energy history of one period.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyHistory {
    /// Buckets, oldest first.
    #[serde(rename = "energyInfos", default, deserialize_with = "de::null_default")]
    pub entries: Vec<EnergyEntry>,
    /// Energy used today in kWh.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub energy_consumption_of_today: Option<f64>,
    /// Tariff per kWh.
    #[serde(rename = "costPerKWH", default, deserialize_with = "de::opt_flex_f64")]
    pub cost_per_kwh: Option<f64>,
    /// Largest bucket in kWh.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub max_energy: Option<f64>,
    /// Sum over the period in kWh.
    #[serde(default, deserialize_with = "de::opt_flex_f64")]
    pub total_energy: Option<f64>,
}

impl EnergyHistory {
    /// Sum of the buckets, for replies that omit `totalEnergy`.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total_energy
            .unwrap_or_else(|| self.entries.iter().map(|e| e.energy).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::BypassVersion;
    use crate::error::{DecodeError, Error};
    use crate::response::decode;
    use serde_json::json;

    fn v1(result: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({"code": 0, "msg": null, "result": result})).unwrap()
    }

    fn v2(result: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "code": 0, "msg": "request success",
            "result": {"code": 0, "result": result}
        }))
        .unwrap()
    }

    #[test]
    fn decodes_15a_detail_with_string_readings() {
        let body = v1(json!({
            "deviceStatus": "on", "connectionStatus": "online", "activeTime": 12,
            "power": "3.5", "voltage": 120.1, "energy": 0.2,
            "nightLightStatus": "on", "nightLightAutoMode": "auto", "nightLightBrightness": 50
        }));
        let OutletResult::Detail(detail) = decode(&body, BypassVersion::V1).unwrap() else {
            panic!("expected detail shape");
        };
        assert_eq!(detail.device_status, "on");
        assert!((detail.power - 3.5).abs() < f64::EPSILON);
        assert_eq!(detail.night_light_auto_mode.as_deref(), Some("auto"));
        assert_eq!(detail.night_light_brightness, Some(50));
    }

    #[test]
    fn outdoor_wins_over_detail() {
        let body = v1(json!({
            "deviceStatus": "on", "connectionStatus": "online",
            "power": 1, "voltage": 120, "energy": 0,
            "subDevices": [
                {"subDeviceNo": 1, "defaultName": "A", "subDeviceName": "Left", "subDeviceStatus": "on"},
                {"subDeviceNo": 2, "defaultName": "B", "subDeviceName": "Right", "subDeviceStatus": "off"}
            ]
        }));
        let OutletResult::Outdoor(detail) = decode(&body, BypassVersion::V1).unwrap() else {
            panic!("expected outdoor shape");
        };
        assert_eq!(detail.sub_devices.len(), 2);
        assert_eq!(detail.sub_devices[1].sub_device_status, "off");
    }

    #[test]
    fn property_outlet_int_switch() {
        let body = v2(json!({"powerSwitch_1": 1, "realTimeVoltage": 230.0, "realTimePower": 12.0}));
        let OutletResult::Property(prop) = decode(&body, BypassVersion::V2).unwrap() else {
            panic!("expected property shape");
        };
        assert!(prop.power_switch_1);
        assert_eq!(prop.real_time_power, Some(12.0));
        assert_eq!(prop.electrical_energy, None);
    }

    #[test]
    fn missing_statuses_default() {
        let body = v1(json!({"deviceStatus": "on"}));
        let OutletResult::Detail(detail) = decode(&body, BypassVersion::V1).unwrap() else {
            panic!("expected detail shape");
        };
        assert_eq!(detail.connection_status, "offline");
        assert_eq!(detail.active_time, 0);
    }

    #[test]
    fn legacy_detail_accepts_hex_readings() {
        let detail: LegacyOutletDetail = serde_json::from_value(json!({
            "deviceStatus": "on",
            "activeTime": 4,
            "energy": 0.5,
            "power": "1000:1000",
            "voltage": 118.5,
        }))
        .unwrap();
        assert!((detail.power - 1.0).abs() < f64::EPSILON);
        assert!((detail.voltage - 118.5).abs() < f64::EPSILON);

        let garbled: LegacyOutletDetail =
            serde_json::from_value(json!({"deviceStatus": "off", "power": "zz:1"})).unwrap();
        assert!(garbled.power.abs() < f64::EPSILON);
    }

    #[test]
    fn energy_history_reads_either_energy_key() {
        let history: EnergyHistory = serde_json::from_value(json!({
            "energyInfos": [
                {"timestamp": 1_700_000_000, "energy": 0.5},
                {"timestamp": 1_700_086_400, "energyKWH": "1.5", "money": 0.3},
            ],
            "costPerKWH": 0.2,
            "maxEnergy": 1.5,
        }))
        .unwrap();
        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.entries[1].money, Some(0.3));
        assert!((history.total() - 2.0).abs() < f64::EPSILON);
        assert_eq!(history.cost_per_kwh, Some(0.2));
    }

    #[test]
    fn unrelated_payload_is_unknown_shape() {
        let body = v2(json!({"workMode": "auto"}));
        let err = decode::<OutletResult>(&body, BypassVersion::V2).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode(DecodeError::UnknownShape {
                family: DeviceFamily::Outlet
            })
        ));
    }
}

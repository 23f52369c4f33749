// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bulb result shapes.

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

fn default_on() -> String {
    "on".to_string()
}

/// Detail of the dimmable ESL100.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Esl100Detail {
    /// `on` or `off`; missing reads as `off`.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// `online` or `offline`; missing reads as `offline`.
    #[serde(default = "default_offline")]
    pub connection_status: String,
    /// Minutes since switched on.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub active_time: i64,
    /// Brightness 0-100, if reported.
    #[serde(rename = "brightNess", alias = "brightness", default, deserialize_with = "de::opt_flex_u8")]
    pub brightness: Option<u8>,
}

/// Light object of the ESL100CW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CwLightStatus {
    /// `on` or `off`; missing reads as `on`.
    #[serde(default = "default_on")]
    pub action: String,
    /// Brightness 0-100, if reported.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub brightness: Option<u8>,
    /// Color temperature 0-100; missing reads as `0`.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub color_tempe: u8,
}

/// `getLightStatus` reply of the ESL100CW.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CwLight {
    /// Light state.
    pub light: CwLightStatus,
}

/// `getLightStatus` reply of the ESL100MC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McStatus {
    /// `white` or `color`.
    pub color_mode: String,
    /// `on` or `off`.
    pub action: String,
    /// Brightness; missing reads as `0`.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub brightness: u8,
    /// Red channel; missing reads as `0`.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub red: u8,
    /// Green channel; missing reads as `0`.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub green: u8,
    /// Blue channel; missing reads as `0`.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub blue: u8,
}

/// `getLightStatusV2` / `setLightStatusV2` reply of the Valceno bulb.
///
/// Hue and saturation are on the device's 0-10000 scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValcenoStatus {
    /// `on` or `off`.
    #[serde(default, deserialize_with = "de::flex_bool")]
    pub enabled: bool,
    /// `white` or `hsv`; missing reads as empty.
    #[serde(default)]
    pub color_mode: String,
    /// Color temperature 0-100.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub color_temp: u8,
    /// Brightness 0-100.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub brightness: u8,
    /// Hue, 0-10000.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub hue: i64,
    /// Saturation, 0-10000.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub saturation: i64,
    /// Color value 0-100.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub value: u8,
}

/// Bulb payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulbResult {
    /// ESL100CW.
    Cw(CwLight),
    /// Valceno.
    Valceno(ValcenoStatus),
    /// ESL100MC.
    Mc(McStatus),
    /// ESL100.
    Esl100(Esl100Detail),
}

static BULB_SHAPES: [Candidate<BulbResult>; 4] = [
    Candidate {
        name: "cw_light",
        required: &["light"],
        distinguishing: &[Presence::Object("light")],
        decode: |v| serde_json::from_value(v).map(BulbResult::Cw),
    },
    Candidate {
        name: "valceno_status",
        required: &["enabled", "colorMode"],
        distinguishing: &[Presence::Absent("action")],
        decode: |v| serde_json::from_value(v).map(BulbResult::Valceno),
    },
    Candidate {
        name: "mc_status",
        required: &["colorMode", "action"],
        distinguishing: &[],
        decode: |v| serde_json::from_value(v).map(BulbResult::Mc),
    },
    Candidate {
        name: "esl100_detail",
        required: &["deviceStatus"],
        distinguishing: &[Presence::Absent("colorMode")],
        decode: |v| serde_json::from_value(v).map(BulbResult::Esl100),
    },
];

impl FamilyResult for BulbResult {
    const FAMILY: DeviceFamily = DeviceFamily::Bulb;

    fn candidates() -> &'static [Candidate<Self>] {
        &BULB_SHAPES
    }
}

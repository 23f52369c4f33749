// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall switch and dimmer result shapes.

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

/// Detail of an on/off wall switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallDetail {
    /// `on` or `off`; missing reads as `off`.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// `online` or `offline`; missing reads as `offline`.
    #[serde(default = "default_offline")]
    pub connection_status: String,
    /// Minutes since switched on.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub active_time: i64,
}

/// Backlight color of a dimmer switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RgbValue {
    /// Red channel.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub red: u8,
    /// Green channel.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub green: u8,
    /// Blue channel.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub blue: u8,
}

/// Detail of a dimmer switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimmerDetail {
    /// `on` or `off`.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// `online` or `offline`.
    #[serde(default = "default_offline")]
    pub connection_status: String,
    /// Minutes since switched on.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub active_time: i64,
    /// Brightness 0-100; missing reads as `0`.
    #[serde(default, deserialize_with = "de::flex_u8")]
    pub brightness: u8,
    /// Indicator light `on`/`off`.
    #[serde(rename = "indicatorlightStatus", default = "default_off")]
    pub indicator_light_status: String,
    /// Backlight `on`/`off`.
    #[serde(default = "default_off")]
    pub rgb_status: String,
    /// Backlight color, if reported.
    #[serde(default)]
    pub rgb_value: Option<RgbValue>,
}

/// Switch payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchResult {
    /// Dimmer switch.
    Dimmer(DimmerDetail),
    /// Plain wall switch.
    Wall(WallDetail),
}

static SWITCH_SHAPES: [Candidate<SwitchResult>; 2] = [
    Candidate {
        name: "dimmer_detail",
        required: &["indicatorlightStatus"],
        distinguishing: &[Presence::Present("brightness")],
        decode: |v| serde_json::from_value(v).map(SwitchResult::Dimmer),
    },
    Candidate {
        name: "wall_detail",
        required: &["deviceStatus"],
        distinguishing: &[Presence::Absent("indicatorlightStatus")],
        decode: |v| serde_json::from_value(v).map(SwitchResult::Wall),
    },
];

impl FamilyResult for SwitchResult {
    const FAMILY: DeviceFamily = DeviceFamily::Switch;

    fn candidates() -> &'static [Candidate<Self>] {
        &SWITCH_SHAPES
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lenient field deserializers.
//!
//! Firmware revisions disagree on scalar encodings: the same reading
//! arrives as `12.5`, `"12.5"` or `null`, and switches as `true`, `1` or
//! `"on"`. These helpers normalize them and map `null` to the documented
//! field default (`0`, `0.0` or `false`).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "on" | "true" | "1" | "open" => Some(true),
            "off" | "false" | "0" | "close" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(value: &Value) -> Option<u8> {
    to_f64(value).map(|v| v.round().clamp(0.0, f64::from(u8::MAX)) as u8)
}

#[allow(clippy::cast_possible_truncation)]
fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v.round() as i64)),
        other => to_f64(other).map(|v| v.round() as i64),
    }
}

/// Number or numeric string; `null` or garbage reads as `0.0`.
pub(crate) fn flex_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(to_f64(&Value::deserialize(d)?).unwrap_or_default())
}

/// Optional number or numeric string.
pub(crate) fn opt_flex_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(to_f64(&Value::deserialize(d)?))
}

/// Bool, integer or on/off string; `null` reads as `false`.
pub(crate) fn flex_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(to_bool(&Value::deserialize(d)?).unwrap_or_default())
}

/// Optional bool, integer or on/off string.
pub(crate) fn opt_flex_bool<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(to_bool(&Value::deserialize(d)?))
}

/// Small integer, rounded and clamped to `0..=255`; `null` reads as `0`.
pub(crate) fn flex_u8<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
    Ok(to_u8(&Value::deserialize(d)?).unwrap_or_default())
}

/// Optional small integer.
pub(crate) fn opt_flex_u8<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    Ok(to_u8(&Value::deserialize(d)?))
}

/// Integer or numeric string; `null` reads as `0`.
pub(crate) fn flex_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    Ok(to_i64(&Value::deserialize(d)?).unwrap_or_default())
}

/// String or number rendered as a string; `null` reads as empty.
pub(crate) fn flex_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Any `Default` type; `null` reads as the default.
pub(crate) fn null_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "super::flex_f64")]
        power: f64,
        #[serde(default, deserialize_with = "super::flex_bool")]
        enabled: bool,
        #[serde(default, deserialize_with = "super::flex_u8")]
        level: u8,
        #[serde(default, deserialize_with = "super::opt_flex_u8")]
        brightness: Option<u8>,
    }

    #[test]
    fn accepts_mixed_encodings() {
        let s: Sample = serde_json::from_value(json!({
            "power": "12.5",
            "enabled": "on",
            "level": 3.0,
            "brightness": "80"
        }))
        .unwrap();
        assert!((s.power - 12.5).abs() < f64::EPSILON);
        assert!(s.enabled);
        assert_eq!(s.level, 3);
        assert_eq!(s.brightness, Some(80));
    }

    #[test]
    fn nulls_and_missing_use_defaults() {
        let s: Sample = serde_json::from_value(json!({"power": null, "enabled": 0})).unwrap();
        assert!(s.power.abs() < f64::EPSILON);
        assert!(!s.enabled);
        assert_eq!(s.level, 0);
        assert_eq!(s.brightness, None);
    }
}

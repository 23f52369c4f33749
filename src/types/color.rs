// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color types for multicolor bulbs and backlit dimmer switches.
//!
//! Bulbs report color either as RGB channels or as hue/saturation/value.
//! [`Color`] keeps both representations in sync so callers can read
//! whichever one they need regardless of how the device reported it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Warmest white supported by tunable-white bulbs, in Kelvin.
pub const COLOR_TEMP_MIN_KELVIN: u16 = 2700;
/// Coolest white supported by tunable-white bulbs, in Kelvin.
pub const COLOR_TEMP_MAX_KELVIN: u16 = 6500;

// Kelvin per percent of the 2700-6500 K span, rounded the way the app does.
const KELVIN_PER_PERCENT: u16 = 38;

/// Converts a color temperature in Kelvin to the 0-100 % scale bulbs use.
///
/// Values outside 2700-6500 K are clamped.
///
/// # Examples
///
/// ```
/// use vesync_lib::types::kelvin_to_percent;
///
/// assert_eq!(kelvin_to_percent(2700), 0);
/// assert_eq!(kelvin_to_percent(6500), 100);
/// ```
#[must_use]
pub fn kelvin_to_percent(kelvin: u16) -> u8 {
    let kelvin = kelvin.clamp(COLOR_TEMP_MIN_KELVIN, COLOR_TEMP_MAX_KELVIN);
    let span = COLOR_TEMP_MAX_KELVIN - COLOR_TEMP_MIN_KELVIN;
    let offset = u32::from(kelvin - COLOR_TEMP_MIN_KELVIN);
    let pct = (offset * 100 + u32::from(span) / 2) / u32::from(span);
    u8::try_from(pct).unwrap_or(100)
}

/// Converts a 0-100 % color temperature to Kelvin.
///
/// Percentages above 100 are clamped.
#[must_use]
pub fn percent_to_kelvin(percent: u8) -> u16 {
    let percent = u16::from(percent.min(100));
    (COLOR_TEMP_MIN_KELVIN + percent * KELVIN_PER_PERCENT).min(COLOR_TEMP_MAX_KELVIN)
}

// ============================================================================
// RgbColor
// ============================================================================

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use vesync_lib::types::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0);
/// assert_eq!(color.red(), 255);
///
/// let red = RgbColor::from_hex("#FF0000").unwrap();
/// assert_eq!(red.to_hsv().hue(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses `#RRGGBB` or `RRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` if the string is not a
    /// six-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ValidationError> {
        let digits = hex.trim_start_matches('#');
        let invalid = || ValidationError::InvalidChoice {
            field: "hex color",
            value: hex.to_string(),
        };
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as an uppercase hex string without `#`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Converts to hue/saturation/value.
    #[must_use]
    pub fn to_hsv(&self) -> HsvColor {
        let (hue, saturation, value) = rgb_to_hsv(self.red, self.green, self.blue);
        HsvColor {
            hue,
            saturation,
            value,
        }
    }

    /// Creates an RGB color from hue/saturation/value.
    #[must_use]
    pub fn from_hsv(hsv: &HsvColor) -> Self {
        let (r, g, b) = hsv_to_rgb(hsv.hue, hsv.saturation, hsv.value);
        Self::new(r, g, b)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::new(255, 255, 255)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

// ============================================================================
// HsvColor
// ============================================================================

/// Hue (0-360), saturation (0-100) and value (0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HsvColor {
    hue: u16,
    saturation: u8,
    value: u8,
}

impl HsvColor {
    /// Maximum hue in degrees.
    pub const MAX_HUE: u16 = 360;
    /// Maximum saturation and value.
    pub const MAX_PERCENT: u8 = 100;

    /// Creates a validated HSV color.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` for a hue above 360 or a
    /// saturation/value above 100.
    pub fn new(hue: u16, saturation: u8, value: u8) -> Result<Self, ValidationError> {
        if hue > Self::MAX_HUE {
            return Err(out_of_range("hue", i64::from(Self::MAX_HUE), i64::from(hue)));
        }
        if saturation > Self::MAX_PERCENT {
            return Err(out_of_range(
                "saturation",
                i64::from(Self::MAX_PERCENT),
                i64::from(saturation),
            ));
        }
        if value > Self::MAX_PERCENT {
            return Err(out_of_range(
                "value",
                i64::from(Self::MAX_PERCENT),
                i64::from(value),
            ));
        }
        Ok(Self {
            hue,
            saturation,
            value,
        })
    }

    /// Creates an HSV color, clamping each component into range.
    #[must_use]
    pub fn clamped(hue: u16, saturation: u8, value: u8) -> Self {
        Self {
            hue: hue.min(Self::MAX_HUE),
            saturation: saturation.min(Self::MAX_PERCENT),
            value: value.min(Self::MAX_PERCENT),
        }
    }

    /// Returns the hue in degrees.
    #[must_use]
    pub const fn hue(&self) -> u16 {
        self.hue
    }

    /// Returns the saturation percentage.
    #[must_use]
    pub const fn saturation(&self) -> u8 {
        self.saturation
    }

    /// Returns the value (brightness) percentage.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Hue as reported by Valceno bulbs, scaled to 0-10000.
    #[must_use]
    pub fn device_hue(&self) -> u32 {
        (u32::from(self.hue) * 250 + 4) / 9
    }

    /// Saturation as reported by Valceno bulbs, scaled to 0-10000.
    #[must_use]
    pub fn device_saturation(&self) -> u32 {
        u32::from(self.saturation) * 100
    }

    /// Rebuilds a color from Valceno's scaled hue and saturation.
    #[must_use]
    pub fn from_device(hue: u32, saturation: u32, value: u8) -> Self {
        let hue = u16::try_from((hue * 9 + 125) / 250).unwrap_or(Self::MAX_HUE);
        let saturation = u8::try_from((saturation + 50) / 100).unwrap_or(Self::MAX_PERCENT);
        Self::clamped(hue, saturation, value)
    }
}

impl fmt::Display for HsvColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.hue, self.saturation, self.value)
    }
}

fn out_of_range(field: &'static str, max: i64, actual: i64) -> ValidationError {
    ValidationError::OutOfRange {
        field,
        min: 0,
        max,
        actual,
    }
}

// ============================================================================
// Color / ColorMode
// ============================================================================

/// A color carrying both its RGB and HSV forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    rgb: RgbColor,
    hsv: HsvColor,
}

impl Color {
    /// Builds a color from RGB channels.
    #[must_use]
    pub fn from_rgb(rgb: RgbColor) -> Self {
        Self {
            rgb,
            hsv: rgb.to_hsv(),
        }
    }

    /// Builds a color from hue/saturation/value.
    #[must_use]
    pub fn from_hsv(hsv: HsvColor) -> Self {
        Self {
            rgb: RgbColor::from_hsv(&hsv),
            hsv,
        }
    }

    /// Returns the RGB form.
    #[must_use]
    pub const fn rgb(&self) -> RgbColor {
        self.rgb
    }

    /// Returns the HSV form.
    #[must_use]
    pub const fn hsv(&self) -> HsvColor {
        self.hsv
    }
}

/// Active light mode of a color-capable bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Tunable white.
    White,
    /// RGB color.
    Color,
    /// Hue/saturation color.
    Hsv,
}

impl ColorMode {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Color => "color",
            Self::Hsv => "hsv",
        }
    }

    /// Parses a wire value; unknown strings yield `None`.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "white" => Some(Self::White),
            "color" => Some(Self::Color),
            "hsv" => Some(Self::Hsv),
            _ => None,
        }
    }

    /// Returns `true` for either colored mode.
    #[must_use]
    pub const fn is_color(&self) -> bool {
        matches!(self, Self::Color | Self::Hsv)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Conversions
// ============================================================================

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u16, u8, u8) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let value = (max * 100.0).round() as u8;

    let saturation = if max == 0.0 {
        0
    } else {
        ((delta / max) * 100.0).round() as u8
    };

    let hue = if delta < f32::EPSILON {
        0
    } else if (max - r).abs() < f32::EPSILON {
        let h = 60.0 * (((g - b) / delta) % 6.0);
        if h < 0.0 {
            (h + 360.0).round() as u16
        } else {
            h.round() as u16
        }
    } else if (max - g).abs() < f32::EPSILON {
        (60.0 * (((b - r) / delta) + 2.0)).round() as u16
    } else {
        (60.0 * (((r - g) / delta) + 4.0)).round() as u16
    };

    (hue % 360, saturation, value)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
fn hsv_to_rgb(h: u16, s: u8, v: u8) -> (u8, u8, u8) {
    let s = f32::from(s) / 100.0;
    let v = f32::from(v) / 100.0;
    let h = f32::from(h % 360);

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device capabilities and per-model feature maps.
//!
//! A [`FeatureMap`] is the static description of one device model: which
//! implementation drives it, which bypass protocol it speaks, which
//! [`Feature`]s its hardware has, and which values its commands accept.
//! Feature maps live in the [`registry`](crate::registry) and are never
//! mutated after startup.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{
    AutoPreference, ColorMode, EcoType, FanMode, HoldOption, HumidifierMode, LevelRange,
    NightlightMode, PurifierMode, RoutineType, ThermostatFanMode, ThermostatWorkMode,
};

// ============================================================================
// Feature
// ============================================================================

/// A named hardware capability gating properties and commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// Can be switched on and off.
    OnOff,
    /// Brightness control.
    Dimmable,
    /// Tunable white color temperature.
    ColorTemp,
    /// RGB or HSV color.
    Multicolor,
    /// Built-in nightlight with a mode setting.
    Nightlight,
    /// Nightlight with adjustable brightness.
    NightlightBrightness,
    /// Power, voltage and energy readings.
    EnergyMonitor,
    /// Indicator LED that can be toggled.
    IndicatorLight,
    /// RGB backlight ring.
    RgbBacklight,
    /// Warm mist heater.
    WarmMist,
    /// Wick drying after shutdown.
    DryingMode,
    /// Stops when target humidity is reached.
    AutoStop,
    /// Air quality sensor.
    AirQuality,
    /// Filter life counter can be reset.
    ResetFilter,
    /// Button lock.
    ChildLock,
    /// Ambient light detection.
    LightDetect,
    /// Adjustable vent angle.
    VentAngle,
    /// Oscillation.
    Oscillation,
    /// Beep that can be muted.
    Sound,
    /// Display can switch between readings.
    DisplayingType,
    /// Display can be switched on and off.
    Display,
    /// Dedicated humidity-driven mode.
    HumidityMode,
    /// Countdown timer that switches the device.
    Timer,
    /// Weekly, monthly and yearly energy totals.
    EnergyHistory,
}

impl Feature {
    /// Every feature in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::OnOff,
        Self::Dimmable,
        Self::ColorTemp,
        Self::Multicolor,
        Self::Nightlight,
        Self::NightlightBrightness,
        Self::EnergyMonitor,
        Self::IndicatorLight,
        Self::RgbBacklight,
        Self::WarmMist,
        Self::DryingMode,
        Self::AutoStop,
        Self::AirQuality,
        Self::ResetFilter,
        Self::ChildLock,
        Self::LightDetect,
        Self::VentAngle,
        Self::Oscillation,
        Self::Sound,
        Self::DisplayingType,
        Self::Display,
        Self::HumidityMode,
        Self::Timer,
        Self::EnergyHistory,
    ];

    /// Returns a lowercase human-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OnOff => "on/off",
            Self::Dimmable => "dimming",
            Self::ColorTemp => "color temperature",
            Self::Multicolor => "multicolor",
            Self::Nightlight => "nightlight",
            Self::NightlightBrightness => "nightlight brightness",
            Self::EnergyMonitor => "energy monitoring",
            Self::IndicatorLight => "indicator light",
            Self::RgbBacklight => "rgb backlight",
            Self::WarmMist => "warm mist",
            Self::DryingMode => "drying mode",
            Self::AutoStop => "automatic stop",
            Self::AirQuality => "air quality",
            Self::ResetFilter => "filter reset",
            Self::ChildLock => "child lock",
            Self::LightDetect => "light detection",
            Self::VentAngle => "vent angle",
            Self::Oscillation => "oscillation",
            Self::Sound => "sound",
            Self::DisplayingType => "displaying type",
            Self::Display => "display",
            Self::HumidityMode => "humidity mode",
            Self::Timer => "timer",
            Self::EnergyHistory => "energy history",
        }
    }

    const fn bit(self) -> u32 {
        1 << (self as u32)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of [`Feature`]s.
///
/// # Examples
///
/// ```
/// use vesync_lib::capabilities::{Feature, FeatureSet};
///
/// let set = FeatureSet::of(&[Feature::OnOff, Feature::Dimmable]);
/// assert!(set.contains(Feature::Dimmable));
/// assert!(!set.contains(Feature::Multicolor));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureSet(u32);

impl FeatureSet {
    /// An empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Builds a set from a slice of features.
    #[must_use]
    pub const fn of(features: &[Feature]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < features.len() {
            bits |= features[i].bit();
            i += 1;
        }
        Self(bits)
    }

    /// Returns a copy of the set with `feature` added.
    #[must_use]
    pub const fn with(self, feature: Feature) -> Self {
        Self(self.0 | feature.bit())
    }

    /// Returns `true` if `feature` is in the set.
    #[must_use]
    pub const fn contains(&self, feature: Feature) -> bool {
        self.0 & feature.bit() != 0
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns the number of features in the set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the contained features in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.iter().copied().filter(|f| self.contains(*f))
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

// ============================================================================
// Families and models
// ============================================================================

/// Product family of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceFamily {
    /// Smart plugs.
    Outlet,
    /// In-wall switches and dimmers.
    Switch,
    /// Light bulbs.
    Bulb,
    /// Humidifiers.
    Humidifier,
    /// Air purifiers.
    Purifier,
    /// Fans.
    Fan,
    /// Thermostats.
    Thermostat,
}

impl DeviceFamily {
    /// Returns a lowercase name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Outlet => "outlet",
            Self::Switch => "switch",
            Self::Bulb => "bulb",
            Self::Humidifier => "humidifier",
            Self::Purifier => "purifier",
            Self::Fan => "fan",
            Self::Thermostat => "thermostat",
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bypass protocol variant spoken by a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BypassVersion {
    /// Flat request bodies posted to per-operation endpoints.
    V1,
    /// A generic endpoint carrying an inner `method` and `data` payload.
    V2,
}

/// The implementation that drives a model.
///
/// Fixes both the family and the protocol variant, so neither is ever
/// chosen per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// `wifi-switch-1.3` 7A round outlet on the legacy REST API.
    Outlet7A,
    /// ESW01-EU / ESW03-USA 10A outlets.
    Outlet10A,
    /// ESW15-USA 15A outlet with nightlight.
    Outlet15A,
    /// ESO15-TB dual outdoor outlet.
    OutdoorPlug,
    /// ESW10-USA outlet.
    Esw10,
    /// `getProperty`/`setProperty` outlets.
    Bsdgo1,
    /// ESWL01 / ESWL03 wall switch.
    WallSwitch,
    /// ESWD16 dimmer switch.
    DimmerSwitch,
    /// ESL100 dimmable bulb.
    Esl100,
    /// ESL100CW tunable white bulb.
    Esl100Cw,
    /// ESL100MC multicolor bulb.
    Esl100Mc,
    /// XYD0001 Valceno multicolor bulb.
    Valceno,
    /// Classic, Dual, LV600S and `OasisMist` humidifiers.
    ClassicHumidifier,
    /// `OasisMist` 1000S humidifier.
    Oasis1000S,
    /// Superior 6000S humidifier.
    Superior6000S,
    /// Core series purifiers.
    CorePurifier,
    /// LV-PUR131S purifier.
    Lv131Purifier,
    /// Vital and Everest purifiers.
    VitalPurifier,
    /// Sprout purifiers.
    SproutPurifier,
    /// Tower fan.
    TowerFan,
    /// Aura thermostat.
    AuraThermostat,
}

impl ModelKind {
    /// Returns the family this implementation belongs to.
    #[must_use]
    pub const fn family(&self) -> DeviceFamily {
        match self {
            Self::Outlet7A
            | Self::Outlet10A
            | Self::Outlet15A
            | Self::OutdoorPlug
            | Self::Esw10
            | Self::Bsdgo1 => DeviceFamily::Outlet,
            Self::WallSwitch | Self::DimmerSwitch => DeviceFamily::Switch,
            Self::Esl100 | Self::Esl100Cw | Self::Esl100Mc | Self::Valceno => DeviceFamily::Bulb,
            Self::ClassicHumidifier | Self::Oasis1000S | Self::Superior6000S => {
                DeviceFamily::Humidifier
            }
            Self::CorePurifier
            | Self::Lv131Purifier
            | Self::VitalPurifier
            | Self::SproutPurifier => DeviceFamily::Purifier,
            Self::TowerFan => DeviceFamily::Fan,
            Self::AuraThermostat => DeviceFamily::Thermostat,
        }
    }

    /// Returns the bypass protocol variant this implementation speaks.
    ///
    /// The 7A outlet reports V1: its replies to the shared account
    /// endpoints (energy history) use V1 envelopes.
    #[must_use]
    pub const fn bypass_version(&self) -> BypassVersion {
        match self {
            Self::Outlet7A
            | Self::Outlet10A
            | Self::Outlet15A
            | Self::OutdoorPlug
            | Self::WallSwitch
            | Self::DimmerSwitch
            | Self::Esl100
            | Self::Esl100Cw
            | Self::Lv131Purifier => BypassVersion::V1,
            _ => BypassVersion::V2,
        }
    }
}

// ============================================================================
// FeatureMap
// ============================================================================

/// Legal values for commands, declared per model.
///
/// Ranges that do not apply to a model are `None` or empty.
#[derive(Debug, Clone, Default)]
pub struct ValueRanges {
    /// Fan speed levels.
    pub fan_levels: Option<LevelRange>,
    /// Mist levels.
    pub mist_levels: Option<LevelRange>,
    /// Warm mist levels; 0 switches the heater off.
    pub warm_levels: Option<LevelRange>,
    /// Target humidity in percent.
    pub target_humidity: Option<LevelRange>,
    /// Purifier modes.
    pub purifier_modes: &'static [PurifierMode],
    /// Humidifier modes with their wire spelling for this model.
    pub humidifier_modes: &'static [(HumidifierMode, &'static str)],
    /// Fan modes.
    pub fan_modes: &'static [FanMode],
    /// Nightlight modes.
    pub nightlight_modes: &'static [NightlightMode],
    /// Auto-mode preferences.
    pub auto_preferences: &'static [AutoPreference],
    /// Color modes.
    pub color_modes: &'static [ColorMode],
    /// Thermostat work modes.
    pub thermostat_modes: &'static [ThermostatWorkMode],
    /// Thermostat fan modes.
    pub thermostat_fan_modes: &'static [ThermostatFanMode],
    /// Thermostat hold options.
    pub hold_options: &'static [HoldOption],
    /// Thermostat eco types.
    pub eco_types: &'static [EcoType],
    /// Thermostat routine types.
    pub routine_types: &'static [RoutineType],
}

/// Static description of a device model.
#[derive(Debug, Clone)]
pub struct FeatureMap {
    /// Driving implementation.
    pub model: ModelKind,
    /// Device type identifiers reported by the cloud.
    pub dev_types: &'static [&'static str],
    /// Marketing name.
    pub model_name: &'static str,
    /// Supported features.
    pub features: FeatureSet,
    /// Legal command values.
    pub ranges: ValueRanges,
}

impl FeatureMap {
    /// Returns `true` if the model has `feature`.
    #[must_use]
    pub const fn supports(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    /// Returns the device family.
    #[must_use]
    pub const fn family(&self) -> DeviceFamily {
        self.model.family()
    }

    /// Returns the bypass protocol variant.
    #[must_use]
    pub const fn bypass_version(&self) -> BypassVersion {
        self.model.bypass_version()
    }

    /// Returns the wire spelling of a humidifier mode, if the model has it.
    #[must_use]
    pub fn humidifier_mode_wire(&self, mode: HumidifierMode) -> Option<&'static str> {
        self.ranges
            .humidifier_modes
            .iter()
            .find(|(m, _)| *m == mode)
            .map(|(_, wire)| *wire)
    }

    /// Resolves a reported humidifier mode string for this model.
    #[must_use]
    pub fn humidifier_mode_from_wire(&self, value: &str) -> Option<HumidifierMode> {
        self.ranges
            .humidifier_modes
            .iter()
            .find(|(_, wire)| wire.eq_ignore_ascii_case(value))
            .map(|(m, _)| *m)
            .or_else(|| HumidifierMode::from_wire(value))
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-family state.
//!
//! Every field that depends on a [`Feature`] is a [`Supported`] gated by
//! the device's feature map at construction. Fields every model of the
//! family reports are plain `Option`s.

use serde::{Deserialize, Serialize};

use crate::capabilities::{Feature, FeatureMap};
use crate::response::EnergyHistory;
use crate::types::{
    AutoPreference, Color, ColorMode, DeviceStatus, EcoType, FanMode, HoldOption, HumidifierMode,
    NightlightMode, PurifierMode, RgbColor, ThermostatFanMode, ThermostatRoutine,
    ThermostatWorkMode, WorkStatus,
};

use super::Supported;

macro_rules! accessors {
    ($ty:ty { $( $(#[$doc:meta])* $field:ident: $ret:ty ),+ $(,)? }) => {
        impl $ty {
            $(
                $(#[$doc])*
                #[must_use]
                pub fn $field(&self) -> $ret {
                    self.$field
                }
            )+
        }
    };
}

fn gate<T>(map: &FeatureMap, feature: Feature) -> Supported<T> {
    Supported::gate(map.supports(feature))
}

// ============================================================================
// Outlets
// ============================================================================

/// Instantaneous energy readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyReading {
    /// Power draw in W.
    pub power: f64,
    /// Voltage in V.
    pub voltage: f64,
    /// Energy used today in kWh, where reported.
    pub energy_today: Option<f64>,
}

/// Period of an energy history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyPeriod {
    /// Last seven days.
    Week,
    /// Last thirty days.
    Month,
    /// Last twelve months.
    Year,
}

impl EnergyPeriod {
    /// Every period, shortest first.
    pub const ALL: [Self; 3] = [Self::Week, Self::Month, Self::Year];

    /// Returns the endpoint method serving the period.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Week => "getLastWeekEnergy",
            Self::Month => "getLastMonthEnergy",
            Self::Year => "getLastYearEnergy",
        }
    }
}

/// Outlet state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutletState {
    pub(crate) energy: Supported<EnergyReading>,
    pub(crate) nightlight_status: Supported<DeviceStatus>,
    pub(crate) nightlight_mode: Supported<NightlightMode>,
    pub(crate) weekly_history: Supported<EnergyHistory>,
    pub(crate) monthly_history: Supported<EnergyHistory>,
    pub(crate) yearly_history: Supported<EnergyHistory>,
}

impl OutletState {
    pub(crate) fn new(map: &FeatureMap) -> Self {
        Self {
            energy: gate(map, Feature::EnergyMonitor),
            nightlight_status: gate(map, Feature::Nightlight),
            nightlight_mode: gate(map, Feature::Nightlight),
            weekly_history: gate(map, Feature::EnergyHistory),
            monthly_history: gate(map, Feature::EnergyHistory),
            yearly_history: gate(map, Feature::EnergyHistory),
        }
    }

    /// Energy history of `period`.
    #[must_use]
    pub fn history(&self, period: EnergyPeriod) -> Supported<EnergyHistory> {
        match period {
            EnergyPeriod::Week => self.weekly_history.clone(),
            EnergyPeriod::Month => self.monthly_history.clone(),
            EnergyPeriod::Year => self.yearly_history.clone(),
        }
    }

    pub(crate) fn history_mut(&mut self, period: EnergyPeriod) -> &mut Supported<EnergyHistory> {
        match period {
            EnergyPeriod::Week => &mut self.weekly_history,
            EnergyPeriod::Month => &mut self.monthly_history,
            EnergyPeriod::Year => &mut self.yearly_history,
        }
    }
}

accessors!(OutletState {
    /// Latest energy readings.
    energy: Supported<EnergyReading>,
    /// Whether the nightlight is lit.
    nightlight_status: Supported<DeviceStatus>,
    /// Nightlight setting.
    nightlight_mode: Supported<NightlightMode>,
});

// ============================================================================
// Switches
// ============================================================================

/// Wall switch and dimmer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchState {
    pub(crate) brightness: Supported<u8>,
    pub(crate) indicator_light: Supported<DeviceStatus>,
    pub(crate) backlight: Supported<DeviceStatus>,
    pub(crate) backlight_color: Supported<RgbColor>,
}

impl SwitchState {
    pub(crate) fn new(map: &FeatureMap) -> Self {
        Self {
            brightness: gate(map, Feature::Dimmable),
            indicator_light: gate(map, Feature::IndicatorLight),
            backlight: gate(map, Feature::RgbBacklight),
            backlight_color: gate(map, Feature::RgbBacklight),
        }
    }
}

accessors!(SwitchState {
    /// Brightness 0-100.
    brightness: Supported<u8>,
    /// Indicator light status.
    indicator_light: Supported<DeviceStatus>,
    /// RGB backlight status.
    backlight: Supported<DeviceStatus>,
    /// RGB backlight color.
    backlight_color: Supported<RgbColor>,
});

// ============================================================================
// Bulbs
// ============================================================================

/// Bulb state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulbState {
    pub(crate) brightness: Supported<u8>,
    pub(crate) color_temp: Supported<u8>,
    pub(crate) color_mode: Supported<ColorMode>,
    pub(crate) color: Supported<Color>,
}

impl BulbState {
    pub(crate) fn new(map: &FeatureMap) -> Self {
        Self {
            brightness: gate(map, Feature::Dimmable),
            color_temp: gate(map, Feature::ColorTemp),
            color_mode: gate(map, Feature::Multicolor),
            color: gate(map, Feature::Multicolor),
        }
    }
}

accessors!(BulbState {
    /// Brightness 0-100.
    brightness: Supported<u8>,
    /// White color temperature 0 (warm) to 100 (cool).
    color_temp: Supported<u8>,
    /// White or color output.
    color_mode: Supported<ColorMode>,
    /// Current color.
    color: Supported<Color>,
});

impl BulbState {
    /// Color temperature in Kelvin.
    #[must_use]
    pub fn color_temp_kelvin(&self) -> Supported<u16> {
        self.color_temp.map(crate::types::percent_to_kelvin)
    }
}

// ============================================================================
// Humidifiers
// ============================================================================

/// Humidifier state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumidifierState {
    pub(crate) mode: Option<HumidifierMode>,
    pub(crate) humidity: Option<u8>,
    pub(crate) target_humidity: Option<u8>,
    pub(crate) mist_level: Option<u8>,
    pub(crate) mist_virtual_level: Option<u8>,
    pub(crate) water_lacks: Option<bool>,
    pub(crate) water_tank_lifted: Option<bool>,
    pub(crate) automatic_stop_reached: Option<bool>,
    pub(crate) temperature: Option<f64>,
    pub(crate) display: Supported<bool>,
    pub(crate) automatic_stop: Supported<bool>,
    pub(crate) warm_mist_enabled: Supported<bool>,
    pub(crate) warm_mist_level: Supported<u8>,
    pub(crate) nightlight_brightness: Supported<u8>,
    pub(crate) drying_mode: Supported<bool>,
}

impl HumidifierState {
    pub(crate) fn new(map: &FeatureMap) -> Self {
        Self {
            mode: None,
            humidity: None,
            target_humidity: None,
            mist_level: None,
            mist_virtual_level: None,
            water_lacks: None,
            water_tank_lifted: None,
            automatic_stop_reached: None,
            temperature: None,
            display: gate(map, Feature::Display),
            automatic_stop: gate(map, Feature::AutoStop),
            warm_mist_enabled: gate(map, Feature::WarmMist),
            warm_mist_level: gate(map, Feature::WarmMist),
            nightlight_brightness: gate(map, Feature::NightlightBrightness),
            drying_mode: gate(map, Feature::DryingMode),
        }
    }
}

accessors!(HumidifierState {
    /// Operating mode.
    mode: Option<HumidifierMode>,
    /// Current relative humidity.
    humidity: Option<u8>,
    /// Target relative humidity.
    target_humidity: Option<u8>,
    /// Mist level actually running.
    mist_level: Option<u8>,
    /// Mist level as set.
    mist_virtual_level: Option<u8>,
    /// Tank is empty.
    water_lacks: Option<bool>,
    /// Tank removed.
    water_tank_lifted: Option<bool>,
    /// Stopped after reaching target.
    automatic_stop_reached: Option<bool>,
    /// Ambient temperature, where reported.
    temperature: Option<f64>,
    /// Display on.
    display: Supported<bool>,
    /// Automatic stop configured.
    automatic_stop: Supported<bool>,
    /// Warm mist on.
    warm_mist_enabled: Supported<bool>,
    /// Warm mist level.
    warm_mist_level: Supported<u8>,
    /// Nightlight brightness.
    nightlight_brightness: Supported<u8>,
    /// Automatic drying on.
    drying_mode: Supported<bool>,
});

// ============================================================================
// Purifiers
// ============================================================================

/// Air purifier state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurifierState {
    pub(crate) mode: Option<PurifierMode>,
    pub(crate) fan_level: Option<u8>,
    pub(crate) fan_set_level: Option<u8>,
    pub(crate) filter_life: Option<u8>,
    pub(crate) auto_preference: Option<AutoPreference>,
    pub(crate) room_size: Option<i64>,
    pub(crate) display: Supported<bool>,
    pub(crate) child_lock: Supported<bool>,
    pub(crate) air_quality: Supported<u8>,
    pub(crate) pm25: Supported<f64>,
    pub(crate) nightlight: Supported<NightlightMode>,
    pub(crate) light_detection: Supported<bool>,
    pub(crate) environment_light: Supported<bool>,
    pub(crate) vent_angle: Supported<f64>,
}

impl PurifierState {
    pub(crate) fn new(map: &FeatureMap) -> Self {
        Self {
            mode: None,
            fan_level: None,
            fan_set_level: None,
            filter_life: None,
            auto_preference: None,
            room_size: None,
            display: gate(map, Feature::Display),
            child_lock: gate(map, Feature::ChildLock),
            air_quality: gate(map, Feature::AirQuality),
            pm25: gate(map, Feature::AirQuality),
            nightlight: gate(map, Feature::Nightlight),
            light_detection: gate(map, Feature::LightDetect),
            environment_light: gate(map, Feature::LightDetect),
            vent_angle: gate(map, Feature::VentAngle),
        }
    }
}

accessors!(PurifierState {
    /// Operating mode.
    mode: Option<PurifierMode>,
    /// Fan level currently running.
    fan_level: Option<u8>,
    /// Fan level set for manual mode.
    fan_set_level: Option<u8>,
    /// Remaining filter life in percent.
    filter_life: Option<u8>,
    /// Auto-mode preference.
    auto_preference: Option<AutoPreference>,
    /// Room size used by the efficient preference.
    room_size: Option<i64>,
    /// Display on.
    display: Supported<bool>,
    /// Child lock on.
    child_lock: Supported<bool>,
    /// Air quality index, 1 (best) to 4.
    air_quality: Supported<u8>,
    /// PM2.5 in µg/m³.
    pm25: Supported<f64>,
    /// Nightlight setting.
    nightlight: Supported<NightlightMode>,
    /// Light detection on.
    light_detection: Supported<bool>,
    /// Ambient light detected.
    environment_light: Supported<bool>,
    /// Vent angle.
    vent_angle: Supported<f64>,
});

// ============================================================================
// Fans
// ============================================================================

/// Tower fan state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanState {
    pub(crate) mode: Option<FanMode>,
    pub(crate) fan_level: Option<u8>,
    pub(crate) fan_set_level: Option<u8>,
    pub(crate) temperature: Option<f64>,
    pub(crate) timer_remain: Option<i64>,
    pub(crate) display: Supported<bool>,
    pub(crate) oscillation: Supported<bool>,
    pub(crate) mute: Supported<bool>,
    pub(crate) displaying_type: Supported<bool>,
}

impl FanState {
    pub(crate) fn new(map: &FeatureMap) -> Self {
        Self {
            mode: None,
            fan_level: None,
            fan_set_level: None,
            temperature: None,
            timer_remain: None,
            display: gate(map, Feature::Display),
            oscillation: gate(map, Feature::Oscillation),
            mute: gate(map, Feature::Sound),
            displaying_type: gate(map, Feature::DisplayingType),
        }
    }
}

accessors!(FanState {
    /// Operating mode.
    mode: Option<FanMode>,
    /// Fan level currently running.
    fan_level: Option<u8>,
    /// Fan level set for normal mode.
    fan_set_level: Option<u8>,
    /// Ambient temperature.
    temperature: Option<f64>,
    /// Seconds left on the running timer.
    timer_remain: Option<i64>,
    /// Display on.
    display: Supported<bool>,
    /// Oscillating.
    oscillation: Supported<bool>,
    /// Beeps muted.
    mute: Supported<bool>,
    /// Display shows temperature.
    displaying_type: Supported<bool>,
});

// ============================================================================
// Thermostats
// ============================================================================

/// Thermostat state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermostatState {
    pub(crate) work_mode: Option<ThermostatWorkMode>,
    pub(crate) work_status: Option<WorkStatus>,
    pub(crate) fan_mode: Option<ThermostatFanMode>,
    pub(crate) fan_running: Option<bool>,
    pub(crate) temperature: Option<f64>,
    pub(crate) humidity: Option<u8>,
    pub(crate) heat_to_temp: Option<f64>,
    pub(crate) cool_to_temp: Option<f64>,
    pub(crate) deadband: Option<f64>,
    pub(crate) lock: Option<bool>,
    pub(crate) hold_option: Option<HoldOption>,
    pub(crate) hold_end_time: Option<i64>,
    pub(crate) eco_type: Option<EcoType>,
    pub(crate) routine_running_id: Option<i64>,
    pub(crate) temp_unit: Option<String>,
    pub(crate) supported_modes: Vec<ThermostatWorkMode>,
    pub(crate) routines: Vec<ThermostatRoutine>,
}

impl ThermostatState {
    pub(crate) fn new(_map: &FeatureMap) -> Self {
        Self::default()
    }

    /// Temperature unit, `f` or `c`.
    #[must_use]
    pub fn temp_unit(&self) -> Option<&str> {
        self.temp_unit.as_deref()
    }

    /// Work modes the installation supports.
    #[must_use]
    pub fn supported_modes(&self) -> &[ThermostatWorkMode] {
        &self.supported_modes
    }

    /// Stored routines.
    #[must_use]
    pub fn routines(&self) -> &[ThermostatRoutine] {
        &self.routines
    }
}

accessors!(ThermostatState {
    /// Operating mode.
    work_mode: Option<ThermostatWorkMode>,
    /// What the equipment is doing.
    work_status: Option<WorkStatus>,
    /// Fan mode.
    fan_mode: Option<ThermostatFanMode>,
    /// Fan running.
    fan_running: Option<bool>,
    /// Current temperature.
    temperature: Option<f64>,
    /// Relative humidity.
    humidity: Option<u8>,
    /// Heating setpoint.
    heat_to_temp: Option<f64>,
    /// Cooling setpoint.
    cool_to_temp: Option<f64>,
    /// Minimum gap between setpoints.
    deadband: Option<f64>,
    /// Keypad locked.
    lock: Option<bool>,
    /// Active hold option.
    hold_option: Option<HoldOption>,
    /// Unix time the hold ends.
    hold_end_time: Option<i64>,
    /// Comfort versus savings setting.
    eco_type: Option<EcoType>,
    /// Identifier of the running routine.
    routine_running_id: Option<i64>,
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn fields_are_gated_by_features() {
        let core200 = registry::lookup("Core200S").unwrap();
        let state = PurifierState::new(core200);
        assert_eq!(state.air_quality(), Supported::NotSupported);
        assert_eq!(state.nightlight(), Supported::Unknown);
        assert_eq!(state.child_lock(), Supported::Unknown);

        let core300 = registry::lookup("Core300S").unwrap();
        let state = PurifierState::new(core300);
        assert_eq!(state.air_quality(), Supported::Unknown);
        assert_eq!(state.nightlight(), Supported::NotSupported);
    }

    #[test]
    fn energy_history_gated_apart_from_readings() {
        let plug = registry::lookup("BSDOG01").unwrap();
        let state = OutletState::new(plug);
        assert_eq!(state.energy(), Supported::Unknown);
        assert_eq!(state.history(EnergyPeriod::Week), Supported::NotSupported);

        let mut state = OutletState::new(registry::lookup("ESW15-USA").unwrap());
        state.history_mut(EnergyPeriod::Year).set(EnergyHistory::default());
        assert!(state.history(EnergyPeriod::Year).is_known());
        assert_eq!(state.history(EnergyPeriod::Month), Supported::Unknown);
    }

    #[test]
    fn bulb_gates() {
        let esl100 = registry::lookup("ESL100").unwrap();
        let state = BulbState::new(esl100);
        assert!(state.brightness().is_supported());
        assert!(!state.color_temp().is_supported());
        assert!(!state.color().is_supported());
        assert_eq!(state.color_temp_kelvin(), Supported::NotSupported);
    }

    #[test]
    fn humidifier_gates() {
        let lv600 = registry::lookup("LUH-A602S-WUS").unwrap();
        let state = HumidifierState::new(lv600);
        assert!(state.warm_mist_level().is_supported());
        assert!(!state.nightlight_brightness().is_supported());
        assert!(!state.drying_mode().is_supported());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Air purifier commands.
//!
//! Three request vocabularies exist. Core models use snake-case keys and
//! JSON booleans, Vital, Everest and Sprout models use camel-case keys
//! with integer switches, and the LV-PUR131S speaks bypass V1 with
//! `on`/`off` strings.

use async_trait::async_trait;
use serde_json::json;

use super::traits::Toggleable;
use super::{Purifier, declared, flip, status_str, switch_int};
use crate::capabilities::{Feature, ModelKind};
use crate::error::{Result, ValidationError};
use crate::response::{
    CorePurifier, Lv131Purifier, PurifierResult, RoomPreference, SproutPurifier, VitalPurifier,
};
use crate::state::{DeviceState, PurifierState};
use crate::types::{AutoPreference, DeviceStatus, NightlightMode, PurifierMode};

/// Fan level the Sprout reports while the fan is stopped.
const SPROUT_STOPPED_LEVEL: u8 = 255;

/// Request vocabulary of a purifier model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Core,
    WorkMode,
    Lv131,
}

impl Purifier {
    fn dialect(&self) -> Dialect {
        match self.features().model {
            ModelKind::CorePurifier => Dialect::Core,
            ModelKind::Lv131Purifier => Dialect::Lv131,
            _ => Dialect::WorkMode,
        }
    }

    /// Fetches the purifier's status.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        let method = if self.dialect() == Dialect::Lv131 {
            "deviceDetail"
        } else {
            "getPurifierStatus"
        };
        self.refresh(method, json!({}), |result, common, family| match result {
            PurifierResult::Core(status) => apply_core(&status, common, family),
            PurifierResult::Vital(status) => apply_vital(&status, common, family),
            PurifierResult::Sprout(status) => apply_sprout(&status, common, family),
            PurifierResult::Lv131(status) => apply_lv131(&status, common, family),
        })
        .await
    }

    // ========== Power Control ==========

    /// Switches the purifier; `None` inverts the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Offline` for offline devices, or the errors of the
    /// call.
    pub async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::OnOff)?;
        let on = self.target_power(on);
        let (method, data) = match self.dialect() {
            Dialect::Core => ("setSwitch", json!({"enabled": on, "id": 0})),
            Dialect::WorkMode => (
                "setSwitch",
                json!({"powerSwitch": switch_int(on), "switchIdx": 0}),
            ),
            Dialect::Lv131 => ("airPurifierPowerSwitchCtl", json!({"status": status_str(on)})),
        };
        self.command(method, data).await?;
        self.set_power(on);
        Ok(())
    }

    // ========== Modes and Speed ==========

    /// Sets the operating mode.
    ///
    /// Switching to manual re-applies the last manual fan level, or the
    /// lowest level when none is known.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for modes the model does
    /// not offer, otherwise the errors of the call.
    pub async fn set_mode(&self, mode: PurifierMode) -> Result<()> {
        self.ensure_online()?;
        if !self.features().ranges.purifier_modes.contains(&mode) {
            return Err(ValidationError::InvalidChoice {
                field: "mode",
                value: mode.to_string(),
            }
            .into());
        }
        if mode == PurifierMode::Manual {
            let range = declared(self.features().ranges.fan_levels, "fan_levels")?;
            let level = self
                .read_family(|f| f.fan_set_level)
                .filter(|level| range.contains(*level))
                .unwrap_or(range.min());
            return self.send_fan_level(level).await;
        }
        let (method, data) = match self.dialect() {
            Dialect::Core => ("setPurifierMode", json!({"mode": mode.as_str()})),
            Dialect::WorkMode => ("setPurifierMode", json!({"workMode": mode.as_str()})),
            Dialect::Lv131 => ("airPurifierRunModeCtl", json!({"mode": mode.as_str()})),
        };
        self.command(method, data).await?;
        self.update_state(|_, family| family.mode = Some(mode));
        Ok(())
    }

    /// Sets the manual fan level; `None` advances one level, wrapping to
    /// the lowest after the highest.
    ///
    /// An explicit level switches the purifier to manual mode. Advancing
    /// needs it to run in manual mode already.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotControllable` when advancing in a mode
    /// other than manual, `ValidationError::OutOfRange` outside the model's
    /// levels, otherwise the errors of the call.
    pub async fn set_fan_speed(&self, level: Option<u8>) -> Result<()> {
        self.ensure_online()?;
        let range = declared(self.features().ranges.fan_levels, "fan_levels")?;
        let level = match level {
            Some(level) => range.validate("fan_level", level)?,
            None => {
                if let Some(mode) = self.read_family(|f| f.mode)
                    && !mode.accepts_fan_speed()
                {
                    return Err(ValidationError::NotControllable {
                        reason: format!("fan speed cannot be advanced in {mode} mode"),
                    }
                    .into());
                }
                range.bump(self.read_family(|f| f.fan_set_level).unwrap_or(0))
            }
        };
        self.send_fan_level(level).await
    }

    async fn send_fan_level(&self, level: u8) -> Result<()> {
        let (method, data) = match self.dialect() {
            Dialect::Core => ("setLevel", json!({"id": 0, "level": level, "type": "wind"})),
            Dialect::WorkMode => (
                "setLevel",
                json!({"levelIdx": 0, "manualSpeedLevel": level, "levelType": "wind"}),
            ),
            Dialect::Lv131 => ("airPurifierSpeedCtl", json!({"level": level})),
        };
        self.command(method, data).await?;
        self.update_state(|common, family| {
            common.set_device_status(DeviceStatus::On);
            family.mode = Some(PurifierMode::Manual);
            family.fan_level = Some(level);
            family.fan_set_level = Some(level);
        });
        Ok(())
    }

    /// Sets the auto-mode preference and the room size it is tuned for.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for preferences the model
    /// does not offer, otherwise the errors of the call.
    pub async fn set_auto_preference(
        &self,
        preference: AutoPreference,
        room_size: u32,
    ) -> Result<()> {
        self.ensure_online()?;
        if !self
            .features()
            .ranges
            .auto_preferences
            .contains(&preference)
        {
            return Err(ValidationError::InvalidChoice {
                field: "auto_preference",
                value: preference.to_string(),
            }
            .into());
        }
        let data = match self.dialect() {
            Dialect::Core => json!({"type": preference.as_str(), "room_size": room_size}),
            _ => json!({"autoPreference": preference.as_str(), "roomSize": room_size}),
        };
        self.command("setAutoPreference", data).await?;
        self.update_state(|_, family| {
            family.auto_preference = Some(preference);
            family.room_size = Some(i64::from(room_size));
        });
        Ok(())
    }

    // ========== Toggles ==========

    /// Switches the child lock; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_child_lock(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::ChildLock)?;
        let on = flip(on, self.read_family(PurifierState::child_lock));
        let data = match self.dialect() {
            Dialect::Core => json!({"child_lock": on}),
            _ => json!({"childLockSwitch": switch_int(on)}),
        };
        self.command("setChildLock", data).await?;
        self.update_state(|_, family| {
            family.child_lock.set(on);
        });
        Ok(())
    }

    /// Switches the display; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_display(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::Display)?;
        let on = flip(on, self.read_family(PurifierState::display));
        let (method, data) = match self.dialect() {
            Dialect::Core => ("setDisplay", json!({"state": on})),
            Dialect::WorkMode => ("setDisplay", json!({"screenSwitch": switch_int(on)})),
            Dialect::Lv131 => ("airPurifierScreenCtl", json!({"status": status_str(on)})),
        };
        self.command(method, data).await?;
        self.update_state(|_, family| {
            family.display.set(on);
        });
        Ok(())
    }

    /// Switches automatic display dimming on ambient light; `None` inverts
    /// it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_light_detection(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::LightDetect)?;
        let on = flip(on, self.read_family(PurifierState::light_detection));
        self.command(
            "setLightDetection",
            json!({"lightDetectionSwitch": switch_int(on)}),
        )
        .await?;
        self.update_state(|_, family| {
            family.light_detection.set(on);
        });
        Ok(())
    }

    /// Sets the nightlight.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for modes the model does
    /// not offer, otherwise the errors of the call.
    pub async fn set_nightlight_mode(&self, mode: NightlightMode) -> Result<()> {
        self.gate(Feature::Nightlight)?;
        if !self.features().ranges.nightlight_modes.contains(&mode) {
            return Err(ValidationError::InvalidChoice {
                field: "nightlight_mode",
                value: mode.to_string(),
            }
            .into());
        }
        self.command("setNightLight", json!({"night_light": mode.as_str()}))
            .await?;
        self.update_state(|_, family| {
            family.nightlight.set(mode);
        });
        Ok(())
    }

    /// Resets the filter life counter to 100 %.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn reset_filter(&self) -> Result<()> {
        self.gate(Feature::ResetFilter)?;
        self.command("resetFilter", json!({})).await?;
        self.update_state(|_, family| family.filter_life = Some(100));
        Ok(())
    }
}

// ============================================================================
// Reply mapping
// ============================================================================

fn apply_preference(preference: Option<&RoomPreference>, family: &mut PurifierState) {
    if let Some(preference) = preference {
        family.auto_preference = AutoPreference::from_wire(&preference.kind);
        family.room_size = Some(preference.room_size);
    }
}

fn apply_core(status: &CorePurifier, common: &mut DeviceState, family: &mut PurifierState) {
    common.set_device_status(DeviceStatus::from_bool(status.enabled));
    family.mode = PurifierMode::from_wire(&status.mode);
    family.fan_level = Some(status.level);
    if status.level > 0 {
        family.fan_set_level = Some(status.level);
    }
    family.filter_life = Some(status.filter_life);
    family.air_quality.set_opt(status.air_quality);
    family.pm25.set_opt(status.air_quality_value);
    family.child_lock.set_opt(status.child_lock);
    family
        .nightlight
        .set_opt(status.night_light.as_deref().and_then(NightlightMode::from_wire));
    let display = status
        .display
        .or_else(|| status.configuration.as_ref().map(|c| c.display));
    family.display.set_opt(display);
    apply_preference(
        status
            .configuration
            .as_ref()
            .and_then(|c| c.auto_preference.as_ref()),
        family,
    );
}

fn apply_vital(status: &VitalPurifier, common: &mut DeviceState, family: &mut PurifierState) {
    common.set_device_status(DeviceStatus::from_bool(status.power_switch));
    family.mode = PurifierMode::from_wire(&status.work_mode);
    family.fan_level = Some(running_level(status.fan_speed_level));
    family.fan_set_level = Some(status.manual_speed_level);
    family.filter_life = Some(status.filter_life_percent);
    family.air_quality.set_opt(status.aq_level);
    family.pm25.set_opt(status.pm25);
    family.display.set(status.screen_switch);
    family.child_lock.set(status.child_lock_switch);
    family.light_detection.set(status.light_detection_switch);
    family.environment_light.set(status.environment_light_state);
    family.vent_angle.set_opt(status.fan_rotate_angle);
    apply_preference(status.auto_preference.as_ref(), family);
}

fn apply_sprout(status: &SproutPurifier, common: &mut DeviceState, family: &mut PurifierState) {
    common.set_device_status(DeviceStatus::from_bool(status.power_switch));
    family.mode = PurifierMode::from_wire(&status.work_mode);
    family.fan_level = status.fan_speed_level.map(running_level);
    family.fan_set_level = status.manual_speed_level;
    family.air_quality.set_opt(status.aq_level);
    family.pm25.set_opt(status.pm25);
    family.display.set(status.screen_switch);
    family.child_lock.set(status.child_lock_switch);
    if let Some(light) = &status.nightlight {
        family.nightlight.set(if light.night_light_switch {
            NightlightMode::On
        } else {
            NightlightMode::Off
        });
    }
    apply_preference(status.auto_preference.as_ref(), family);
}

fn apply_lv131(status: &Lv131Purifier, common: &mut DeviceState, family: &mut PurifierState) {
    common.set_device_status(DeviceStatus::from_wire(&status.device_status));
    common.set_active_time(status.active_time);
    family.mode = PurifierMode::from_wire(&status.mode);
    family.fan_level = Some(status.level.unwrap_or(0));
    if let Some(level) = status.level.filter(|level| *level > 0) {
        family.fan_set_level = Some(level);
    }
    if let Some(filter) = &status.filter_life {
        family.filter_life = Some(filter.percent);
    }
    family
        .display
        .set(DeviceStatus::from_wire(&status.screen_status).is_on());
    family
        .child_lock
        .set(DeviceStatus::from_wire(&status.child_lock).is_on());
    family.air_quality.set_opt(air_quality_index(&status.air_quality));
}

const fn running_level(level: u8) -> u8 {
    if level == SPROUT_STOPPED_LEVEL { 0 } else { level }
}

/// Maps the LV-PUR131S air quality label to the 1 (best) to 4 index.
fn air_quality_index(label: &str) -> Option<u8> {
    match label.to_ascii_lowercase().as_str() {
        "excellent" => Some(1),
        "good" => Some(2),
        "moderate" => Some(3),
        "inferior" | "bad" => Some(4),
        _ => None,
    }
}

#[async_trait]
impl Toggleable for Purifier {
    async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        Purifier::toggle_switch(self, on).await
    }

    fn is_on(&self) -> bool {
        Purifier::is_on(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{device, last_data, last_method, v1, v2};
    use super::*;
    use crate::error::Error;
    use crate::state::{StatePhase, Supported};
    use serde_json::Value;

    fn mode_payload(core: bool, mode: PurifierMode) -> Value {
        if core {
            json!({"mode": mode.as_str()})
        } else {
            json!({"workMode": mode.as_str()})
        }
    }

    #[tokio::test]
    async fn core_status_fills_state() {
        let (purifier, transport) = device::<PurifierState>("Core200S");
        transport.push_json(v2(json!({
            "enabled": true,
            "filter_life": 87,
            "mode": "manual",
            "level": 2,
            "display": true,
            "child_lock": false,
            "night_light": "dim",
            "configuration": {"display": true, "display_forever": false},
            "device_error_code": 0,
        })));
        purifier.update().await.unwrap();

        assert_eq!(purifier.state().phase(), StatePhase::Known);
        assert!(purifier.is_on());
        let details = purifier.details();
        assert_eq!(details.mode(), Some(PurifierMode::Manual));
        assert_eq!(details.fan_set_level(), Some(2));
        assert_eq!(details.filter_life(), Some(87));
        assert_eq!(details.nightlight(), Supported::Value(NightlightMode::Dim));
        assert_eq!(details.air_quality(), Supported::NotSupported);
        assert_eq!(last_method(&transport), "getPurifierStatus");
    }

    #[tokio::test]
    async fn vital_status_maps_camel_case_fields() {
        let (purifier, transport) = device::<PurifierState>("LAP-V201S-WUS");
        transport.push_json(v2(json!({
            "powerSwitch": 1,
            "filterLifePercent": 90,
            "workMode": "auto",
            "manualSpeedLevel": 3,
            "fanSpeedLevel": 255,
            "AQLevel": 1,
            "PM25": 4,
            "screenSwitch": 1,
            "screenState": 1,
            "childLockSwitch": 1,
            "lightDetectionSwitch": 0,
            "environmentLightState": 1,
            "autoPreference": {"autoPreferenceType": "efficient", "roomSize": 600},
        })));
        purifier.update().await.unwrap();

        let details = purifier.details();
        assert_eq!(details.mode(), Some(PurifierMode::Auto));
        assert_eq!(details.fan_level(), Some(0));
        assert_eq!(details.air_quality(), Supported::Value(1));
        assert_eq!(details.child_lock(), Supported::Value(true));
        assert_eq!(details.light_detection(), Supported::Value(false));
        assert_eq!(details.auto_preference(), Some(AutoPreference::Efficient));
        assert_eq!(details.room_size(), Some(600));
        assert_eq!(details.vent_angle(), Supported::NotSupported);
    }

    #[tokio::test]
    async fn lv131_detail_uses_labels() {
        let (purifier, transport) = device::<PurifierState>("LV-PUR131S");
        transport.push_json(v1(json!({
            "deviceStatus": "on",
            "connectionStatus": "online",
            "activeTime": 30,
            "screenStatus": "on",
            "level": 2,
            "mode": "manual",
            "airQuality": "moderate",
            "childLock": "off",
            "filterLife": {"change": false, "useHour": 100, "percent": 70},
        })));
        purifier.update().await.unwrap();

        let details = purifier.details();
        assert_eq!(details.air_quality(), Supported::Value(3));
        assert_eq!(details.filter_life(), Some(70));
        assert_eq!(details.display(), Supported::Value(true));
        assert_eq!(details.child_lock(), Supported::NotSupported);
        assert_eq!(
            transport.calls()[0].path,
            "/cloud/v1/deviceManaged/deviceDetail"
        );

        purifier.toggle_switch(Some(false)).await.unwrap();
        assert_eq!(transport.last_body().unwrap()["status"], "off");
        assert!(!purifier.is_on());
    }

    #[tokio::test]
    async fn fan_speed_bump_wraps_to_lowest() {
        let (purifier, transport) = device::<PurifierState>("Core200S");
        transport.push_json(v2(json!({"enabled": true, "mode": "manual", "level": 3})));
        purifier.update().await.unwrap();

        purifier.set_fan_speed(None).await.unwrap();
        assert_eq!(last_method(&transport), "setLevel");
        assert_eq!(
            last_data(&transport),
            json!({"id": 0, "level": 1, "type": "wind"})
        );
        assert_eq!(purifier.details().fan_set_level(), Some(1));

        purifier.set_fan_speed(None).await.unwrap();
        assert_eq!(purifier.details().fan_set_level(), Some(2));
    }

    #[tokio::test]
    async fn fan_speed_bump_requires_manual_mode() {
        let (purifier, transport) = device::<PurifierState>("Core300S");
        transport.push_json(v2(json!({"enabled": true, "mode": "auto", "level": 1})));
        purifier.update().await.unwrap();

        let err = purifier.set_fan_speed(None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NotControllable { .. })
        ));
        assert_eq!(transport.call_count(), 1);
        assert_eq!(purifier.details().mode(), Some(PurifierMode::Auto));
    }

    #[tokio::test]
    async fn explicit_fan_speed_switches_to_manual() {
        let (purifier, transport) = device::<PurifierState>("Core300S");
        transport.push_json(v2(json!({"enabled": true, "mode": "auto", "level": 1})));
        purifier.update().await.unwrap();

        purifier.set_fan_speed(Some(2)).await.unwrap();
        assert_eq!(transport.call_count(), 2);
        assert_eq!(last_method(&transport), "setLevel");
        assert_eq!(
            last_data(&transport),
            json!({"id": 0, "level": 2, "type": "wind"})
        );
        let details = purifier.details();
        assert_eq!(details.mode(), Some(PurifierMode::Manual));
        assert_eq!(details.fan_set_level(), Some(2));

        assert!(purifier.set_fan_speed(Some(9)).await.is_err());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn fan_speed_validates_range() {
        let (purifier, transport) = device::<PurifierState>("LAP-V102S-WUS");
        let err = purifier.set_fan_speed(Some(5)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::OutOfRange { max: 4, .. })
        ));
        assert_eq!(transport.call_count(), 0);

        purifier.set_fan_speed(Some(4)).await.unwrap();
        assert_eq!(
            last_data(&transport),
            json!({"levelIdx": 0, "manualSpeedLevel": 4, "levelType": "wind"})
        );
        assert_eq!(purifier.details().mode(), Some(PurifierMode::Manual));
        assert!(purifier.is_on());
    }

    #[tokio::test]
    async fn manual_mode_goes_through_set_level() {
        let (purifier, transport) = device::<PurifierState>("Core300S");
        purifier.set_mode(PurifierMode::Manual).await.unwrap();
        assert_eq!(last_method(&transport), "setLevel");
        assert_eq!(last_data(&transport)["level"], 1);

        purifier.set_mode(PurifierMode::Sleep).await.unwrap();
        assert_eq!(last_method(&transport), "setPurifierMode");
        assert_eq!(last_data(&transport), mode_payload(true, PurifierMode::Sleep));
    }

    #[tokio::test]
    async fn mode_outside_model_list_is_rejected() {
        let (purifier, transport) = device::<PurifierState>("Core200S");
        let err = purifier.set_mode(PurifierMode::Auto).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidChoice { field: "mode", .. })
        ));
        assert_eq!(transport.call_count(), 0);

        let (vital, transport) = device::<PurifierState>("LAP-V102S-WUS");
        vital.set_mode(PurifierMode::Pet).await.unwrap();
        assert_eq!(last_data(&transport), mode_payload(false, PurifierMode::Pet));
    }

    #[tokio::test]
    async fn toggles_use_dialect_keys() {
        let (core, transport) = device::<PurifierState>("Core200S");
        core.toggle_child_lock(Some(true)).await.unwrap();
        assert_eq!(last_data(&transport), json!({"child_lock": true}));
        core.toggle_display(Some(false)).await.unwrap();
        assert_eq!(last_data(&transport), json!({"state": false}));
        assert_eq!(core.details().child_lock(), Supported::Value(true));

        let (vital, transport) = device::<PurifierState>("LAP-V201S-WUS");
        vital.toggle_child_lock(Some(true)).await.unwrap();
        assert_eq!(last_data(&transport), json!({"childLockSwitch": 1}));
        vital.toggle_light_detection(None).await.unwrap();
        assert_eq!(last_data(&transport), json!({"lightDetectionSwitch": 1}));
        assert_eq!(vital.details().light_detection(), Supported::Value(true));
    }

    #[tokio::test]
    async fn reset_filter_and_preference() {
        let (core, transport) = device::<PurifierState>("Core200S");
        core.reset_filter().await.unwrap();
        assert_eq!(last_method(&transport), "resetFilter");
        assert_eq!(core.details().filter_life(), Some(100));

        core.set_auto_preference(AutoPreference::Efficient, 400)
            .await
            .unwrap();
        assert_eq!(
            last_data(&transport),
            json!({"type": "efficient", "room_size": 400})
        );

        let (core300, transport) = device::<PurifierState>("Core300S");
        let err = core300.reset_filter().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnsupportedFeature {
                feature: Feature::ResetFilter
            })
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn nightlight_on_core200s() {
        let (core, transport) = device::<PurifierState>("Core200S");
        core.set_nightlight_mode(NightlightMode::Dim).await.unwrap();
        assert_eq!(last_method(&transport), "setNightLight");
        assert_eq!(last_data(&transport), json!({"night_light": "dim"}));

        let err = core.set_nightlight_mode(NightlightMode::Auto).await;
        assert!(err.is_err());
        assert_eq!(transport.call_count(), 1);
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Humidifier commands.
//!
//! Classic-line models use snake-ish keys (`enabled`, `target_humidity`,
//! `type`); the `OasisMist` 1000S and Superior 6000S use the newer
//! `powerSwitch`/`workMode` vocabulary with integer switches.

use async_trait::async_trait;
use serde_json::json;

use super::traits::Toggleable;
use super::{Humidifier, PERCENT, declared, flip, switch_int};
use crate::capabilities::{Feature, FeatureMap, ModelKind};
use crate::error::{Result, ValidationError};
use crate::response::{ClassicHumidifier, HumidifierResult, WorkModeHumidifier};
use crate::state::{DeviceState, HumidifierState};
use crate::types::{DeviceStatus, HumidifierMode};

impl Humidifier {
    fn is_classic(&self) -> bool {
        self.features().model == ModelKind::ClassicHumidifier
    }

    /// Fetches the humidifier's status.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        let features = self.features();
        self.refresh("getHumidifierStatus", json!({}), move |result, common, family| {
            match result {
                HumidifierResult::Classic(status) => {
                    apply_classic(features, &status, common, family);
                }
                HumidifierResult::WorkMode(status) | HumidifierResult::Superior(status) => {
                    apply_work_mode(features, &status, common, family);
                }
            }
        })
        .await
    }

    // ========== Power Control ==========

    /// Switches the humidifier; `None` inverts the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Offline` for offline devices, or the errors of the
    /// call.
    pub async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::OnOff)?;
        let on = self.target_power(on);
        let data = if self.is_classic() {
            json!({"enabled": on, "id": 0})
        } else {
            json!({"powerSwitch": switch_int(on), "switchIdx": 0})
        };
        self.command("setSwitch", data).await?;
        self.set_power(on);
        Ok(())
    }

    // ========== Modes and Levels ==========

    /// Sets the operating mode.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for modes the model does
    /// not offer, otherwise the errors of the call.
    pub async fn set_mode(&self, mode: HumidifierMode) -> Result<()> {
        self.ensure_online()?;
        let wire = self
            .features()
            .humidifier_mode_wire(mode)
            .ok_or_else(|| ValidationError::InvalidChoice {
                field: "mode",
                value: mode.to_string(),
            })?;
        let data = if self.is_classic() {
            json!({"mode": wire})
        } else {
            json!({"workMode": wire})
        };
        self.command("setHumidityMode", data).await?;
        self.update_state(|_, family| family.mode = Some(mode));
        Ok(())
    }

    /// Sets the mist level; `None` advances one level, wrapping to the
    /// lowest after the highest.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` outside the model's levels,
    /// otherwise the errors of the call.
    pub async fn set_mist_level(&self, level: Option<u8>) -> Result<()> {
        self.ensure_online()?;
        let range = declared(self.features().ranges.mist_levels, "mist_levels")?;
        let level = match level {
            Some(level) => range.validate("mist_level", level)?,
            None => range.bump(self.read_family(|f| f.mist_virtual_level).unwrap_or(0)),
        };
        let (method, data) = match self.features().model {
            ModelKind::ClassicHumidifier => (
                "setVirtualLevel",
                json!({"id": 0, "level": level, "type": "mist"}),
            ),
            ModelKind::Oasis1000S => (
                "virtualLevel",
                json!({"levelIdx": 0, "virtualLevel": level, "levelType": "mist"}),
            ),
            _ => (
                "setVirtualLevel",
                json!({"levelIdx": 0, "virtualLevel": level, "levelType": "mist"}),
            ),
        };
        self.command(method, data).await?;
        self.update_state(|_, family| {
            family.mist_virtual_level = Some(level);
        });
        Ok(())
    }

    /// Sets the warm mist level; 0 switches the heater off.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` outside the model's levels,
    /// otherwise the errors of the call.
    pub async fn set_warm_level(&self, level: u8) -> Result<()> {
        self.gate(Feature::WarmMist)?;
        let range = declared(self.features().ranges.warm_levels, "warm_levels")?;
        let level = range.validate("warm_level", level)?;
        self.command(
            "setVirtualLevel",
            json!({"type": "warm", "level": level, "id": 0}),
        )
        .await?;
        self.update_state(|_, family| {
            family.warm_mist_level.set(level);
            family.warm_mist_enabled.set(level > 0);
        });
        Ok(())
    }

    /// Sets the target relative humidity.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` outside 30-80 %, otherwise
    /// the errors of the call.
    pub async fn set_target_humidity(&self, humidity: u8) -> Result<()> {
        self.ensure_online()?;
        let range = declared(self.features().ranges.target_humidity, "target_humidity")?;
        let humidity = range.validate("target_humidity", humidity)?;
        let data = if self.is_classic() {
            json!({"target_humidity": humidity})
        } else {
            json!({"targetHumidity": humidity})
        };
        self.command("setTargetHumidity", data).await?;
        self.update_state(|_, family| family.target_humidity = Some(humidity));
        Ok(())
    }

    // ========== Toggles ==========

    /// Switches the display; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_display(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::Display)?;
        let on = flip(on, self.read_family(HumidifierState::display));
        let (method, data) = if self.supports(Feature::IndicatorLight) {
            ("setIndicatorLightSwitch", json!({"enabled": on, "id": 0}))
        } else if self.is_classic() {
            ("setDisplay", json!({"state": on}))
        } else {
            ("setDisplay", json!({"screenSwitch": switch_int(on)}))
        };
        self.command(method, data).await?;
        self.update_state(|_, family| {
            family.display.set(on);
        });
        Ok(())
    }

    /// Switches stopping at the target humidity; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_automatic_stop(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::AutoStop)?;
        let on = flip(on, self.read_family(HumidifierState::automatic_stop));
        let (method, data) = if self.is_classic() {
            ("setAutomaticStop", json!({"enabled": on}))
        } else {
            ("setAutoStopSwitch", json!({"autoStopSwitch": switch_int(on)}))
        };
        self.command(method, data).await?;
        self.update_state(|_, family| {
            family.automatic_stop.set(on);
        });
        Ok(())
    }

    /// Sets nightlight brightness 0-100.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` above 100, otherwise the
    /// errors of the call.
    pub async fn set_nightlight_brightness(&self, brightness: u8) -> Result<()> {
        self.gate(Feature::NightlightBrightness)?;
        let brightness = PERCENT.validate("nightlight_brightness", brightness)?;
        self.command(
            "setNightLightBrightness",
            json!({"night_light_brightness": brightness}),
        )
        .await?;
        self.update_state(|_, family| {
            family.nightlight_brightness.set(brightness);
        });
        Ok(())
    }

    /// Switches wick drying after shutdown; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_drying_mode(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::DryingMode)?;
        let on = flip(on, self.read_family(HumidifierState::drying_mode));
        self.command(
            "setDryingMode",
            json!({"autoDryingSwitch": switch_int(on)}),
        )
        .await?;
        self.update_state(|_, family| {
            family.drying_mode.set(on);
        });
        Ok(())
    }
}

fn apply_classic(
    features: &FeatureMap,
    status: &ClassicHumidifier,
    common: &mut DeviceState,
    family: &mut HumidifierState,
) {
    common.set_device_status(DeviceStatus::from_bool(status.enabled));
    family.mode = features.humidifier_mode_from_wire(&status.mode);
    family.humidity = status.humidity;
    family.mist_level = Some(status.mist_level);
    family.mist_virtual_level = Some(status.mist_virtual_level);
    family.water_lacks = Some(status.water_lacks);
    family.water_tank_lifted = Some(status.water_tank_lifted);
    family.automatic_stop_reached = Some(status.automatic_stop_reach_target);
    family.display.set(status.display);
    family.warm_mist_enabled.set(status.warm_enabled);
    family.warm_mist_level.set_opt(status.warm_level);
    family.nightlight_brightness.set_opt(status.night_light_brightness);
    if let Some(config) = &status.configuration {
        family.target_humidity = Some(config.auto_target_humidity);
        family.automatic_stop.set(config.automatic_stop);
    }
}

fn apply_work_mode(
    features: &FeatureMap,
    status: &WorkModeHumidifier,
    common: &mut DeviceState,
    family: &mut HumidifierState,
) {
    common.set_device_status(DeviceStatus::from_bool(status.power_switch));
    family.mode = features.humidifier_mode_from_wire(&status.work_mode);
    family.humidity = Some(status.humidity);
    family.target_humidity = Some(status.target_humidity);
    family.mist_level = Some(status.mist_level);
    family.mist_virtual_level = Some(status.virtual_level);
    family.water_lacks = Some(status.water_lacks_state);
    family.water_tank_lifted = Some(status.water_tank_lifted);
    family.automatic_stop_reached = Some(status.auto_stop_state);
    family.temperature = status.temperature;
    family.display.set(status.screen_switch);
    family.automatic_stop.set(status.auto_stop_switch);
    if let Some(drying) = &status.drying_mode {
        family.drying_mode.set(drying.auto_drying_switch);
    }
    if let Some(light) = &status.night_light {
        family.nightlight_brightness.set(light.brightness);
    }
}

#[async_trait]
impl Toggleable for Humidifier {
    async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        Humidifier::toggle_switch(self, on).await
    }

    fn is_on(&self) -> bool {
        Humidifier::is_on(self)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{device, last_data, last_method, v2};
    use super::*;
    use crate::error::Error;
    use crate::state::Supported;
    use serde_json::Value;

    fn classic_level(level: u8, kind: &str) -> Value {
        json!({"id": 0, "level": level, "type": kind})
    }

    fn classic_status(level: u8) -> Value {
        v2(json!({
            "enabled": true,
            "humidity": 45,
            "mist_virtual_level": level,
            "mist_level": level,
            "mode": "manual",
            "water_lacks": false,
            "humidity_high": false,
            "water_tank_lifted": false,
            "display": true,
            "automatic_stop_reach_target": false,
            "night_light_brightness": 0,
            "configuration": {"auto_target_humidity": 50, "display": true, "automatic_stop": true},
        }))
    }

    #[tokio::test]
    async fn classic_status_fills_state() {
        let (humidifier, transport) = device::<HumidifierState>("Classic300S");
        transport.push_json(classic_status(4));
        humidifier.update().await.unwrap();

        let details = humidifier.details();
        assert!(humidifier.is_on());
        assert_eq!(details.mode(), Some(HumidifierMode::Manual));
        assert_eq!(details.target_humidity(), Some(50));
        assert_eq!(details.automatic_stop(), Supported::Value(true));
        assert_eq!(details.warm_mist_level(), Supported::NotSupported);
    }

    #[tokio::test]
    async fn mist_bump_wraps_to_lowest_level() {
        let (humidifier, transport) = device::<HumidifierState>("Classic300S");
        transport.push_json(classic_status(9));
        humidifier.update().await.unwrap();

        humidifier.set_mist_level(None).await.unwrap();
        assert_eq!(last_data(&transport), classic_level(1, "mist"));
        assert_eq!(humidifier.details().mist_virtual_level(), Some(1));

        humidifier.set_mist_level(None).await.unwrap();
        assert_eq!(last_data(&transport), classic_level(2, "mist"));
    }

    #[tokio::test]
    async fn mist_level_out_of_range() {
        let (humidifier, transport) = device::<HumidifierState>("Classic300S");
        let err = humidifier.set_mist_level(Some(10)).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::OutOfRange { min: 1, max: 9, actual: 10, .. })
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn superior_uses_model_mode_spelling() {
        let (humidifier, transport) = device::<HumidifierState>("LEH-S601S-WUS");
        humidifier.set_mode(HumidifierMode::Auto).await.unwrap();
        assert_eq!(last_method(&transport), "setHumidityMode");
        assert_eq!(last_data(&transport), json!({"workMode": "autoPro"}));

        humidifier.toggle_drying_mode(Some(true)).await.unwrap();
        assert_eq!(last_data(&transport), json!({"autoDryingSwitch": 1}));
        assert_eq!(humidifier.details().drying_mode(), Supported::Value(true));
    }

    #[tokio::test]
    async fn oasis_1000s_mist_level_method() {
        let (humidifier, transport) = device::<HumidifierState>("LUH-M101S-WUS");
        humidifier.set_mist_level(Some(3)).await.unwrap();
        assert_eq!(last_method(&transport), "virtualLevel");
        assert_eq!(
            last_data(&transport),
            json!({"levelIdx": 0, "virtualLevel": 3, "levelType": "mist"})
        );
    }

    #[tokio::test]
    async fn warm_mist_gate_and_levels() {
        let (classic, transport) = device::<HumidifierState>("Classic300S");
        assert!(classic.set_warm_level(1).await.is_err());
        assert_eq!(transport.call_count(), 0);

        let (lv600, transport) = device::<HumidifierState>("LUH-A602S-WUS");
        lv600.set_warm_level(0).await.unwrap();
        assert_eq!(last_data(&transport), classic_level(0, "warm"));
        assert_eq!(lv600.details().warm_mist_enabled(), Supported::Value(false));
        assert!(lv600.set_warm_level(4).await.is_err());
    }

    #[tokio::test]
    async fn target_humidity_range() {
        let (humidifier, transport) = device::<HumidifierState>("Classic300S");
        assert!(humidifier.set_target_humidity(85).await.is_err());
        humidifier.set_target_humidity(60).await.unwrap();
        assert_eq!(last_data(&transport), json!({"target_humidity": 60}));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn classic_200s_display_uses_indicator_switch() {
        let (humidifier, transport) = device::<HumidifierState>("Classic200S");
        humidifier.toggle_display(Some(false)).await.unwrap();
        assert_eq!(last_method(&transport), "setIndicatorLightSwitch");
        assert_eq!(last_data(&transport), json!({"enabled": false, "id": 0}));
    }
}

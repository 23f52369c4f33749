// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tower fan commands.

use async_trait::async_trait;
use serde_json::json;

use super::traits::Toggleable;
use super::{Fan, declared, flip, switch_int};
use crate::capabilities::Feature;
use crate::error::{Result, ValidationError};
use crate::response::{FanResult, TowerFanStatus};
use crate::state::{DeviceState, FanState, Supported};
use crate::types::{DeviceStatus, FanMode};

impl Fan {
    /// Fetches the fan's status.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        self.refresh("getTowerFanStatus", json!({}), |result, common, family| {
            let FanResult::Tower(status) = result;
            apply_status(&status, common, family);
        })
        .await
    }

    /// Switches the fan; `None` inverts the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Offline` for offline devices, or the errors of the
    /// call.
    pub async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::OnOff)?;
        let on = self.target_power(on);
        self.command(
            "setSwitch",
            json!({"powerSwitch": switch_int(on), "switchIdx": 0}),
        )
        .await?;
        self.set_power(on);
        Ok(())
    }

    /// Sets the operating mode.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for modes the model does
    /// not offer, otherwise the errors of the call.
    pub async fn set_mode(&self, mode: FanMode) -> Result<()> {
        self.ensure_online()?;
        if !self.features().ranges.fan_modes.contains(&mode) {
            return Err(ValidationError::InvalidChoice {
                field: "mode",
                value: mode.to_string(),
            }
            .into());
        }
        self.command("setTowerFanMode", json!({"workMode": mode.as_str()}))
            .await?;
        self.update_state(|_, family| family.mode = Some(mode));
        Ok(())
    }

    /// Sets the fan level; `None` advances one level, wrapping to the
    /// lowest after the highest.
    ///
    /// Advancing needs the fan to run in normal mode, since other modes
    /// pick their own level.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NotControllable` when advancing outside
    /// normal mode, `ValidationError::OutOfRange` outside the model's
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
                        reason: format!("fan level cannot be advanced in {mode} mode"),
                    }
                    .into());
                }
                range.bump(self.read_family(|f| f.fan_set_level).unwrap_or(0))
            }
        };
        self.command(
            "setLevel",
            json!({"levelIdx": 0, "manualSpeedLevel": level, "levelType": "wind"}),
        )
        .await?;
        self.update_state(|_, family| {
            family.fan_level = Some(level);
            family.fan_set_level = Some(level);
        });
        Ok(())
    }

    // ========== Toggles ==========

    /// Switches oscillation; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_oscillation(&self, on: Option<bool>) -> Result<()> {
        self.switch_toggle(
            Feature::Oscillation,
            on,
            FanState::oscillation,
            "setOscillationSwitch",
            "oscillationSwitch",
            |family| &mut family.oscillation,
        )
        .await
    }

    /// Switches the key beeps off (`true`) or on; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_mute(&self, on: Option<bool>) -> Result<()> {
        self.switch_toggle(
            Feature::Sound,
            on,
            FanState::mute,
            "setMuteSwitch",
            "muteSwitch",
            |family| &mut family.mute,
        )
        .await
    }

    /// Switches the display; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_display(&self, on: Option<bool>) -> Result<()> {
        self.switch_toggle(
            Feature::Display,
            on,
            FanState::display,
            "setDisplay",
            "screenSwitch",
            |family| &mut family.display,
        )
        .await
    }

    /// Switches the display between temperature and fan level; `None`
    /// inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_displaying_type(&self, on: Option<bool>) -> Result<()> {
        self.switch_toggle(
            Feature::DisplayingType,
            on,
            FanState::displaying_type,
            "setDisplayingType",
            "displayingType",
            |family| &mut family.displaying_type,
        )
        .await
    }

    async fn switch_toggle(
        &self,
        feature: Feature,
        on: Option<bool>,
        current: fn(&FanState) -> Supported<bool>,
        method: &str,
        key: &str,
        field: fn(&mut FanState) -> &mut Supported<bool>,
    ) -> Result<()> {
        self.gate(feature)?;
        let on = flip(on, self.read_family(current));
        self.command(method, json!({ key: switch_int(on) })).await?;
        self.update_state(|_, family| {
            field(family).set(on);
        });
        Ok(())
    }
}

fn apply_status(status: &TowerFanStatus, common: &mut DeviceState, family: &mut FanState) {
    common.set_device_status(DeviceStatus::from_bool(status.power_switch));
    family.mode = FanMode::from_wire(&status.work_mode);
    family.fan_level = Some(status.fan_speed_level);
    family.fan_set_level = Some(status.manual_speed_level);
    family.temperature = status.temperature;
    family.timer_remain = Some(status.timer_remain);
    family.display.set(status.screen_switch);
    family.oscillation.set(status.oscillation_switch);
    family.mute.set(status.mute_switch);
    family.displaying_type.set_opt(status.displaying_type);
}

#[async_trait]
impl Toggleable for Fan {
    async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        Fan::toggle_switch(self, on).await
    }

    fn is_on(&self) -> bool {
        Fan::is_on(self)
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-wall switch and dimmer commands.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::traits::{Dimmable, Toggleable};
use super::{PERCENT, Switch, status_str};
use crate::capabilities::{Feature, ModelKind};
use crate::error::Result;
use crate::response::SwitchResult;
use crate::state::{DeviceState, Supported, SwitchState};
use crate::types::{ConnectionStatus, DeviceStatus, RgbColor};

impl Switch {
    /// Fetches the switch's details.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        self.refresh("deviceDetail", json!({}), apply_details).await
    }

    // ========== Power Control ==========

    /// Switches the load; `None` inverts the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Offline` for offline switches, or the errors of
    /// the call.
    pub async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::OnOff)?;
        let on = self.target_power(on);
        match self.features().model {
            ModelKind::DimmerSwitch => {
                self.command("dimmerPowerSwitchCtl", json!({"status": status_str(on)}))
                    .await?;
            }
            _ => {
                self.command(
                    "deviceStatus",
                    json!({"status": status_str(on), "switchNo": 0}),
                )
                .await?;
            }
        }
        self.set_power(on);
        Ok(())
    }

    // ========== Dimmer ==========

    /// Brightness 0-100.
    #[must_use]
    pub fn brightness(&self) -> Supported<u8> {
        self.read_family(SwitchState::brightness)
    }

    /// Sets brightness 0-100; the load is switched on.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` above 100, otherwise the
    /// errors of the call.
    pub async fn set_brightness(&self, brightness: u8) -> Result<()> {
        self.gate(Feature::Dimmable)?;
        let brightness = PERCENT.validate("brightness", brightness)?;
        self.command("dimmerBrightnessCtl", json!({"brightness": brightness}))
            .await?;
        self.update_state(|common, family| {
            family.brightness.set(brightness);
            common.set_device_status(DeviceStatus::On);
        });
        Ok(())
    }

    /// Switches the indicator light; `None` inverts it.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn toggle_indicator_light(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::IndicatorLight)?;
        let on = on.unwrap_or_else(|| {
            !self.read_family(|f| f.indicator_light.get().is_some_and(|s| s.is_on()))
        });
        self.command("dimmerIndicatorLightCtl", json!({"status": status_str(on)}))
            .await?;
        self.update_state(|_, family| {
            family.indicator_light.set(DeviceStatus::from_bool(on));
        });
        Ok(())
    }

    /// Switches the RGB backlight, optionally changing its color.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn set_backlight(&self, on: bool, color: Option<RgbColor>) -> Result<()> {
        self.gate(Feature::RgbBacklight)?;
        let rgb_value = color.map(|c| json!({"red": c.red(), "green": c.green(), "blue": c.blue()}));
        self.command(
            "dimmerRgbValueCtl",
            json!({"status": status_str(on), "rgbValue": rgb_value.unwrap_or(Value::Null)}),
        )
        .await?;
        self.update_state(|_, family| {
            family.backlight.set(DeviceStatus::from_bool(on));
            if let Some(color) = color {
                family.backlight_color.set(color);
            }
        });
        Ok(())
    }
}

fn apply_details(result: SwitchResult, common: &mut DeviceState, family: &mut SwitchState) {
    match result {
        SwitchResult::Dimmer(detail) => {
            common.set_device_status(DeviceStatus::from_wire(&detail.device_status));
            common.set_connection_status(ConnectionStatus::from_wire(&detail.connection_status));
            common.set_active_time(detail.active_time);
            family.brightness.set(detail.brightness);
            family
                .indicator_light
                .set(DeviceStatus::from_wire(&detail.indicator_light_status));
            family.backlight.set(DeviceStatus::from_wire(&detail.rgb_status));
            if let Some(rgb) = detail.rgb_value {
                family
                    .backlight_color
                    .set(RgbColor::new(rgb.red, rgb.green, rgb.blue));
            }
        }
        SwitchResult::Wall(detail) => {
            common.set_device_status(DeviceStatus::from_wire(&detail.device_status));
            common.set_connection_status(ConnectionStatus::from_wire(&detail.connection_status));
            common.set_active_time(detail.active_time);
        }
    }
}

#[async_trait]
impl Toggleable for Switch {
    async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        Switch::toggle_switch(self, on).await
    }

    fn is_on(&self) -> bool {
        Switch::is_on(self)
    }
}

#[async_trait]
impl Dimmable for Switch {
    fn brightness(&self) -> Supported<u8> {
        Switch::brightness(self)
    }

    async fn set_brightness(&self, brightness: u8) -> Result<()> {
        Switch::set_brightness(self, brightness).await
    }
}

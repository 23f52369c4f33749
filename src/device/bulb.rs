// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light bulb commands.
//!
//! Four models, four dialects:
//!
//! - ESL100 speaks per-operation V1 endpoints.
//! - ESL100CW wraps a `jsonCmd` object in the V1 `bypass` endpoint.
//! - ESL100MC sets everything through V2 `setLightStatus` with RGB
//!   channels.
//! - Valceno sets everything through V2 `setLightStatusV2` with scaled HSV
//!   values; its replies carry the resulting state, which wins over the
//!   request.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::traits::{ColorControllable, Dimmable, Toggleable};
use super::{Bulb, PERCENT, status_str};
use crate::capabilities::{Feature, ModelKind};
use crate::error::{Result, ValidationError};
use crate::response::{BulbResult, ValcenoStatus};
use crate::state::{BulbState, DeviceState, Supported};
use crate::types::{
    COLOR_TEMP_MAX_KELVIN, COLOR_TEMP_MIN_KELVIN, Color, ColorMode, ConnectionStatus,
    DeviceStatus, HsvColor, RgbColor, kelvin_to_percent,
};

const DEFAULT_LEVEL: u8 = 100;

impl Bulb {
    /// Fetches the bulb's details.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        let (method, data) = match self.features().model {
            ModelKind::Esl100Cw => ("bypass", json!({"jsonCmd": {"getLightStatus": "get"}})),
            ModelKind::Esl100Mc => ("getLightStatus", json!({})),
            ModelKind::Valceno => ("getLightStatusV2", json!({})),
            _ => ("deviceDetail", json!({})),
        };
        self.refresh(method, data, apply_details).await
    }

    // ========== Accessors ==========

    /// Brightness 0-100.
    #[must_use]
    pub fn brightness(&self) -> Supported<u8> {
        self.read_family(BulbState::brightness)
    }

    /// White color temperature 0-100.
    #[must_use]
    pub fn color_temp(&self) -> Supported<u8> {
        self.read_family(BulbState::color_temp)
    }

    /// White or color output.
    #[must_use]
    pub fn color_mode(&self) -> Supported<ColorMode> {
        self.read_family(BulbState::color_mode)
    }

    /// Current color.
    #[must_use]
    pub fn color(&self) -> Supported<Color> {
        self.read_family(BulbState::color)
    }

    // ========== Power Control ==========

    /// Switches the bulb; `None` inverts the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Offline` for offline bulbs, or the errors of the
    /// call.
    pub async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::OnOff)?;
        let on = self.target_power(on);
        let (method, data) = match self.features().model {
            ModelKind::Esl100Cw => (
                "bypass",
                json!({"jsonCmd": {"light": {"action": status_str(on)}}}),
            ),
            ModelKind::Esl100Mc | ModelKind::Valceno => {
                ("setSwitch", json!({"id": 0, "enabled": on}))
            }
            _ => ("smartBulbPowerSwitchCtl", json!({"status": status_str(on)})),
        };
        self.command(method, data).await?;
        self.set_power(on);
        Ok(())
    }

    // ========== White ==========

    /// Sets brightness 0-100; the bulb is switched on.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` above 100, otherwise the
    /// errors of the call.
    pub async fn set_brightness(&self, brightness: u8) -> Result<()> {
        self.gate(Feature::Dimmable)?;
        let brightness = PERCENT.validate("brightness", brightness)?;
        match self.features().model {
            ModelKind::Esl100Cw => self.set_cw_light(Some(brightness), None).await,
            ModelKind::Esl100Mc => self.set_mc_white(brightness).await,
            ModelKind::Valceno => {
                self.set_valceno(json!({"brightness": brightness}), |_, family| {
                    family.brightness.set(brightness);
                })
                .await
            }
            _ => {
                self.command(
                    "smartBulbBrightnessCtl",
                    json!({"brightNess": brightness.to_string(), "status": "on"}),
                )
                .await?;
                self.update_state(|common, family| {
                    family.brightness.set(brightness);
                    common.set_device_status(DeviceStatus::On);
                });
                Ok(())
            }
        }
    }

    /// Sets white color temperature 0 (warm) to 100 (cool).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` above 100, otherwise the
    /// errors of the call.
    pub async fn set_color_temp(&self, percent: u8) -> Result<()> {
        self.gate(Feature::ColorTemp)?;
        let percent = PERCENT.validate("color_temp", percent)?;
        match self.features().model {
            ModelKind::Valceno => {
                self.set_valceno(
                    json!({"colorTemp": percent, "colorMode": ColorMode::White.as_str()}),
                    |_, family| {
                        family.color_temp.set(percent);
                        family.color_mode.set(ColorMode::White);
                    },
                )
                .await
            }
            _ => self.set_cw_light(None, Some(percent)).await,
        }
    }

    /// Sets white color temperature in Kelvin (2700-6500).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` outside 2700-6500 K,
    /// otherwise the errors of [`set_color_temp`](Self::set_color_temp).
    pub async fn set_color_temp_kelvin(&self, kelvin: u16) -> Result<()> {
        if !(COLOR_TEMP_MIN_KELVIN..=COLOR_TEMP_MAX_KELVIN).contains(&kelvin) {
            return Err(ValidationError::OutOfRange {
                field: "color_temp_kelvin",
                min: i64::from(COLOR_TEMP_MIN_KELVIN),
                max: i64::from(COLOR_TEMP_MAX_KELVIN),
                actual: i64::from(kelvin),
            }
            .into());
        }
        self.set_color_temp(kelvin_to_percent(kelvin)).await
    }

    // ========== Color ==========

    /// Switches to color mode with an RGB color.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn set_rgb(&self, color: RgbColor) -> Result<()> {
        self.gate(Feature::Multicolor)?;
        match self.features().model {
            ModelKind::Valceno => self.set_valceno_hsv(color.to_hsv()).await,
            _ => self.set_mc_color(color).await,
        }
    }

    /// Switches to color mode with an HSV color.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn set_hsv(&self, color: HsvColor) -> Result<()> {
        self.gate(Feature::Multicolor)?;
        match self.features().model {
            ModelKind::Valceno => self.set_valceno_hsv(color).await,
            _ => self.set_mc_color(RgbColor::from_hsv(&color)).await,
        }
    }

    /// Switches to white mode, keeping brightness.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn enable_white_mode(&self) -> Result<()> {
        self.gate(Feature::Multicolor)?;
        match self.features().model {
            ModelKind::Valceno => {
                self.set_valceno(
                    json!({"colorMode": ColorMode::White.as_str()}),
                    |_, family| {
                        family.color_mode.set(ColorMode::White);
                    },
                )
                .await
            }
            _ => {
                let brightness = self.brightness().get().unwrap_or(DEFAULT_LEVEL);
                self.set_mc_white(brightness).await
            }
        }
    }

    // ========== Dialects ==========

    async fn set_cw_light(&self, brightness: Option<u8>, color_temp: Option<u8>) -> Result<()> {
        let (current_brightness, current_temp) =
            self.read_family(|f| (f.brightness.get(), f.color_temp.get()));
        let brightness = brightness.or(current_brightness).unwrap_or(DEFAULT_LEVEL);
        let color_temp = color_temp.or(current_temp).unwrap_or(DEFAULT_LEVEL);
        self.command(
            "bypass",
            json!({"jsonCmd": {"light": {
                "action": "on",
                "brightness": brightness,
                "colorTempe": color_temp,
            }}}),
        )
        .await?;
        self.update_state(|common, family| {
            family.brightness.set(brightness);
            family.color_temp.set(color_temp);
            common.set_device_status(DeviceStatus::On);
        });
        Ok(())
    }

    async fn set_mc_white(&self, brightness: u8) -> Result<()> {
        self.command("setLightStatus", mc_payload(brightness, None))
            .await?;
        self.update_state(|common, family| {
            family.brightness.set(brightness);
            family.color_mode.set(ColorMode::White);
            common.set_device_status(DeviceStatus::On);
        });
        Ok(())
    }

    async fn set_mc_color(&self, color: RgbColor) -> Result<()> {
        let brightness = self.brightness().get().unwrap_or(DEFAULT_LEVEL);
        self.command("setLightStatus", mc_payload(brightness, Some(color)))
            .await?;
        self.update_state(|common, family| {
            family.color.set(Color::from_rgb(color));
            family.color_mode.set(ColorMode::Color);
            common.set_device_status(DeviceStatus::On);
        });
        Ok(())
    }

    async fn set_valceno_hsv(&self, color: HsvColor) -> Result<()> {
        self.set_valceno(
            json!({
                "hue": color.device_hue(),
                "saturation": color.device_saturation(),
                "value": color.value(),
                "colorMode": ColorMode::Hsv.as_str(),
            }),
            |_, family| {
                family.color.set(Color::from_hsv(color));
                family.color_mode.set(ColorMode::Hsv);
            },
        )
        .await
    }

    /// Sends `setLightStatusV2`; a reply carrying status replaces
    /// `optimistic`.
    async fn set_valceno(
        &self,
        fields: Value,
        optimistic: impl FnOnce(&mut DeviceState, &mut BulbState) + Send,
    ) -> Result<()> {
        let reply = self
            .command_with_state::<BulbResult>("setLightStatusV2", valceno_payload(fields))
            .await?;
        self.update_state(|common, family| match reply {
            Some(BulbResult::Valceno(status)) => apply_valceno(&status, common, family),
            _ => {
                optimistic(common, family);
                common.set_device_status(DeviceStatus::On);
            }
        });
        Ok(())
    }
}

fn mc_payload(brightness: u8, color: Option<RgbColor>) -> Value {
    let rgb = color.unwrap_or(RgbColor::new(0, 0, 0));
    let mode = if color.is_some() {
        ColorMode::Color
    } else {
        ColorMode::White
    };
    json!({
        "action": "on",
        "speed": 0,
        "brightness": brightness,
        "red": rgb.red(),
        "green": rgb.green(),
        "blue": rgb.blue(),
        "colorMode": mode.as_str(),
    })
}

fn valceno_payload(fields: Value) -> Value {
    let mut payload = json!({
        "force": 1,
        "brightness": "",
        "colorTemp": "",
        "colorMode": "",
        "hue": "",
        "saturation": "",
        "value": "",
    });
    if let (Value::Object(base), Value::Object(fields)) = (&mut payload, fields) {
        base.extend(fields);
    }
    payload
}

fn apply_valceno(status: &ValcenoStatus, common: &mut DeviceState, family: &mut BulbState) {
    common.set_device_status(DeviceStatus::from_bool(status.enabled));
    family.brightness.set(status.brightness);
    family.color_temp.set(status.color_temp);
    if let Some(mode) = ColorMode::from_wire(&status.color_mode) {
        family.color_mode.set(mode);
    }
    let hue = u32::try_from(status.hue).unwrap_or_default();
    let saturation = u32::try_from(status.saturation).unwrap_or_default();
    family.color.set(Color::from_hsv(HsvColor::from_device(
        hue,
        saturation,
        status.value,
    )));
}

fn apply_details(result: BulbResult, common: &mut DeviceState, family: &mut BulbState) {
    match result {
        BulbResult::Esl100(detail) => {
            common.set_device_status(DeviceStatus::from_wire(&detail.device_status));
            common.set_connection_status(ConnectionStatus::from_wire(&detail.connection_status));
            common.set_active_time(detail.active_time);
            if let Some(brightness) = detail.brightness {
                family.brightness.set(brightness);
            }
        }
        BulbResult::Cw(cw) => {
            common.set_device_status(DeviceStatus::from_wire(&cw.light.action));
            if let Some(brightness) = cw.light.brightness {
                family.brightness.set(brightness);
            }
            family.color_temp.set(cw.light.color_tempe);
        }
        BulbResult::Mc(mc) => {
            common.set_device_status(DeviceStatus::from_wire(&mc.action));
            family.brightness.set(mc.brightness);
            let mode = ColorMode::from_wire(&mc.color_mode);
            if let Some(mode) = mode {
                family.color_mode.set(mode);
            }
            if mode.is_some_and(|m| m.is_color()) {
                family
                    .color
                    .set(Color::from_rgb(RgbColor::new(mc.red, mc.green, mc.blue)));
            }
        }
        BulbResult::Valceno(status) => apply_valceno(&status, common, family),
    }
}

#[async_trait]
impl Toggleable for Bulb {
    async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        Bulb::toggle_switch(self, on).await
    }

    fn is_on(&self) -> bool {
        Bulb::is_on(self)
    }
}

#[async_trait]
impl Dimmable for Bulb {
    fn brightness(&self) -> Supported<u8> {
        Bulb::brightness(self)
    }

    async fn set_brightness(&self, brightness: u8) -> Result<()> {
        Bulb::set_brightness(self, brightness).await
    }
}

#[async_trait]
impl ColorControllable for Bulb {
    fn color(&self) -> Supported<Color> {
        Bulb::color(self)
    }

    async fn set_rgb(&self, color: RgbColor) -> Result<()> {
        Bulb::set_rgb(self, color).await
    }

    async fn set_hsv(&self, color: HsvColor) -> Result<()> {
        Bulb::set_hsv(self, color).await
    }

    async fn enable_white_mode(&self) -> Result<()> {
        Bulb::enable_white_mode(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{device, last_data, last_method, v1, v2};
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn esl100_brightness_is_sent_as_string() {
        let (bulb, transport) = device::<BulbState>("ESL100");
        bulb.set_brightness(30).await.unwrap();
        let call = &transport.calls()[0];
        assert_eq!(call.path, "/cloud/v1/deviceManaged/smartBulbBrightnessCtl");
        assert_eq!(call.body["brightNess"], "30");
        assert_eq!(bulb.brightness(), Supported::Value(30));
        assert!(bulb.is_on());
    }

    #[tokio::test]
    async fn esl100_has_no_color_temp() {
        let (bulb, transport) = device::<BulbState>("ESL100");
        let err = bulb.set_color_temp(50).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::UnsupportedFeature {
                feature: Feature::ColorTemp
            })
        ));
        assert_eq!(bulb.color_temp(), Supported::NotSupported);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn cw_keeps_current_values_for_unset_fields() {
        let (bulb, transport) = device::<BulbState>("ESL100CW");
        transport.push_json(v1(json!({
            "light": {"action": "on", "brightness": 40, "colorTempe": 70}
        })));
        bulb.update().await.unwrap();

        bulb.set_color_temp_kelvin(2700).await.unwrap();
        let body = transport.last_body().unwrap();
        assert_eq!(transport.calls()[1].path, "/cloud/v1/deviceManaged/bypass");
        assert_eq!(
            body["jsonCmd"]["light"],
            json!({"action": "on", "brightness": 40, "colorTempe": 0})
        );
        assert_eq!(bulb.color_temp(), Supported::Value(0));
    }

    #[tokio::test]
    async fn kelvin_outside_range_is_rejected() {
        let (bulb, transport) = device::<BulbState>("ESL100CW");
        assert!(bulb.set_color_temp_kelvin(2000).await.is_err());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn mc_rgb_sets_color_mode() {
        let (bulb, transport) = device::<BulbState>("ESL100MC");
        bulb.set_rgb(RgbColor::new(255, 0, 0)).await.unwrap();
        assert_eq!(last_method(&transport), "setLightStatus");
        let data = last_data(&transport);
        assert_eq!(data["colorMode"], "color");
        assert_eq!(data["red"], 255);
        assert_eq!(data["brightness"], 100);
        assert_eq!(bulb.color_mode(), Supported::Value(ColorMode::Color));
        assert_eq!(bulb.color().get().unwrap().rgb(), RgbColor::new(255, 0, 0));

        bulb.enable_white_mode().await.unwrap();
        assert_eq!(last_data(&transport)["colorMode"], "white");
        assert_eq!(bulb.color_mode(), Supported::Value(ColorMode::White));
    }

    #[tokio::test]
    async fn valceno_reply_wins_over_request() {
        let (bulb, transport) = device::<BulbState>("XYD0001");
        transport.push_json(v2(json!({
            "enabled": true,
            "colorMode": "white",
            "colorTemp": 20,
            "brightness": 55,
            "hue": 0,
            "saturation": 0,
            "value": 0,
        })));
        bulb.set_brightness(90).await.unwrap();

        let data = last_data(&transport);
        assert_eq!(last_method(&transport), "setLightStatusV2");
        assert_eq!(data["brightness"], 90);
        assert_eq!(data["force"], 1);
        assert_eq!(data["hue"], "");
        assert_eq!(bulb.brightness(), Supported::Value(55));
        assert_eq!(bulb.color_temp(), Supported::Value(20));
    }

    #[tokio::test]
    async fn valceno_bare_ack_applies_request() {
        let (bulb, transport) = device::<BulbState>("XYD0001");
        let hsv = HsvColor::new(180, 50, 80).unwrap();
        bulb.set_hsv(hsv).await.unwrap();

        let data = last_data(&transport);
        assert_eq!(data["hue"], hsv.device_hue());
        assert_eq!(data["saturation"], 5000);
        assert_eq!(data["colorMode"], "hsv");
        assert_eq!(bulb.color().get().unwrap().hsv(), hsv);
        assert_eq!(bulb.color_mode(), Supported::Value(ColorMode::Hsv));
    }

    #[tokio::test]
    async fn valceno_unreadable_echo_applies_request() {
        let (bulb, transport) = device::<BulbState>("XYD0001");
        transport.push_json(v2(json!({"brightnessLevel": 40, "firmware": "1.0.2"})));
        bulb.set_brightness(40).await.unwrap();

        assert_eq!(last_method(&transport), "setLightStatusV2");
        assert_eq!(bulb.brightness(), Supported::Value(40));
        assert!(bulb.is_on());
    }

    #[tokio::test]
    async fn failed_command_leaves_state() {
        let (bulb, transport) = device::<BulbState>("ESL100MC");
        transport.push_json(json!({
            "code": 0, "msg": "",
            "result": {"code": -1, "msg": "failed"}
        }));
        assert!(bulb.set_rgb(RgbColor::new(1, 2, 3)).await.is_err());
        assert_eq!(bulb.color(), Supported::Unknown);
        assert!(!bulb.is_on());
    }
}

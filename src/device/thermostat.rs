// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Smart thermostat commands.
//!
//! Setpoint changes go through `setHoldStatus`, which holds the new value
//! until the schedule takes over again or the hold is cancelled.

use serde_json::json;

use super::Thermostat;
use crate::error::{Result, ValidationError};
use crate::response::{ThermostatResult, ThermostatStatus};
use crate::state::{DeviceState, ThermostatState};
use crate::types::{
    DeviceStatus, EcoType, HoldOption, ThermostatFanMode, ThermostatWorkMode, WorkStatus,
};

/// `holdStatus` value that applies a hold.
const HOLD_SET: u8 = 1;
/// `holdStatus` value that cancels a hold.
const HOLD_CANCEL: u8 = 0;
/// Highest lock PIN.
const MAX_PIN: u16 = 9999;

impl Thermostat {
    /// Fetches the thermostat's status.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        self.refresh("getTsStatus", json!({}), |result, common, family| {
            let ThermostatResult::Aura(status) = result;
            apply_status(&status, common, family);
        })
        .await
    }

    // ========== Modes ==========

    /// Sets the work mode.
    ///
    /// Once the thermostat has reported the modes its installation
    /// supports, only those are accepted.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for unsupported modes,
    /// otherwise the errors of the call.
    pub async fn set_mode(&self, mode: ThermostatWorkMode) -> Result<()> {
        self.ensure_online()?;
        let reported = self.read_family(|f| f.supported_modes.clone());
        let allowed = if reported.is_empty() {
            self.features().ranges.thermostat_modes.contains(&mode)
        } else {
            reported.contains(&mode)
        };
        if !allowed {
            return Err(invalid("mode", mode));
        }
        self.command("setTsMode", json!({"tsMode": mode.code()}))
            .await?;
        self.update_state(|_, family| family.work_mode = Some(mode));
        Ok(())
    }

    /// Sets the fan mode.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for unsupported modes,
    /// otherwise the errors of the call.
    pub async fn set_fan_mode(&self, mode: ThermostatFanMode) -> Result<()> {
        self.ensure_online()?;
        if !self.features().ranges.thermostat_fan_modes.contains(&mode) {
            return Err(invalid("fan_mode", mode));
        }
        self.command("setFanMode", json!({"fanMode": mode.code()}))
            .await?;
        self.update_state(|_, family| family.fan_mode = Some(mode));
        Ok(())
    }

    /// Sets the comfort/savings trade-off.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for unsupported types,
    /// otherwise the errors of the call.
    pub async fn set_eco_type(&self, eco_type: EcoType) -> Result<()> {
        self.ensure_online()?;
        if !self.features().ranges.eco_types.contains(&eco_type) {
            return Err(invalid("eco_type", eco_type));
        }
        self.command("setECOType", json!({"ecoType": eco_type.code()}))
            .await?;
        self.update_state(|_, family| family.eco_type = Some(eco_type));
        Ok(())
    }

    // ========== Setpoints ==========

    /// Holds a single temperature setpoint.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for non-finite values,
    /// otherwise the errors of the call.
    pub async fn set_temp_point(&self, temperature: f64) -> Result<()> {
        self.hold("setTempPoint", temperature).await
    }

    /// Holds the heating setpoint.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for non-finite values,
    /// otherwise the errors of the call.
    pub async fn set_heat_to_temp(&self, temperature: f64) -> Result<()> {
        self.hold("heatToTemp", temperature).await?;
        self.update_state(|_, family| family.heat_to_temp = Some(temperature));
        Ok(())
    }

    /// Holds the cooling setpoint.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidChoice` for non-finite values,
    /// otherwise the errors of the call.
    pub async fn set_cool_to_temp(&self, temperature: f64) -> Result<()> {
        self.hold("coolToTemp", temperature).await?;
        self.update_state(|_, family| family.cool_to_temp = Some(temperature));
        Ok(())
    }

    /// Cancels a running hold and returns to the schedule.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    pub async fn cancel_hold(&self) -> Result<()> {
        self.ensure_online()?;
        self.command("setHoldStatus", json!({"holdStatus": HOLD_CANCEL}))
            .await?;
        self.update_state(|_, family| family.hold_end_time = None);
        Ok(())
    }

    async fn hold(&self, key: &str, temperature: f64) -> Result<()> {
        self.ensure_online()?;
        if !temperature.is_finite() {
            return Err(invalid(key_field(key), temperature));
        }
        self.command(
            "setHoldStatus",
            json!({ key: temperature, "holdStatus": HOLD_SET }),
        )
        .await?;
        Ok(())
    }

    // ========== Lock ==========

    /// Locks or unlocks the keypad. Locking needs a PIN of 0-9999.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingValue` when locking without a
    /// PIN, `ValidationError::OutOfRange` for PINs above 9999, otherwise
    /// the errors of the call.
    pub async fn toggle_lock(&self, on: bool, pin: Option<u16>) -> Result<()> {
        self.ensure_online()?;
        let data = if on {
            let pin = pin.ok_or(ValidationError::MissingValue { field: "pin" })?;
            if pin > MAX_PIN {
                return Err(ValidationError::OutOfRange {
                    field: "pin",
                    min: 0,
                    max: i64::from(MAX_PIN),
                    actual: i64::from(pin),
                }
                .into());
            }
            json!({"lockStatus": true, "lockPinCode": format!("{pin:04}")})
        } else {
            json!({"lockStatus": false})
        };
        self.command("setLockStatus", data).await?;
        self.update_state(|_, family| family.lock = Some(on));
        Ok(())
    }
}

fn invalid(field: &'static str, value: impl ToString) -> crate::error::Error {
    ValidationError::InvalidChoice {
        field,
        value: value.to_string(),
    }
    .into()
}

fn key_field(key: &str) -> &'static str {
    match key {
        "heatToTemp" => "heat_to_temp",
        "coolToTemp" => "cool_to_temp",
        _ => "temperature",
    }
}

fn apply_status(status: &ThermostatStatus, common: &mut DeviceState, family: &mut ThermostatState) {
    let work_mode = ThermostatWorkMode::from_code(status.work_mode);
    common.set_device_status(DeviceStatus::from_bool(
        work_mode.is_some_and(|mode| mode != ThermostatWorkMode::Off),
    ));
    family.work_mode = work_mode;
    family.work_status = WorkStatus::from_code(status.work_status);
    family.fan_mode = ThermostatFanMode::from_code(status.fan_mode);
    family.fan_running = Some(status.fan_status);
    family.temperature = Some(status.temperature);
    family.humidity = Some(status.humidity);
    family.heat_to_temp = Some(status.heat_to_temp);
    family.cool_to_temp = Some(status.cool_to_temp);
    family.deadband = Some(status.deadband);
    family.lock = Some(status.lock_status);
    family.hold_option = HoldOption::from_code(status.hold_option);
    family.hold_end_time = (status.hold_end_time > 0).then_some(status.hold_end_time);
    family.eco_type = EcoType::from_code(status.eco_type);
    family.routine_running_id = status.routine_running_id;
    family.temp_unit = Some(status.temp_unit.clone()).filter(|unit| !unit.is_empty());
    family.supported_modes = status
        .support_mode
        .iter()
        .filter_map(|code| ThermostatWorkMode::from_code(*code))
        .collect();
    family.routines.clone_from(&status.routines);
}

#[cfg(test)]
mod tests {
    use super::super::testing::{device, last_data, last_method, v2};
    use super::*;
    use crate::error::Error;
    use crate::state::StatePhase;

    const AURA: &str = "LTM-A401S-WUS";

    fn status() -> serde_json::Value {
        v2(json!({
            "supportMode": [0, 1, 2], "workMode": 1, "workStatus": 1, "fanMode": 1,
            "fanStatus": 1, "tempUnit": "f", "temperature": 68.5, "humidity": 40,
            "heatToTemp": 70, "coolToTemp": 76, "lockStatus": false,
            "scheduleOrHold": 0, "holdEndTime": 0, "holdOption": 2, "deadband": 3,
            "ecoType": 3, "alertStatus": 0,
            "routines": [{"name": "Home", "routineId": 2}]
        }))
    }

    #[tokio::test]
    async fn status_fills_state() {
        let (thermostat, transport) = device::<ThermostatState>(AURA);
        transport.push_json(status());
        thermostat.update().await.unwrap();

        assert_eq!(thermostat.state().phase(), StatePhase::Known);
        assert!(thermostat.is_on());
        let details = thermostat.details();
        assert_eq!(details.work_mode(), Some(ThermostatWorkMode::Heat));
        assert_eq!(details.work_status(), Some(WorkStatus::Heating));
        assert_eq!(details.hold_option(), Some(HoldOption::UntilNextScheduledItem));
        assert_eq!(details.hold_end_time(), None);
        assert_eq!(details.eco_type(), Some(EcoType::Balance));
        assert_eq!(details.temp_unit(), Some("f"));
        assert_eq!(details.supported_modes().len(), 3);
        assert_eq!(details.routines()[0].name, "Home");
    }

    #[tokio::test]
    async fn reported_modes_restrict_set_mode() {
        let (thermostat, transport) = device::<ThermostatState>(AURA);
        thermostat.set_mode(ThermostatWorkMode::Auto).await.unwrap();
        assert_eq!(last_method(&transport), "setTsMode");
        assert_eq!(last_data(&transport), json!({"tsMode": 3}));

        transport.push_json(status());
        thermostat.update().await.unwrap();
        let err = thermostat
            .set_mode(ThermostatWorkMode::EmHeat)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidChoice { field: "mode", .. })
        ));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn setpoints_use_hold_status() {
        let (thermostat, transport) = device::<ThermostatState>(AURA);
        thermostat.set_heat_to_temp(71.0).await.unwrap();
        assert_eq!(last_method(&transport), "setHoldStatus");
        assert_eq!(
            last_data(&transport),
            json!({"heatToTemp": 71.0, "holdStatus": 1})
        );
        assert_eq!(thermostat.details().heat_to_temp(), Some(71.0));

        thermostat.cancel_hold().await.unwrap();
        assert_eq!(last_data(&transport), json!({"holdStatus": 0}));

        assert!(thermostat.set_temp_point(f64::NAN).await.is_err());
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn lock_requires_pin() {
        let (thermostat, transport) = device::<ThermostatState>(AURA);
        let err = thermostat.toggle_lock(true, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingValue { field: "pin" })
        ));
        assert!(thermostat.toggle_lock(true, Some(10_000)).await.is_err());
        assert_eq!(transport.call_count(), 0);

        thermostat.toggle_lock(true, Some(42)).await.unwrap();
        assert_eq!(
            last_data(&transport),
            json!({"lockStatus": true, "lockPinCode": "0042"})
        );
        assert_eq!(thermostat.details().lock(), Some(true));

        thermostat.toggle_lock(false, None).await.unwrap();
        assert_eq!(last_data(&transport), json!({"lockStatus": false}));
    }

    #[tokio::test]
    async fn fan_and_eco_modes_send_codes() {
        let (thermostat, transport) = device::<ThermostatState>(AURA);
        thermostat
            .set_fan_mode(ThermostatFanMode::Circulate)
            .await
            .unwrap();
        assert_eq!(last_data(&transport), json!({"fanMode": 3}));
        thermostat.set_eco_type(EcoType::EcoFirst).await.unwrap();
        assert_eq!(last_method(&transport), "setECOType");
        assert_eq!(last_data(&transport), json!({"ecoType": 4}));
    }
}

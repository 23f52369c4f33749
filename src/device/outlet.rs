// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Smart plug commands.

use async_trait::async_trait;
use serde_json::json;

use super::traits::{EnergyMonitoring, Toggleable};
use super::{Outlet, status_str, switch_int};
use crate::capabilities::{BypassVersion, Feature, ModelKind};
use crate::error::{Result, ValidationError};
use crate::protocol::HttpMethod;
use crate::response::{
    EnergyHistory, LegacyOutletDetail, OutletResult, check_envelope, decode_payload,
};
use crate::state::{DeviceState, EnergyPeriod, EnergyReading, OutletState, Supported};
use crate::types::{ConnectionStatus, DeviceStatus, NightlightMode};

const BSDGO1_PROPERTIES: [&str; 7] = [
    "powerSwitch_1",
    "realTimeVoltage",
    "realTimePower",
    "electricalEnergy",
    "protectionStatus",
    "voltageUpperThreshold",
    "currentUpperThreshold",
];

impl Outlet {
    // ========== Refresh ==========

    /// Fetches the outlet's details.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        if self.features().model == ModelKind::Outlet7A {
            return self.update_legacy().await;
        }
        let sub_device_no = self.sub_device_no();
        let (method, data) = match self.features().model {
            ModelKind::Esw10 => ("getSwitch", json!({"id": 0})),
            ModelKind::Bsdgo1 => ("getProperty", json!({"properties": BSDGO1_PROPERTIES})),
            _ => ("deviceDetail", json!({})),
        };
        self.refresh(method, data, |result, common, family| {
            apply_details(result, sub_device_no, common, family);
        })
        .await
    }

    async fn update_legacy(&self) -> Result<()> {
        let path = format!("/v1/device/{}/detail", self.info().cid);
        let result = self
            .legacy(HttpMethod::Get, &path, None)
            .await
            .and_then(decode_payload::<LegacyOutletDetail>);
        self.apply_refresh(result, |detail, common, family| {
            common.set_device_status(DeviceStatus::from_wire(&detail.device_status));
            common.set_active_time(detail.active_time);
            family.energy.set(EnergyReading {
                power: detail.power,
                voltage: detail.voltage,
                energy_today: detail.energy,
            });
        })
    }

    // ========== Power Control ==========

    /// Switches the outlet; `None` inverts the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Offline` for offline outlets, or the errors of
    /// the call.
    pub async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        self.gate(Feature::OnOff)?;
        let on = self.target_power(on);
        if self.features().model == ModelKind::Outlet7A {
            let path = format!(
                "/v1/wifi-switch-1.3/{}/status/{}",
                self.info().cid,
                status_str(on)
            );
            self.legacy(HttpMethod::Put, &path, None).await?;
            self.set_power(on);
            return Ok(());
        }
        let (method, data) = match self.features().model {
            ModelKind::Esw10 => ("setSwitch", json!({"id": 0, "enabled": on})),
            ModelKind::Bsdgo1 => ("setProperty", json!({"powerSwitch_1": switch_int(on)})),
            ModelKind::OutdoorPlug => (
                "deviceStatus",
                json!({"status": status_str(on), "switchNo": self.sub_device_no()}),
            ),
            _ => ("deviceStatus", json!({"status": status_str(on)})),
        };
        self.command(method, data).await?;
        self.set_power(on);
        Ok(())
    }

    // ========== Energy ==========

    /// Latest energy readings.
    #[must_use]
    pub fn energy(&self) -> Supported<EnergyReading> {
        self.read_family(OutletState::energy)
    }

    /// Fetches fresh energy readings.
    ///
    /// Readings travel with the outlet's details, so this is a gated
    /// [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnsupportedFeature` for outlets without
    /// metering, otherwise the errors of [`update`](Self::update).
    pub async fn refresh_energy(&self) -> Result<()> {
        self.require(Feature::EnergyMonitor)?;
        self.update().await
    }

    /// Last fetched energy history of `period`.
    #[must_use]
    pub fn energy_history(&self, period: EnergyPeriod) -> Supported<EnergyHistory> {
        self.read_family(|family| family.history(period))
    }

    /// Fetches and stores the energy history of `period`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnsupportedFeature` for outlets without
    /// history, otherwise the transport, API and decode errors of the
    /// call.
    pub async fn get_energy_history(&self, period: EnergyPeriod) -> Result<EnergyHistory> {
        self.require(Feature::EnergyHistory)?;
        let bytes = self
            .client
            .call_energy_history(&self.identity, period.method())
            .await?;
        let history: EnergyHistory = decode_payload(check_envelope(&bytes, BypassVersion::V1)?)?;
        tracing::debug!(
            device = %self.name(),
            method = period.method(),
            buckets = history.entries.len(),
            "Fetched energy history"
        );
        self.update_state(|_, family| {
            family.history_mut(period).set(history.clone());
        });
        Ok(history)
    }

    /// Fetches the last seven days of energy use.
    ///
    /// # Errors
    ///
    /// See [`get_energy_history`](Self::get_energy_history).
    pub async fn get_weekly_energy(&self) -> Result<EnergyHistory> {
        self.get_energy_history(EnergyPeriod::Week).await
    }

    /// Fetches the last thirty days of energy use.
    ///
    /// # Errors
    ///
    /// See [`get_energy_history`](Self::get_energy_history).
    pub async fn get_monthly_energy(&self) -> Result<EnergyHistory> {
        self.get_energy_history(EnergyPeriod::Month).await
    }

    /// Fetches the last twelve months of energy use.
    ///
    /// # Errors
    ///
    /// See [`get_energy_history`](Self::get_energy_history).
    pub async fn get_yearly_energy(&self) -> Result<EnergyHistory> {
        self.get_energy_history(EnergyPeriod::Year).await
    }

    /// Fetches every energy history period in turn.
    ///
    /// Stops at the first failure; periods fetched before it stay stored.
    ///
    /// # Errors
    ///
    /// See [`get_energy_history`](Self::get_energy_history).
    pub async fn update_energy(&self) -> Result<()> {
        for period in EnergyPeriod::ALL {
            self.get_energy_history(period).await?;
        }
        Ok(())
    }

    // ========== Nightlight ==========

    /// Sets the nightlight mode.
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
        self.command("outletNightLightCtl", json!({"mode": mode.as_str()}))
            .await?;
        self.update_state(|_, family| {
            family.nightlight_mode.set(mode);
            match mode {
                NightlightMode::On => {
                    family.nightlight_status.set(DeviceStatus::On);
                }
                NightlightMode::Off => {
                    family.nightlight_status.set(DeviceStatus::Off);
                }
                NightlightMode::Dim | NightlightMode::Auto => {}
            }
        });
        Ok(())
    }
}

fn apply_details(
    result: OutletResult,
    sub_device_no: Option<u8>,
    common: &mut DeviceState,
    family: &mut OutletState,
) {
    match result {
        OutletResult::Detail(detail) => {
            common.set_device_status(DeviceStatus::from_wire(&detail.device_status));
            common.set_connection_status(ConnectionStatus::from_wire(&detail.connection_status));
            common.set_active_time(detail.active_time);
            family.energy.set(EnergyReading {
                power: detail.power,
                voltage: detail.voltage,
                energy_today: detail.energy,
            });
            if let Some(status) = &detail.night_light_status {
                family.nightlight_status.set(DeviceStatus::from_wire(status));
            }
            let auto = detail
                .night_light_auto_mode
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case("on"));
            let mode = if auto {
                Some(NightlightMode::Auto)
            } else {
                detail
                    .night_light_status
                    .as_deref()
                    .and_then(NightlightMode::from_wire)
            };
            if let Some(mode) = mode {
                family.nightlight_mode.set(mode);
            }
        }
        OutletResult::Outdoor(detail) => {
            common.set_connection_status(ConnectionStatus::from_wire(&detail.connection_status));
            common.set_active_time(detail.active_time);
            let socket = detail
                .sub_devices
                .iter()
                .find(|s| Some(s.sub_device_no) == sub_device_no);
            let status = socket.map_or(detail.device_status.as_str(), |s| {
                s.sub_device_status.as_str()
            });
            common.set_device_status(DeviceStatus::from_wire(status));
            family.energy.set(EnergyReading {
                power: detail.power,
                voltage: detail.voltage,
                energy_today: detail.energy,
            });
        }
        OutletResult::Switch(switch) => {
            common.set_device_status(DeviceStatus::from_bool(switch.enabled));
        }
        OutletResult::Property(property) => {
            common.set_device_status(DeviceStatus::from_bool(property.power_switch_1));
            family.energy.set(EnergyReading {
                power: property.real_time_power.unwrap_or_default(),
                voltage: property.real_time_voltage.unwrap_or_default(),
                energy_today: property.electrical_energy,
            });
        }
    }
}

#[async_trait]
impl Toggleable for Outlet {
    async fn toggle_switch(&self, on: Option<bool>) -> Result<()> {
        Outlet::toggle_switch(self, on).await
    }

    fn is_on(&self) -> bool {
        Outlet::is_on(self)
    }
}

#[async_trait]
impl EnergyMonitoring for Outlet {
    fn energy(&self) -> Supported<EnergyReading> {
        Outlet::energy(self)
    }

    async fn refresh_energy(&self) -> Result<()> {
        Outlet::refresh_energy(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{device, last_data, last_method, v1, v2};
    use super::*;
    use crate::error::Error;
    use crate::state::StatePhase;

    #[tokio::test]
    async fn fifteen_amp_detail_fills_energy_and_nightlight() {
        let (outlet, transport) = device::<OutletState>("ESW15-USA");
        transport.push_json(v1(json!({
            "deviceStatus": "on",
            "connectionStatus": "online",
            "activeTime": 12,
            "power": "5.5",
            "voltage": 120.2,
            "energy": 0.3,
            "nightLightStatus": "on",
            "nightLightAutoMode": "off",
            "nightLightBrightness": 50,
        })));
        outlet.update().await.unwrap();

        let state = outlet.state();
        assert_eq!(state.phase(), StatePhase::Known);
        assert!(outlet.is_on());
        assert_eq!(state.active_time(), Some(12));
        let energy = outlet.energy().get().unwrap();
        assert!((energy.power - 5.5).abs() < f64::EPSILON);
        assert_eq!(energy.energy_today, Some(0.3));
        assert_eq!(outlet.details().nightlight_mode(), Supported::Value(NightlightMode::On));

        let call = &transport.calls()[0];
        assert_eq!(call.path, "/cloud/v1/deviceManaged/deviceDetail");
    }

    #[tokio::test]
    async fn esw10_toggle_uses_set_switch() {
        let (outlet, transport) = device::<OutletState>("ESW10-USA");
        outlet.toggle_switch(None).await.unwrap();
        assert_eq!(last_method(&transport), "setSwitch");
        assert_eq!(last_data(&transport), json!({"id": 0, "enabled": true}));
        assert!(outlet.is_on());
    }

    #[tokio::test]
    async fn outdoor_socket_reads_its_own_status() {
        let transport = std::sync::Arc::new(crate::protocol::recording::RecordingTransport::new());
        let mut descriptor = super::super::testing::descriptor("ESO15-TB", "outdoor", "online");
        descriptor.sub_device_no = Some(2);
        let outlet = Outlet::from_descriptor(
            &descriptor,
            crate::registry::lookup("ESO15-TB").unwrap(),
            super::super::testing::client(&transport),
        )
        .unwrap();

        transport.push_json(v1(json!({
            "deviceStatus": "on",
            "connectionStatus": "online",
            "activeTime": 1,
            "power": 1.0,
            "voltage": 120.0,
            "subDevices": [
                {"subDeviceNo": 1, "defaultName": "a", "subDeviceName": "a", "subDeviceStatus": "on"},
                {"subDeviceNo": 2, "defaultName": "b", "subDeviceName": "b", "subDeviceStatus": "off"},
            ],
        })));
        outlet.update().await.unwrap();
        assert!(!outlet.is_on());

        outlet.toggle_switch(Some(true)).await.unwrap();
        let body = transport.last_body().unwrap();
        assert_eq!(body["switchNo"], 2);
        assert_eq!(body["status"], "on");
    }

    #[tokio::test]
    async fn property_outlet_round_trip() {
        let (outlet, transport) = device::<OutletState>("BSDOG01");
        outlet.toggle_switch(Some(true)).await.unwrap();
        assert_eq!(last_data(&transport), json!({"powerSwitch_1": 1}));

        transport.push_json(v2(json!({
            "powerSwitch_1": 1,
            "realTimeVoltage": 119.5,
            "realTimePower": 3.0,
            "electricalEnergy": 1.25,
        })));
        outlet.refresh_energy().await.unwrap();
        assert!(outlet.is_on());
        assert_eq!(outlet.energy().get().unwrap().energy_today, Some(1.25));
    }

    #[tokio::test]
    async fn nightlight_rejects_mode_outside_model_range() {
        let (outlet, transport) = device::<OutletState>("ESW15-USA");
        let err = outlet
            .set_nightlight_mode(NightlightMode::Dim)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidChoice { .. })
        ));
        assert_eq!(transport.call_count(), 0);

        outlet.set_nightlight_mode(NightlightMode::Auto).await.unwrap();
        let body = transport.last_body().unwrap();
        assert_eq!(body["mode"], "auto");
        assert_eq!(
            outlet.details().nightlight_mode(),
            Supported::Value(NightlightMode::Auto)
        );
    }

    #[tokio::test]
    async fn energy_refresh_needs_metering() {
        let (outlet, transport) = device::<OutletState>("ESW10-USA");
        assert_eq!(outlet.energy(), Supported::NotSupported);
        assert!(outlet.refresh_energy().await.is_err());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn seven_amp_outlet_reads_legacy_detail() {
        let (outlet, transport) = device::<OutletState>("wifi-switch-1.3");
        transport.push_json(json!({
            "deviceStatus": "on",
            "activeTime": 3,
            "energy": 0.2,
            "power": "1000:1000",
            "voltage": 120.5,
        }));
        outlet.update().await.unwrap();

        let call = &transport.calls()[0];
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.path, "/v1/device/cid-1/detail");
        assert_eq!(call.body, serde_json::Value::Null);
        assert!(call.headers.contains(&("tk".to_string(), "token".to_string())));
        assert!(call.headers.contains(&("accountId".to_string(), "42".to_string())));

        assert!(outlet.is_on());
        assert_eq!(outlet.state().active_time(), Some(3));
        let energy = outlet.energy().get().unwrap();
        assert!((energy.power - 1.0).abs() < f64::EPSILON);
        assert_eq!(energy.energy_today, Some(0.2));
    }

    #[tokio::test]
    async fn seven_amp_error_reply_leaves_state() {
        let (outlet, transport) = device::<OutletState>("wifi-switch-1.3");
        transport.push_json(json!({"error": {"msg": "device not found"}}));
        assert!(matches!(outlet.update().await, Err(Error::Api(_))));
        assert_eq!(outlet.state().phase(), StatePhase::Unknown);
        assert_eq!(outlet.energy(), Supported::Unknown);
    }

    #[tokio::test]
    async fn seven_amp_toggle_puts_status() {
        let (outlet, transport) = device::<OutletState>("wifi-switch-1.3");
        outlet.toggle_switch(None).await.unwrap();
        let call = &transport.calls()[0];
        assert_eq!(call.method, HttpMethod::Put);
        assert_eq!(call.path, "/v1/wifi-switch-1.3/cid-1/status/on");
        assert!(outlet.is_on());

        outlet.toggle_switch(Some(false)).await.unwrap();
        assert_eq!(transport.calls()[1].path, "/v1/wifi-switch-1.3/cid-1/status/off");
        assert!(!outlet.is_on());
    }

    #[tokio::test]
    async fn seven_amp_timer_uses_rest_resource() {
        let (outlet, transport) = device::<OutletState>("wifi-switch-1.3");
        transport.push_json(json!({"timerID": "12"}));
        let timer = outlet.set_timer(600, None).await.unwrap();
        assert_eq!(timer.id(), 12);
        let call = &transport.calls()[0];
        assert_eq!(call.method, HttpMethod::Post);
        assert_eq!(call.path, "/v2/device/cid-1/timer");
        assert_eq!(call.body["counterTimer"], 600);
        assert_eq!(call.body["action"], "on");
        assert_eq!(call.body["timerStatus"], "start");

        outlet.clear_timer().await.unwrap();
        let call = &transport.calls()[1];
        assert_eq!(call.method, HttpMethod::Delete);
        assert_eq!(call.path, "/v2/device/cid-1/timer/12");
        assert!(outlet.timer().is_none());

        transport.push_json(json!([
            {"timerID": "13", "counterTimer": 60, "action": "off", "timerStatus": "off"}
        ]));
        let timer = outlet.get_timer().await.unwrap().unwrap();
        assert_eq!(transport.calls()[2].method, HttpMethod::Get);
        assert!(timer.is_paused());
        assert_eq!(timer.action(), crate::types::TimerAction::Off);
    }

    #[tokio::test]
    async fn energy_history_is_stored_per_period() {
        let (outlet, transport) = device::<OutletState>("ESW15-USA");
        transport.push_json(v1(json!({
            "energyConsumptionOfToday": 0.4,
            "costPerKWH": 0.15,
            "maxEnergy": 1.2,
            "totalEnergy": 3.5,
            "energyInfos": [
                {"timestamp": 1_700_000_000, "energy": 1.2, "money": 0.18},
                {"timestamp": 1_700_086_400, "energyKWH": 2.3},
            ],
        })));
        let history = outlet.get_weekly_energy().await.unwrap();
        assert_eq!(history.entries.len(), 2);
        assert!((history.total() - 3.5).abs() < f64::EPSILON);

        let call = &transport.calls()[0];
        assert_eq!(call.method, HttpMethod::Post);
        assert_eq!(call.path, "/cloud/v1/device/getLastWeekEnergy");
        assert_eq!(call.body["method"], "getLastWeekEnergy");
        assert_eq!(call.body["uuid"], "uuid-cid-1");

        assert_eq!(outlet.energy_history(EnergyPeriod::Week), Supported::Value(history));
        assert_eq!(outlet.energy_history(EnergyPeriod::Month), Supported::Unknown);
    }

    #[tokio::test]
    async fn update_energy_fetches_every_period() {
        let (outlet, transport) = device::<OutletState>("wifi-switch-1.3");
        for _ in EnergyPeriod::ALL {
            transport.push_json(v1(json!({"energyInfos": []})));
        }
        outlet.update_energy().await.unwrap();
        let paths: Vec<_> = transport.calls().into_iter().map(|c| c.path).collect();
        assert_eq!(
            paths,
            [
                "/cloud/v1/device/getLastWeekEnergy",
                "/cloud/v1/device/getLastMonthEnergy",
                "/cloud/v1/device/getLastYearEnergy",
            ]
        );
        for period in EnergyPeriod::ALL {
            assert!(outlet.energy_history(period).is_known());
        }
    }

    #[tokio::test]
    async fn energy_history_needs_the_feature() {
        for model in ["BSDOG01", "ESW10-USA"] {
            let (outlet, transport) = device::<OutletState>(model);
            let err = outlet.get_monthly_energy().await.unwrap_err();
            assert!(matches!(
                err,
                Error::Validation(ValidationError::UnsupportedFeature {
                    feature: Feature::EnergyHistory
                })
            ));
            assert_eq!(outlet.energy_history(EnergyPeriod::Month), Supported::NotSupported);
            assert_eq!(transport.call_count(), 0);
        }
    }
}

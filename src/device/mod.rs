// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device handles.
//!
//! Every device is a [`Device<S>`] where `S` is the state of its family
//! ([`OutletState`], [`PurifierState`], ...). Operations common to all
//! devices live on the generic type; each family adds its commands in an
//! inherent impl of its own module. Which wire calls a command issues is
//! decided by the model in the device's [`FeatureMap`], never per call.
//!
//! Every command follows the same sequence:
//!
//! 1. the feature gate: an operation whose [`Feature`] the model lacks
//!    fails with `ValidationError::UnsupportedFeature` and sends nothing
//! 2. the online gate: commands fail with `Error::Offline` unless the
//!    device is online (refreshes are exempt)
//! 3. value validation against the model's ranges
//! 4. the request, and decoding of the reply
//! 5. the state update, applied only after the reply decoded
//!
//! Capability traits ([`Toggleable`], [`Dimmable`], [`EnergyMonitoring`],
//! [`ColorControllable`], [`Schedulable`]) give uniform access across
//! families; the
//! [`VeSyncDevice`] enum hands them out only when the model carries the
//! matching feature.
//!
//! # Examples
//!
//! ```no_run
//! use vesync_lib::device::VeSyncDevice;
//!
//! # async fn example(device: &VeSyncDevice) -> vesync_lib::Result<()> {
//! if let Some(light) = device.as_dimmable() {
//!     light.set_brightness(40).await?;
//! }
//! if let Some(purifier) = device.as_purifier() {
//!     purifier.set_fan_speed(None).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod bulb;
pub mod compat;
mod fan;
mod humidifier;
mod outlet;
mod purifier;
mod switch;
mod thermostat;
mod timer;
mod traits;

pub use traits::{ColorControllable, Dimmable, EnergyMonitoring, Schedulable, Toggleable};

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::capabilities::{BypassVersion, DeviceFamily, Feature, FeatureMap};
use crate::error::{DecodeError, Error, Result, ValidationError};
use crate::event::DeviceKey;
use crate::protocol::{CloudClient, DeviceIdentity, HttpMethod};
use crate::response::shape::dispatch;
use crate::response::{DeviceDescriptor, FamilyResult, check_envelope, check_legacy, decode};
use crate::state::{
    BulbState, DeviceState, FanState, HumidifierState, OutletState, PurifierState, Supported,
    SwitchState, ThermostatState,
};
use crate::types::{DeviceStatus, LevelRange, Timer};

/// A smart plug.
pub type Outlet = Device<OutletState>;
/// An in-wall switch or dimmer.
pub type Switch = Device<SwitchState>;
/// A light bulb.
pub type Bulb = Device<BulbState>;
/// A humidifier.
pub type Humidifier = Device<HumidifierState>;
/// An air purifier.
pub type Purifier = Device<PurifierState>;
/// A fan.
pub type Fan = Device<FanState>;
/// A thermostat.
pub type Thermostat = Device<ThermostatState>;

// ============================================================================
// Family state
// ============================================================================

/// State type of one device family.
pub trait FamilyState: Clone + fmt::Debug + Send + Sync + 'static {
    /// Family the state belongs to.
    const FAMILY: DeviceFamily;

    /// Builds empty state gated by the model's features.
    fn gated(map: &FeatureMap) -> Self;
}

macro_rules! family_state {
    ($($state:ty => $family:ident),+ $(,)?) => {
        $(
            impl FamilyState for $state {
                const FAMILY: DeviceFamily = DeviceFamily::$family;

                fn gated(map: &FeatureMap) -> Self {
                    Self::new(map)
                }
            }
        )+
    };
}

family_state! {
    OutletState => Outlet,
    SwitchState => Switch,
    BulbState => Bulb,
    HumidifierState => Humidifier,
    PurifierState => Purifier,
    FanState => Fan,
    ThermostatState => Thermostat,
}

// ============================================================================
// DeviceInfo
// ============================================================================

/// Identity fields copied from the device list entry.
///
/// Read-only for the lifetime of the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Display name.
    pub name: String,
    /// Device type reported by the cloud.
    pub device_type: String,
    /// Cloud identifier; falls back to `uuid` or `macID` when absent.
    pub cid: String,
    /// Device UUID.
    pub uuid: Option<String>,
    /// MAC address.
    pub mac_id: Option<String>,
    /// Opaque routing module.
    pub config_module: String,
    /// Server region of the device.
    pub region: Option<String>,
    /// Socket number of multi-socket plugs.
    pub sub_device_no: Option<u8>,
    /// Firmware version.
    pub firmware: Option<String>,
    /// Product category (`wifi-air`, `wifi-switch`, ...).
    pub product_type: Option<String>,
    /// Connection type.
    pub connection_type: Option<String>,
}

impl DeviceInfo {
    /// Copies identity fields from a device list entry.
    ///
    /// Returns `None` if the entry has no usable identifier.
    #[must_use]
    pub fn from_descriptor(descriptor: &DeviceDescriptor) -> Option<Self> {
        let cid = descriptor.identity()?.to_string();
        Some(Self {
            name: descriptor.device_name.clone(),
            device_type: descriptor.device_type.clone().unwrap_or_default(),
            cid,
            uuid: descriptor.uuid.clone(),
            mac_id: descriptor.mac_id.clone(),
            config_module: descriptor.config_module.clone(),
            region: descriptor.device_region.clone(),
            sub_device_no: descriptor.sub_device_no,
            firmware: descriptor.current_firm_version.clone(),
            product_type: descriptor.product_type.clone(),
            connection_type: descriptor.connection_type.clone(),
        })
    }

    /// Returns the fleet key.
    #[must_use]
    pub fn key(&self) -> DeviceKey {
        DeviceKey::new(self.cid.clone(), self.sub_device_no)
    }
}

// ============================================================================
// Device
// ============================================================================

/// A device of one family.
///
/// Holds the identity fields of its device list entry, its model's
/// feature map and its state. State is only ever written by the device's
/// own methods.
pub struct Device<S> {
    info: DeviceInfo,
    identity: DeviceIdentity,
    features: &'static FeatureMap,
    client: Arc<CloudClient>,
    state: RwLock<DeviceState>,
    family: RwLock<S>,
}

impl<S: FamilyState> Device<S> {
    /// Builds a device from a device list entry.
    ///
    /// Returns `None` if the entry has no usable identifier.
    pub(crate) fn from_descriptor(
        descriptor: &DeviceDescriptor,
        features: &'static FeatureMap,
        client: Arc<CloudClient>,
    ) -> Option<Self> {
        let info = DeviceInfo::from_descriptor(descriptor)?;
        let identity = DeviceIdentity {
            cid: info.cid.clone(),
            config_module: info.config_module.clone(),
            device_region: info.region.clone(),
            uuid: info.uuid.clone(),
        };
        let state = DeviceState::from_descriptor(
            &descriptor.device_status,
            &descriptor.connection_status,
        );
        Some(Self {
            info,
            identity,
            features,
            client,
            state: RwLock::new(state),
            family: RwLock::new(S::gated(features)),
        })
    }

    // ========== Accessors ==========

    /// Returns the identity fields.
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.info.name
    }

    /// Returns the fleet key.
    #[must_use]
    pub fn key(&self) -> DeviceKey {
        self.info.key()
    }

    /// Returns the model's feature map.
    #[must_use]
    pub fn features(&self) -> &'static FeatureMap {
        self.features
    }

    /// Returns the device family.
    #[must_use]
    pub fn family(&self) -> DeviceFamily {
        S::FAMILY
    }

    /// Returns `true` if the model has `feature`.
    #[must_use]
    pub fn supports(&self, feature: Feature) -> bool {
        self.features.supports(feature)
    }

    /// Returns a snapshot of the common state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    /// Returns a snapshot of the family state.
    #[must_use]
    pub fn details(&self) -> S {
        self.family.read().clone()
    }

    /// Returns `true` if the device is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.state.read().is_on()
    }

    /// Returns `true` if the device is online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.state.read().is_online()
    }

    /// Last known countdown timer.
    #[must_use]
    pub fn timer(&self) -> Option<Timer> {
        self.state.read().timer().cloned()
    }

    // ========== Gates ==========

    pub(crate) fn require(&self, feature: Feature) -> Result<()> {
        if self.features.supports(feature) {
            return Ok(());
        }
        tracing::warn!(
            device = %self.info.name,
            device_type = %self.info.device_type,
            feature = %feature,
            "Operation not supported by device"
        );
        Err(ValidationError::UnsupportedFeature { feature }.into())
    }

    pub(crate) fn ensure_online(&self) -> Result<()> {
        if self.is_online() {
            Ok(())
        } else {
            Err(Error::Offline {
                name: self.info.name.clone(),
            })
        }
    }

    /// Runs both gates for a command needing `feature`.
    pub(crate) fn gate(&self, feature: Feature) -> Result<()> {
        self.require(feature)?;
        self.ensure_online()
    }

    // ========== Calls ==========

    async fn call(&self, method: &str, data: Value) -> Result<Vec<u8>> {
        self.client
            .call_device(self.features.bypass_version(), &self.identity, method, data)
            .await
    }

    /// Sends a call and decodes the reply into the family's result union.
    pub(crate) async fn fetch<R: FamilyResult + Send>(&self, method: &str, data: Value) -> Result<R> {
        let bytes = self.call(method, data).await?;
        decode(&bytes, self.features.bypass_version())
    }

    /// Sends a command and checks the acknowledgement.
    pub(crate) async fn command(&self, method: &str, data: Value) -> Result<Value> {
        let bytes = self.call(method, data).await?;
        let ack = check_envelope(&bytes, self.features.bypass_version())?;
        tracing::debug!(device = %self.info.name, method, "Command acknowledged");
        Ok(ack)
    }

    /// Sends a bypass V1 command to an endpoint named apart from its
    /// method.
    pub(crate) async fn command_at(
        &self,
        endpoint: &str,
        method: &str,
        data: Value,
    ) -> Result<Value> {
        let bytes = self
            .client
            .call_device_at(&self.identity, endpoint, method, data)
            .await?;
        let ack = check_envelope(&bytes, BypassVersion::V1)?;
        tracing::debug!(device = %self.info.name, method, "Command acknowledged");
        Ok(ack)
    }

    /// Sends a legacy REST call and returns the checked reply.
    pub(crate) async fn legacy(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        let bytes = self.client.call_legacy(method, path, body).await?;
        let reply = check_legacy(&bytes)?;
        tracing::debug!(device = %self.info.name, %method, path, "Legacy call answered");
        Ok(reply)
    }

    /// Sends a command whose reply may carry the resulting state.
    ///
    /// Returns `None` for a bare acknowledgement.
    pub(crate) async fn command_with_state<R: FamilyResult + Send>(
        &self,
        method: &str,
        data: Value,
    ) -> Result<Option<R>> {
        let ack = self.command(method, data).await?;
        if ack.as_object().is_some_and(serde_json::Map::is_empty) {
            return Ok(None);
        }
        match dispatch(R::FAMILY, R::candidates(), ack) {
            Ok(result) => Ok(Some(result)),
            // The command was acknowledged; only the echoed state is unreadable.
            Err(DecodeError::UnknownShape { family }) => {
                tracing::debug!(
                    device = %self.info.name,
                    method,
                    %family,
                    "Acknowledgement carries no known state shape"
                );
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fetches details and applies them to the state.
    ///
    /// A failed refresh leaves state untouched, except that a reply saying
    /// the device is unreachable marks it offline.
    pub(crate) async fn refresh<R, F>(&self, method: &str, data: Value, apply: F) -> Result<()>
    where
        R: FamilyResult + Send,
        F: FnOnce(R, &mut DeviceState, &mut S) + Send,
    {
        let result = self.fetch::<R>(method, data).await;
        self.apply_refresh(result, apply)
    }

    /// Applies a fetched result, or records what its failure says about
    /// reachability.
    pub(crate) fn apply_refresh<R, F>(&self, result: Result<R>, apply: F) -> Result<()>
    where
        F: FnOnce(R, &mut DeviceState, &mut S),
    {
        match result {
            Ok(result) => {
                self.update_state(|common, family| {
                    common.mark_refreshed();
                    apply(result, common, family);
                });
                tracing::debug!(device = %self.info.name, "Refreshed device details");
                Ok(())
            }
            Err(err) => {
                if err.marks_device_offline() {
                    self.state.write().mark_offline();
                    tracing::debug!(device = %self.info.name, "Server reports device offline");
                }
                Err(err)
            }
        }
    }

    // ========== State ==========

    pub(crate) fn update_state(&self, apply: impl FnOnce(&mut DeviceState, &mut S)) {
        let mut common = self.state.write();
        let mut family = self.family.write();
        apply(&mut common, &mut family);
    }

    pub(crate) fn read_family<T>(&self, read: impl FnOnce(&S) -> T) -> T {
        read(&self.family.read())
    }

    pub(crate) fn set_power(&self, on: bool) {
        self.state.write().set_device_status(DeviceStatus::from_bool(on));
    }

    /// Resolves a toggle request against the current power state.
    pub(crate) fn target_power(&self, on: Option<bool>) -> bool {
        on.unwrap_or_else(|| !self.is_on())
    }

    pub(crate) fn sub_device_no(&self) -> Option<u8> {
        self.info.sub_device_no
    }
}

impl<S: FamilyState> fmt::Debug for Device<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("info", &self.info)
            .field("model", &self.features.model_name)
            .field("state", &*self.state.read())
            .field("details", &*self.family.read())
            .finish_non_exhaustive()
    }
}

/// Brightness and other percentages.
pub(crate) const PERCENT: LevelRange = LevelRange::new(0, 100);

/// Resolves a toggle request against a gated boolean.
pub(crate) fn flip(on: Option<bool>, current: Supported<bool>) -> bool {
    on.unwrap_or_else(|| !current.get().unwrap_or(false))
}

/// Returns a range the model must declare for a command.
pub(crate) fn declared(range: Option<LevelRange>, field: &'static str) -> Result<LevelRange> {
    range.ok_or_else(|| ValidationError::MissingValue { field }.into())
}

/// Maps an on/off switch to the status strings of V1 endpoints.
pub(crate) const fn status_str(on: bool) -> &'static str {
    DeviceStatus::from_bool(on).as_str()
}

/// Encodes a switch as the integer V2 endpoints expect.
pub(crate) const fn switch_int(on: bool) -> u8 {
    if on { 1 } else { 0 }
}

// ============================================================================
// VeSyncDevice
// ============================================================================

/// A device of any family.
#[derive(Debug)]
pub enum VeSyncDevice {
    /// Smart plug.
    Outlet(Outlet),
    /// In-wall switch or dimmer.
    Switch(Switch),
    /// Light bulb.
    Bulb(Bulb),
    /// Humidifier.
    Humidifier(Humidifier),
    /// Air purifier.
    Purifier(Purifier),
    /// Fan.
    Fan(Fan),
    /// Thermostat.
    Thermostat(Thermostat),
}

macro_rules! each_device {
    ($value:expr, $device:ident => $body:expr) => {
        match $value {
            VeSyncDevice::Outlet($device) => $body,
            VeSyncDevice::Switch($device) => $body,
            VeSyncDevice::Bulb($device) => $body,
            VeSyncDevice::Humidifier($device) => $body,
            VeSyncDevice::Purifier($device) => $body,
            VeSyncDevice::Fan($device) => $body,
            VeSyncDevice::Thermostat($device) => $body,
        }
    };
}

impl VeSyncDevice {
    /// Builds the device for a resolved device list entry.
    ///
    /// Returns `None` if the entry has no usable identifier.
    pub(crate) fn build(
        descriptor: &DeviceDescriptor,
        features: &'static FeatureMap,
        client: Arc<CloudClient>,
    ) -> Option<Self> {
        let device = match features.family() {
            DeviceFamily::Outlet => {
                Self::Outlet(Device::from_descriptor(descriptor, features, client)?)
            }
            DeviceFamily::Switch => {
                Self::Switch(Device::from_descriptor(descriptor, features, client)?)
            }
            DeviceFamily::Bulb => Self::Bulb(Device::from_descriptor(descriptor, features, client)?),
            DeviceFamily::Humidifier => {
                Self::Humidifier(Device::from_descriptor(descriptor, features, client)?)
            }
            DeviceFamily::Purifier => {
                Self::Purifier(Device::from_descriptor(descriptor, features, client)?)
            }
            DeviceFamily::Fan => Self::Fan(Device::from_descriptor(descriptor, features, client)?),
            DeviceFamily::Thermostat => {
                Self::Thermostat(Device::from_descriptor(descriptor, features, client)?)
            }
        };
        Some(device)
    }

    // ========== Common ==========

    /// Returns the device family.
    #[must_use]
    pub fn family(&self) -> DeviceFamily {
        each_device!(self, d => d.family())
    }

    /// Returns the identity fields.
    #[must_use]
    pub fn info(&self) -> &DeviceInfo {
        each_device!(self, d => d.info())
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        each_device!(self, d => d.name())
    }

    /// Returns the fleet key.
    #[must_use]
    pub fn key(&self) -> DeviceKey {
        each_device!(self, d => d.key())
    }

    /// Returns the model's feature map.
    #[must_use]
    pub fn features(&self) -> &'static FeatureMap {
        each_device!(self, d => d.features())
    }

    /// Returns a snapshot of the common state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        each_device!(self, d => d.state())
    }

    /// Returns `true` if the device is online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        each_device!(self, d => d.is_online())
    }

    /// Refreshes the device's state from the cloud.
    ///
    /// # Errors
    ///
    /// Returns transport, API and decode errors; state is left untouched.
    pub async fn update(&self) -> Result<()> {
        match self {
            Self::Outlet(d) => d.update().await,
            Self::Switch(d) => d.update().await,
            Self::Bulb(d) => d.update().await,
            Self::Humidifier(d) => d.update().await,
            Self::Purifier(d) => d.update().await,
            Self::Fan(d) => d.update().await,
            Self::Thermostat(d) => d.update().await,
        }
    }

    // ========== Capabilities ==========

    /// Returns the on/off interface if the model can be switched.
    #[must_use]
    pub fn as_toggleable(&self) -> Option<&dyn Toggleable> {
        if !self.features().supports(Feature::OnOff) {
            return None;
        }
        match self {
            Self::Outlet(d) => Some(d),
            Self::Switch(d) => Some(d),
            Self::Bulb(d) => Some(d),
            Self::Humidifier(d) => Some(d),
            Self::Purifier(d) => Some(d),
            Self::Fan(d) => Some(d),
            Self::Thermostat(_) => None,
        }
    }

    /// Returns the brightness interface if the model is dimmable.
    #[must_use]
    pub fn as_dimmable(&self) -> Option<&dyn Dimmable> {
        if !self.features().supports(Feature::Dimmable) {
            return None;
        }
        match self {
            Self::Switch(d) => Some(d),
            Self::Bulb(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the energy interface if the model meters power.
    #[must_use]
    pub fn as_energy_monitoring(&self) -> Option<&dyn EnergyMonitoring> {
        match self {
            Self::Outlet(d) if d.supports(Feature::EnergyMonitor) => Some(d),
            _ => None,
        }
    }

    /// Returns the timer interface if the model has a countdown timer.
    #[must_use]
    pub fn as_schedulable(&self) -> Option<&dyn Schedulable> {
        if !self.features().supports(Feature::Timer) {
            return None;
        }
        Some(each_device!(self, d => d as &dyn Schedulable))
    }

    /// Returns the color interface if the model is multicolor.
    #[must_use]
    pub fn as_color_controllable(&self) -> Option<&dyn ColorControllable> {
        match self {
            Self::Bulb(d) if d.supports(Feature::Multicolor) => Some(d),
            _ => None,
        }
    }

    // ========== Families ==========

    /// Returns the outlet, if this is one.
    #[must_use]
    pub fn as_outlet(&self) -> Option<&Outlet> {
        match self {
            Self::Outlet(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the switch, if this is one.
    #[must_use]
    pub fn as_switch(&self) -> Option<&Switch> {
        match self {
            Self::Switch(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the bulb, if this is one.
    #[must_use]
    pub fn as_bulb(&self) -> Option<&Bulb> {
        match self {
            Self::Bulb(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the humidifier, if this is one.
    #[must_use]
    pub fn as_humidifier(&self) -> Option<&Humidifier> {
        match self {
            Self::Humidifier(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the purifier, if this is one.
    #[must_use]
    pub fn as_purifier(&self) -> Option<&Purifier> {
        match self {
            Self::Purifier(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the fan, if this is one.
    #[must_use]
    pub fn as_fan(&self) -> Option<&Fan> {
        match self {
            Self::Fan(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the thermostat, if this is one.
    #[must_use]
    pub fn as_thermostat(&self) -> Option<&Thermostat> {
        match self {
            Self::Thermostat(d) => Some(d),
            _ => None,
        }
    }
}

// ============================================================================
// Test support
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::{Device, FamilyState, VeSyncDevice};
    use crate::protocol::recording::RecordingTransport;
    use crate::protocol::{CloudClient, RequestBuilder, Session};
    use crate::registry;
    use crate::response::DeviceDescriptor;

    pub(crate) fn descriptor(device_type: &str, cid: &str, connection: &str) -> DeviceDescriptor {
        serde_json::from_value(json!({
            "cid": cid,
            "uuid": format!("uuid-{cid}"),
            "deviceType": device_type,
            "deviceName": format!("{device_type} {cid}"),
            "deviceStatus": "off",
            "connectionStatus": connection,
            "configModule": "module",
        }))
        .unwrap()
    }

    pub(crate) fn client(transport: &Arc<RecordingTransport>) -> Arc<CloudClient> {
        let client = CloudClient::new(transport.clone(), RequestBuilder::new());
        client.set_session(Session {
            token: "token".into(),
            account_id: "42".into(),
            country_code: "US".into(),
        });
        Arc::new(client)
    }

    /// Builds an online device of `device_type` over a recording transport.
    pub(crate) fn device<S: FamilyState>(
        device_type: &str,
    ) -> (Device<S>, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let features = registry::lookup(device_type).unwrap();
        let device = Device::from_descriptor(
            &descriptor(device_type, "cid-1", "online"),
            features,
            client(&transport),
        )
        .unwrap();
        (device, transport)
    }

    /// Builds the fleet-level enum for `device_type`.
    pub(crate) fn any_device(device_type: &str) -> (VeSyncDevice, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let features = registry::lookup(device_type).unwrap();
        let device = VeSyncDevice::build(
            &descriptor(device_type, "cid-1", "online"),
            features,
            client(&transport),
        )
        .unwrap();
        (device, transport)
    }

    /// A V2 reply carrying `payload`.
    pub(crate) fn v2(payload: Value) -> Value {
        json!({
            "traceId": "1", "code": 0, "msg": "request success",
            "result": {"traceId": "1", "code": 0, "result": payload}
        })
    }

    /// A V1 reply carrying `payload` in `result`.
    pub(crate) fn v1(payload: Value) -> Value {
        json!({"traceId": "1", "code": 0, "msg": "request success", "result": payload})
    }

    /// The `payload.data` of the last V2 call.
    pub(crate) fn last_data(transport: &RecordingTransport) -> Value {
        transport.last_body().unwrap()["payload"]["data"].clone()
    }

    /// The `payload.method` of the last V2 call.
    pub(crate) fn last_method(transport: &RecordingTransport) -> String {
        transport.last_body().unwrap()["payload"]["method"]
            .as_str()
            .unwrap()
            .to_string()
    }
}

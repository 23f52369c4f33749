// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response models for the cloud API.
//!
//! Decoding happens in two steps. [`check_envelope`] parses the envelope
//! and turns nonzero result codes into errors without looking at the
//! payload. The payload is then dispatched to the first matching shape of
//! the expected family (see [`shape`]).
//!
//! # Examples
//!
//! ```
//! use vesync_lib::capabilities::BypassVersion;
//! use vesync_lib::response::{OutletResult, decode};
//!
//! let body = br#"{
//!     "code": 0, "msg": "request success",
//!     "result": {"code": 0, "result": {"enabled": true}}
//! }"#;
//! let result: OutletResult = decode(body, BypassVersion::V2).unwrap();
//! assert!(matches!(result, OutletResult::Switch(s) if s.enabled));
//! ```

mod account;
mod bulb;
pub(crate) mod codes;
pub(crate) mod de;
mod envelope;
mod fan;
mod humidifier;
mod outlet;
mod purifier;
pub mod shape;
mod switch;
mod thermostat;
mod timer;

pub use account::{DeviceDescriptor, DeviceListPage, LoginResult};
pub use bulb::{BulbResult, CwLight, CwLightStatus, Esl100Detail, McStatus, ValcenoStatus};
pub use codes::{ErrorInfo, ErrorKind, code_to_error, lookup_code};
pub use envelope::{check_envelope, check_legacy};
pub use fan::{FanResult, TowerFanStatus};
pub use humidifier::{
    ClassicConfiguration, ClassicHumidifier, DryingModeStatus, HumidifierResult,
    WorkModeHumidifier, WorkModeNightLight,
};
pub use outlet::{
    EnergyEntry, EnergyHistory, LegacyOutletDetail, OutdoorDetail, OutdoorSubDevice,
    OutletDetail, OutletResult, PropertyOutlet, SwitchEnabled,
};
pub use purifier::{
    CoreConfiguration, CorePurifier, FilterLife, Lv131Purifier, PurifierResult, RoomPreference,
    SproutNightlight, SproutPurifier, VitalPurifier,
};
pub use shape::{Candidate, FamilyResult, Presence};
pub use switch::{DimmerDetail, RgbValue, SwitchResult, WallDetail};
pub use thermostat::{ThermostatResult, ThermostatStatus};
pub use timer::{
    CounterTimer, CounterTimerCreated, CounterTimerList, TimerCreated, TimerItem, TimerList,
};

use serde::de::DeserializeOwned;

use crate::capabilities::BypassVersion;
use crate::error::{DecodeError, Result};

/// Decodes a device reply into the result union of the expected family.
///
/// # Errors
///
/// Returns the envelope errors of [`check_envelope`], then
/// `DecodeError::UnknownShape` if no registered shape matches and
/// `DecodeError::MalformedPayload` if the matched shape fails to parse.
pub fn decode<R: FamilyResult>(bytes: &[u8], version: BypassVersion) -> Result<R> {
    let payload = check_envelope(bytes, version)?;
    Ok(shape::dispatch(R::FAMILY, R::candidates(), payload)?)
}

/// Decodes a checked payload whose shape is fixed by the endpoint.
///
/// # Errors
///
/// Returns `DecodeError::MalformedPayload` if the payload does not fit `T`.
pub fn decode_payload<T: DeserializeOwned>(payload: serde_json::Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| DecodeError::MalformedPayload(e).into())
}

/// Decodes an account-level V1 reply into a fixed type.
///
/// # Errors
///
/// Returns the envelope errors of [`check_envelope`], or
/// `DecodeError::MalformedPayload` if the payload does not fit `T`.
pub fn decode_account<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    decode_payload(check_envelope(bytes, BypassVersion::V1)?)
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Countdown timers, shared by every family that has one.
//!
//! Only the first timer a device reports is tracked. Clearing needs a
//! known timer, so call [`Device::get_timer`] first when the timer was
//! set elsewhere.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::traits::Schedulable;
use super::{Device, FamilyState};
use crate::capabilities::{Feature, ModelKind};
use crate::error::{ApiError, DecodeError, Error, Result, ValidationError};
use crate::protocol::HttpMethod;
use crate::response::codes::{TIMER_CONFLICT, TIMER_NOT_EXIST};
use crate::response::{
    CounterTimer, CounterTimerCreated, CounterTimerList, TimerCreated, TimerItem, TimerList,
    code_to_error, decode_payload,
};
use crate::types::{Timer, TimerAction};

/// Wire dialect of a model's timer calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    /// `/v2/device/{cid}/timer` REST resource.
    Legacy,
    /// `timer/*` bypass V1 endpoints with string identifiers.
    Counter,
    /// Bypass V2 methods taking `{action, total}`.
    Bypass {
        add: &'static str,
        clear: &'static str,
    },
    /// `addTimerV2` with a power-off event.
    Event,
}

const fn dialect(model: ModelKind) -> Dialect {
    match model {
        ModelKind::Outlet7A => Dialect::Legacy,
        ModelKind::Outlet15A | ModelKind::OutdoorPlug => Dialect::Counter,
        ModelKind::VitalPurifier | ModelKind::SproutPurifier => Dialect::Event,
        ModelKind::TowerFan => Dialect::Bypass {
            add: "setTimer",
            clear: "clearTimer",
        },
        _ => Dialect::Bypass {
            add: "addTimer",
            clear: "delTimer",
        },
    }
}

/// Purifier timers can only switch the device off.
const fn off_only(model: ModelKind) -> bool {
    matches!(
        model,
        ModelKind::CorePurifier | ModelKind::VitalPurifier | ModelKind::SproutPurifier
    )
}

fn first_counter(timers: &[CounterTimer]) -> Option<Timer> {
    timers.first().and_then(CounterTimer::to_timer)
}

fn counter_id(created: &CounterTimerCreated) -> Result<i64> {
    if let Ok(id) = created.timer_id.trim().parse() {
        return Ok(id);
    }
    if created.conflict_timer_ids.is_empty() {
        Err(DecodeError::MissingField("timerID".to_string()).into())
    } else {
        Err(code_to_error(TIMER_CONFLICT, None))
    }
}

fn timer_gone(err: &Error) -> bool {
    matches!(err, Error::Api(ApiError { code: TIMER_NOT_EXIST, .. }))
}

impl<S: FamilyState> Device<S> {
    fn timer_path(&self, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("/v2/device/{}/timer/{id}", self.info.cid),
            None => format!("/v2/device/{}/timer", self.info.cid),
        }
    }

    fn switch_no(&self) -> Value {
        match self.features.model {
            ModelKind::OutdoorPlug => json!({"switchNo": self.sub_device_no()}),
            _ => json!({}),
        }
    }

    fn store_timer(&self, timer: Option<Timer>) {
        self.state.write().set_timer(timer);
    }

    /// Fetches the active timer and stores it.
    ///
    /// Returns `None` when no timer runs.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnsupportedFeature` for models without a
    /// timer, otherwise the transport, API and decode errors of the call.
    pub async fn get_timer(&self) -> Result<Option<Timer>> {
        self.require(Feature::Timer)?;
        let timers: Vec<Timer> = match dialect(self.features.model) {
            Dialect::Legacy => {
                let reply = self
                    .legacy(HttpMethod::Get, &self.timer_path(None), None)
                    .await?;
                let timers: Option<Vec<CounterTimer>> = decode_payload(reply)?;
                timers.unwrap_or_default().iter().filter_map(CounterTimer::to_timer).collect()
            }
            Dialect::Counter => {
                let payload = self
                    .command_at("timer/getTimers", "getTimers", self.switch_no())
                    .await?;
                let list: CounterTimerList = decode_payload(payload)?;
                first_counter(&list.timers).into_iter().collect()
            }
            Dialect::Bypass { .. } | Dialect::Event => {
                let payload = self.command("getTimer", json!({})).await?;
                let list: TimerList = decode_payload(payload)?;
                list.timers.iter().map(TimerItem::to_timer).collect::<Vec<_>>()
            }
        };
        if timers.len() > 1 {
            tracing::debug!(
                device = %self.info.name,
                count = timers.len(),
                "Several timers reported, tracking the first"
            );
        }
        let timer = timers.into_iter().next();
        self.store_timer(timer.clone());
        Ok(timer)
    }

    /// Starts a timer of `seconds` that switches the device.
    ///
    /// Without an `action` the timer inverts the current power state.
    /// Purifier timers can only switch off.
    ///
    /// # Errors
    ///
    /// - `ValidationError::UnsupportedFeature` for models without a timer
    /// - `Error::Offline` for offline devices
    /// - `ValidationError::OutOfRange` for a zero duration
    /// - `ValidationError::InvalidChoice` for an `on` action on purifiers
    /// - the `TIMER_CONFLICT` API error when other timers block this one
    pub async fn set_timer(&self, seconds: u32, action: Option<TimerAction>) -> Result<Timer> {
        self.gate(Feature::Timer)?;
        if seconds == 0 {
            return Err(ValidationError::OutOfRange {
                field: "timer_duration",
                min: 1,
                max: i64::from(u32::MAX),
                actual: 0,
            }
            .into());
        }
        let model = self.features.model;
        let action = match (action, off_only(model)) {
            (Some(TimerAction::On), true) => {
                return Err(ValidationError::InvalidChoice {
                    field: "timer_action",
                    value: TimerAction::On.to_string(),
                }
                .into());
            }
            (_, true) => TimerAction::Off,
            (Some(action), false) => action,
            (None, false) if self.is_on() => TimerAction::Off,
            (None, false) => TimerAction::On,
        };

        let id = match dialect(model) {
            Dialect::Legacy => {
                let body = json!({
                    "action": action.as_str(),
                    "counterTimer": seconds,
                    "timerStatus": "start",
                    "conflictAwayIds": [],
                    "conflictScheduleIds": [],
                    "conflictTimerIds": [],
                });
                let reply = self
                    .legacy(HttpMethod::Post, &self.timer_path(None), Some(body))
                    .await?;
                counter_id(&decode_payload(reply)?)?
            }
            Dialect::Counter => {
                let mut data = self.switch_no();
                data["action"] = json!(action.as_str());
                data["counterTime"] = json!(seconds.to_string());
                let payload = self.command_at("timer/addTimer", "addTimer", data).await?;
                counter_id(&decode_payload(payload)?)?
            }
            Dialect::Bypass { add, .. } => {
                let payload = self
                    .command(add, json!({"action": action.as_str(), "total": seconds}))
                    .await?;
                decode_payload::<TimerCreated>(payload)?.id
            }
            Dialect::Event => {
                let data = json!({
                    "enabled": true,
                    "startAct": [{"type": "powerSwitch", "act": 0}],
                    "tmgEvt": {"clkSec": seconds},
                });
                let payload = self.command("addTimerV2", data).await?;
                decode_payload::<TimerCreated>(payload)?.id
            }
        };

        let timer = Timer::new(id, action, seconds);
        self.store_timer(Some(timer.clone()));
        tracing::debug!(
            device = %self.info.name,
            timer_id = id,
            seconds,
            %action,
            "Timer set"
        );
        Ok(timer)
    }

    /// Cancels the known timer.
    ///
    /// A timer that already ran out is forgotten without a call. When the
    /// cloud reports the timer gone, it is forgotten and the error is
    /// still returned.
    ///
    /// # Errors
    ///
    /// - `ValidationError::UnsupportedFeature` for models without a timer
    /// - `Error::Offline` for offline devices
    /// - `ValidationError::MissingValue` when no timer is known
    /// - the transport, API and decode errors of the call
    pub async fn clear_timer(&self) -> Result<()> {
        self.gate(Feature::Timer)?;
        let Some(timer) = self.timer() else {
            return Err(ValidationError::MissingValue { field: "timer" }.into());
        };
        if timer.is_done() {
            self.store_timer(None);
            return Ok(());
        }

        let id = timer.id();
        let sent = match dialect(self.features.model) {
            Dialect::Legacy => self
                .legacy(HttpMethod::Delete, &self.timer_path(Some(id)), None)
                .await
                .map(drop),
            Dialect::Counter => self
                .command_at(
                    "timer/deleteTimer",
                    "deleteTimer",
                    json!({"timerId": id.to_string()}),
                )
                .await
                .map(drop),
            Dialect::Bypass { clear, .. } => self.command(clear, json!({"id": id})).await.map(drop),
            Dialect::Event => self
                .command("delTimerV2", json!({"id": id, "subDeviceNo": 0}))
                .await
                .map(drop),
        };

        match sent {
            Ok(()) => {
                self.store_timer(None);
                tracing::debug!(device = %self.info.name, timer_id = id, "Timer cleared");
                Ok(())
            }
            Err(err) => {
                if timer_gone(&err) {
                    self.store_timer(None);
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl<S: FamilyState> Schedulable for Device<S> {
    fn timer(&self) -> Option<Timer> {
        Device::timer(self)
    }

    async fn get_timer(&self) -> Result<Option<Timer>> {
        Device::get_timer(self).await
    }

    async fn set_timer(&self, seconds: u32, action: Option<TimerAction>) -> Result<Timer> {
        Device::set_timer(self, seconds, action).await
    }

    async fn clear_timer(&self) -> Result<()> {
        Device::clear_timer(self).await
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timer payloads.
//!
//! Bypass V2 models report `{id, total, remain, action}`. Bypass V1 and
//! legacy outlets report `{timerID, counterTimer, action, timerStatus}`,
//! with the identifier as a string.

use serde::{Deserialize, Serialize};

use crate::types::{Timer, TimerAction};

use super::de;

/// One timer of a bypass V2 model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerItem {
    /// Timer identifier.
    #[serde(deserialize_with = "de::flex_i64")]
    pub id: i64,
    /// Configured duration in seconds.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub total: i64,
    /// Seconds left.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub remain: i64,
    /// `on` or `off`.
    #[serde(default)]
    pub action: String,
}

impl TimerItem {
    /// Converts the reported item.
    #[must_use]
    pub fn to_timer(&self) -> Timer {
        let total = seconds(self.total);
        let remain = if self.remain > 0 { seconds(self.remain) } else { total };
        Timer::new(self.id, action(&self.action), total).with_remaining(remain)
    }
}

/// `getTimer` reply of bypass V2 models.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerList {
    /// Active timers, most recent first.
    #[serde(default, deserialize_with = "de::null_default")]
    pub timers: Vec<TimerItem>,
}

/// `addTimer` reply of bypass V2 models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerCreated {
    /// Identifier of the new timer.
    #[serde(deserialize_with = "de::flex_i64")]
    pub id: i64,
}

/// One timer of a bypass V1 or legacy outlet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterTimer {
    /// Timer identifier, sent as a string.
    #[serde(rename = "timerID", deserialize_with = "de::flex_string")]
    pub timer_id: String,
    /// Duration in seconds.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub counter_timer: i64,
    /// `on` or `off`.
    #[serde(default)]
    pub action: String,
    /// `start` while running, `off` while paused.
    #[serde(default)]
    pub timer_status: Option<String>,
}

impl CounterTimer {
    /// Converts the reported item.
    ///
    /// Returns `None` if the identifier is not numeric.
    #[must_use]
    pub fn to_timer(&self) -> Option<Timer> {
        let id = self.timer_id.trim().parse().ok()?;
        let timer = Timer::new(id, action(&self.action), seconds(self.counter_timer));
        let paused = self
            .timer_status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("off"));
        Some(if paused { timer.paused() } else { timer })
    }
}

/// `getTimers` reply of bypass V1 outlets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTimerList {
    /// Active timers, most recent first.
    #[serde(default, deserialize_with = "de::null_default")]
    pub timers: Vec<CounterTimer>,
}

/// `addTimer` reply of bypass V1 and legacy outlets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterTimerCreated {
    /// Identifier of the new timer; empty when the cloud refused it.
    #[serde(rename = "timerID", default, deserialize_with = "de::flex_string")]
    pub timer_id: String,
    /// Timers that blocked the new one.
    #[serde(rename = "conflictTimerIds", default, deserialize_with = "de::null_default")]
    pub conflict_timer_ids: Vec<serde_json::Value>,
}

fn action(value: &str) -> TimerAction {
    TimerAction::from_wire(value).unwrap_or(TimerAction::Off)
}

fn seconds(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v2_item_keeps_remaining_time() {
        let list: TimerList = serde_json::from_value(json!({
            "timers": [{"id": 3, "total": 600, "remain": 120, "action": "off"}]
        }))
        .unwrap();
        let timer = list.timers[0].to_timer();
        assert_eq!(timer.id(), 3);
        assert_eq!(timer.duration(), 600);
        assert_eq!(timer.action(), TimerAction::Off);
        assert!(timer.remaining() <= 120);
        assert!(timer.remaining() > 100);
    }

    #[test]
    fn null_timer_list_is_empty() {
        let list: TimerList = serde_json::from_value(json!({"timers": null})).unwrap();
        assert!(list.timers.is_empty());
        let list: CounterTimerList = serde_json::from_value(json!({})).unwrap();
        assert!(list.timers.is_empty());
    }

    #[test]
    fn counter_timer_parses_string_id_and_pause() {
        let item: CounterTimer = serde_json::from_value(json!({
            "timerID": "8841",
            "counterTimer": 300,
            "action": "on",
            "timerStatus": "off"
        }))
        .unwrap();
        let timer = item.to_timer().unwrap();
        assert_eq!(timer.id(), 8841);
        assert_eq!(timer.action(), TimerAction::On);
        assert!(timer.is_paused());
        assert_eq!(timer.remaining(), 300);

        let bad: CounterTimer =
            serde_json::from_value(json!({"timerID": "", "counterTimer": 1})).unwrap();
        assert!(bad.to_timer().is_none());
    }

    #[test]
    fn refused_timer_has_empty_id() {
        let created: CounterTimerCreated =
            serde_json::from_value(json!({"timerID": "", "conflictTimerIds": ["12"]})).unwrap();
        assert!(created.timer_id.is_empty());
        assert_eq!(created.conflict_timer_ids.len(), 1);
    }
}

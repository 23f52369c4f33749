// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Countdown timers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a timer does when it runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerAction {
    /// Switch the device on.
    On,
    /// Switch the device off.
    Off,
}

impl TimerAction {
    /// Parses `on` / `off`, case-insensitively.
    #[must_use]
    pub fn from_wire(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("on") {
            Some(Self::On)
        } else if value.eq_ignore_ascii_case("off") {
            Some(Self::Off)
        } else {
            None
        }
    }

    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for TimerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A countdown timer as last reported by the cloud.
///
/// The remaining time is a snapshot taken at `synced_at`; reads count
/// down from it locally until the next fetch. A paused timer does not
/// count down.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, Utc};
/// use vesync_lib::types::{Timer, TimerAction};
///
/// let timer = Timer::new(7, TimerAction::Off, 600).with_remaining(90);
/// let later = timer.synced_at() + Duration::seconds(30);
/// assert_eq!(timer.remaining_at(later), 60);
/// assert!(!timer.is_done_at(later));
/// assert!(timer.is_done_at(later + Duration::seconds(60)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    id: i64,
    action: TimerAction,
    duration: u32,
    remaining: u32,
    paused: bool,
    synced_at: DateTime<Utc>,
}

impl Timer {
    /// Creates a running timer with its full duration left.
    #[must_use]
    pub fn new(id: i64, action: TimerAction, duration: u32) -> Self {
        Self {
            id,
            action,
            duration,
            remaining: duration,
            paused: false,
            synced_at: Utc::now(),
        }
    }

    /// Sets the seconds left at sync time, capped at the duration.
    #[must_use]
    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.remaining = remaining.min(self.duration);
        self
    }

    /// Marks the timer paused.
    #[must_use]
    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    /// Cloud identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// Action taken on expiry.
    #[must_use]
    pub const fn action(&self) -> TimerAction {
        self.action
    }

    /// Configured duration in seconds.
    #[must_use]
    pub const fn duration(&self) -> u32 {
        self.duration
    }

    /// Returns `true` if the timer is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// When the remaining time was reported.
    #[must_use]
    pub const fn synced_at(&self) -> DateTime<Utc> {
        self.synced_at
    }

    /// Seconds left at `now`.
    #[must_use]
    pub fn remaining_at(&self, now: DateTime<Utc>) -> u32 {
        if self.paused {
            return self.remaining;
        }
        let elapsed = (now - self.synced_at).num_seconds().max(0);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        self.remaining.saturating_sub(elapsed)
    }

    /// Seconds left now.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining_at(Utc::now())
    }

    /// Returns `true` if the timer has run out at `now`.
    #[must_use]
    pub fn is_done_at(&self, now: DateTime<Utc>) -> bool {
        self.remaining_at(now) == 0
    }

    /// Returns `true` if the timer has run out.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.is_done_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn paused_timer_keeps_its_remaining_time() {
        let timer = Timer::new(1, TimerAction::On, 120).with_remaining(50).paused();
        let later = timer.synced_at() + Duration::hours(1);
        assert_eq!(timer.remaining_at(later), 50);
        assert!(!timer.is_done_at(later));
    }

    #[test]
    fn remaining_is_capped_by_duration() {
        let timer = Timer::new(1, TimerAction::Off, 30).with_remaining(500);
        assert_eq!(timer.remaining_at(timer.synced_at()), 30);
    }

    #[test]
    fn clock_skew_does_not_add_time() {
        let timer = Timer::new(1, TimerAction::Off, 30);
        let earlier = timer.synced_at() - Duration::seconds(10);
        assert_eq!(timer.remaining_at(earlier), 30);
    }

    #[test]
    fn action_wire_names() {
        assert_eq!(TimerAction::from_wire("ON"), Some(TimerAction::On));
        assert_eq!(TimerAction::from_wire("toggle"), None);
        assert_eq!(TimerAction::Off.to_string(), "off");
    }
}

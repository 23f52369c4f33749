// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability interfaces shared across device families.
//!
//! Each trait is implemented by every family that can offer the
//! capability; [`VeSyncDevice`](super::VeSyncDevice) only hands out a
//! trait object when the device's model actually has the feature.

use async_trait::async_trait;

use crate::error::Result;
use crate::state::{EnergyReading, Supported};
use crate::types::{Color, HsvColor, RgbColor, Timer, TimerAction};

/// Devices that can be switched on and off.
#[async_trait]
pub trait Toggleable: Send + Sync {
    /// Switches the device; `None` inverts the current state.
    ///
    /// # Errors
    ///
    /// Returns `Error::Offline` for offline devices, or the transport,
    /// API and decode errors of the call.
    async fn toggle_switch(&self, on: Option<bool>) -> Result<()>;

    /// Switches the device on.
    ///
    /// # Errors
    ///
    /// See [`toggle_switch`](Self::toggle_switch).
    async fn turn_on(&self) -> Result<()> {
        self.toggle_switch(Some(true)).await
    }

    /// Switches the device off.
    ///
    /// # Errors
    ///
    /// See [`toggle_switch`](Self::toggle_switch).
    async fn turn_off(&self) -> Result<()> {
        self.toggle_switch(Some(false)).await
    }

    /// Returns `true` if the device is on.
    fn is_on(&self) -> bool;
}

/// Devices with adjustable brightness.
#[async_trait]
pub trait Dimmable: Send + Sync {
    /// Brightness 0-100.
    fn brightness(&self) -> Supported<u8>;

    /// Sets brightness 0-100.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` above 100, otherwise the
    /// errors of the call.
    async fn set_brightness(&self, brightness: u8) -> Result<()>;
}

/// Devices that meter power.
#[async_trait]
pub trait EnergyMonitoring: Send + Sync {
    /// Latest readings.
    fn energy(&self) -> Supported<EnergyReading>;

    /// Fetches fresh readings.
    ///
    /// # Errors
    ///
    /// Returns the transport, API and decode errors of the call.
    async fn refresh_energy(&self) -> Result<()>;
}

/// Devices with a countdown timer.
#[async_trait]
pub trait Schedulable: Send + Sync {
    /// Last known timer.
    fn timer(&self) -> Option<Timer>;

    /// Fetches the active timer.
    ///
    /// # Errors
    ///
    /// Returns the transport, API and decode errors of the call.
    async fn get_timer(&self) -> Result<Option<Timer>>;

    /// Starts a timer of `seconds`; without an `action` it inverts the
    /// current power state.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::OutOfRange` for a zero duration,
    /// `ValidationError::InvalidChoice` for an action the model cannot
    /// take, otherwise the errors of the call.
    async fn set_timer(&self, seconds: u32, action: Option<TimerAction>) -> Result<Timer>;

    /// Cancels the known timer.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingValue` when no timer is known,
    /// otherwise the errors of the call.
    async fn clear_timer(&self) -> Result<()>;
}

/// Devices with RGB or HSV color output.
#[async_trait]
pub trait ColorControllable: Send + Sync {
    /// Current color.
    fn color(&self) -> Supported<Color>;

    /// Switches to color mode with an RGB color.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    async fn set_rgb(&self, color: RgbColor) -> Result<()>;

    /// Switches to color mode with an HSV color.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    async fn set_hsv(&self, color: HsvColor) -> Result<()>;

    /// Switches to white mode.
    ///
    /// # Errors
    ///
    /// Returns the errors of the call.
    async fn enable_white_mode(&self) -> Result<()>;
}

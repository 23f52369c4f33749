// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deprecated call styles kept for older callers.
//!
//! Each function forwards to the typed operation that replaced it.

use super::Purifier;
use super::traits::Toggleable;
use crate::error::{Result, ValidationError};
use crate::types::PurifierMode;

/// Switches a device with an `"on"`/`"off"` string.
///
/// # Errors
///
/// Returns `ValidationError::InvalidChoice` for any other string,
/// otherwise the errors of [`Toggleable::toggle_switch`].
#[deprecated(note = "use `Toggleable::toggle_switch`, `turn_on` or `turn_off`")]
pub async fn toggle(device: &dyn Toggleable, status: &str) -> Result<()> {
    let on = match status.to_ascii_lowercase().as_str() {
        "on" => true,
        "off" => false,
        _ => {
            return Err(ValidationError::InvalidChoice {
                field: "status",
                value: status.to_string(),
            }
            .into());
        }
    };
    device.toggle_switch(Some(on)).await
}

/// Locks a purifier's buttons.
///
/// # Errors
///
/// Returns the errors of [`Purifier::toggle_child_lock`].
#[deprecated(note = "use `Purifier::toggle_child_lock(Some(true))`")]
pub async fn turn_on_child_lock(purifier: &Purifier) -> Result<()> {
    purifier.toggle_child_lock(Some(true)).await
}

/// Changes a purifier's fan speed.
///
/// # Errors
///
/// Returns the errors of [`Purifier::set_fan_speed`].
#[deprecated(note = "use `Purifier::set_fan_speed`")]
pub async fn change_fan_speed(purifier: &Purifier, level: Option<u8>) -> Result<()> {
    purifier.set_fan_speed(level).await
}

/// Changes a purifier's mode.
///
/// # Errors
///
/// Returns the errors of [`Purifier::set_mode`].
#[deprecated(note = "use `Purifier::set_mode`")]
pub async fn mode_toggle(purifier: &Purifier, mode: PurifierMode) -> Result<()> {
    purifier.set_mode(mode).await
}

#[cfg(test)]
#[allow(deprecated)]
mod tests {
    use super::super::testing::{device, last_data};
    use super::*;
    use crate::error::Error;
    use crate::state::{PurifierState, Supported};
    use serde_json::json;

    #[tokio::test]
    async fn string_toggle_forwards() {
        let (purifier, transport) = device::<PurifierState>("Core200S");
        toggle(&purifier, "ON").await.unwrap();
        assert!(purifier.is_on());
        assert_eq!(last_data(&transport), json!({"enabled": true, "id": 0}));

        let err = toggle(&purifier, "maybe").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidChoice { field: "status", .. })
        ));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn purifier_aliases_forward() {
        let (purifier, transport) = device::<PurifierState>("Core200S");
        turn_on_child_lock(&purifier).await.unwrap();
        assert_eq!(purifier.details().child_lock(), Supported::Value(true));

        mode_toggle(&purifier, PurifierMode::Manual).await.unwrap();
        change_fan_speed(&purifier, Some(3)).await.unwrap();
        assert_eq!(last_data(&transport)["level"], 3);
    }
}

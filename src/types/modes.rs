// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Operating modes for purifiers, humidifiers, fans and nightlights.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $wire:tt ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant, )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Returns the canonical wire representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $wire, )+
                }
            }

            /// Parses a wire value, ignoring ASCII case.
            #[must_use]
            pub fn from_wire(value: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Air purifier operating mode.
    PurifierMode {
        /// Speed follows air quality.
        Auto => "auto",
        /// Fixed fan speed.
        Manual => "manual",
        /// Quietest speed, display dimmed.
        Sleep => "sleep",
        /// Pet-hair profile.
        Pet => "pet",
        /// Maximum airflow.
        Turbo => "turbo",
    }
}

wire_enum! {
    /// Humidifier operating mode.
    ///
    /// Some models name the same mode differently on the wire; the
    /// registry carries the per-model spelling.
    HumidifierMode {
        /// Mist follows target humidity.
        Auto => "auto",
        /// Quiet operation.
        Sleep => "sleep",
        /// Fixed mist level.
        Manual => "manual",
        /// Humidity-driven mode of OasisMist and Superior models.
        Humidity => "humidity",
    }
}

wire_enum! {
    /// Tower fan operating mode.
    FanMode {
        /// Fixed speed.
        Normal => "normal",
        /// Maximum speed.
        Turbo => "turbo",
        /// Speed follows room temperature.
        Auto => "auto",
        /// Sleep profile that lowers speed over time.
        AdvancedSleep => "advancedSleep",
    }
}

wire_enum! {
    /// Nightlight setting of outlets and purifiers.
    NightlightMode {
        /// Always on.
        On => "on",
        /// Always off.
        Off => "off",
        /// Dimmed.
        Dim => "dim",
        /// Follows ambient light.
        Auto => "auto",
    }
}

wire_enum! {
    /// Purifier auto-mode preference.
    AutoPreference {
        /// Balanced.
        Default => "default",
        /// Favor filtration, sized to the room.
        Efficient => "efficient",
        /// Favor low noise.
        Quiet => "quiet",
    }
}

impl PurifierMode {
    /// Returns `true` if fan speed can be set directly in this mode.
    #[must_use]
    pub const fn accepts_fan_speed(&self) -> bool {
        matches!(self, Self::Manual)
    }
}

impl FanMode {
    /// Returns `true` if fan speed can be set directly in this mode.
    #[must_use]
    pub const fn accepts_fan_speed(&self) -> bool {
        matches!(self, Self::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        for mode in PurifierMode::ALL {
            assert_eq!(PurifierMode::from_wire(mode.as_str()), Some(*mode));
        }
        assert_eq!(FanMode::from_wire("advancedsleep"), Some(FanMode::AdvancedSleep));
        assert_eq!(HumidifierMode::from_wire("autoPro"), None);
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&FanMode::AdvancedSleep).unwrap();
        assert_eq!(json, "\"advancedSleep\"");
        let mode: NightlightMode = serde_json::from_str("\"dim\"").unwrap();
        assert_eq!(mode, NightlightMode::Dim);
    }

    #[test]
    fn speed_controllable_modes() {
        assert!(PurifierMode::Manual.accepts_fan_speed());
        assert!(!PurifierMode::Auto.accepts_fan_speed());
        assert!(FanMode::Normal.accepts_fan_speed());
        assert!(!FanMode::Turbo.accepts_fan_speed());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric enumerations used by smart thermostats.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $label:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[ $( Self::$variant ),+ ];

            /// Returns the numeric code sent on the wire.
            #[must_use]
            pub const fn code(&self) -> u8 {
                match self {
                    $( Self::$variant => $code, )+
                }
            }

            /// Looks up a variant by its wire code.
            #[must_use]
            pub fn from_code(code: u8) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.code() == code)
            }

            /// Returns a lowercase label.
            #[must_use]
            pub const fn label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

code_enum! {
    /// Thermostat operating mode.
    ThermostatWorkMode {
        /// System off.
        Off = 0 => "off",
        /// Heating only.
        Heat = 1 => "heat",
        /// Cooling only.
        Cool = 2 => "cool",
        /// Heat or cool to stay between the setpoints.
        Auto = 3 => "auto",
        /// Emergency (auxiliary) heat.
        EmHeat = 4 => "em_heat",
        /// Schedule-driven auto.
        SmartAuto = 5 => "smart_auto",
    }
}

code_enum! {
    /// Thermostat fan mode.
    ThermostatFanMode {
        /// Fan runs with heating or cooling.
        Auto = 1 => "auto",
        /// Fan always on.
        On = 2 => "on",
        /// Fan cycles periodically.
        Circulate = 3 => "circulate",
    }
}

code_enum! {
    /// How long a manual setpoint is held.
    HoldOption {
        /// Until the next scheduled change.
        UntilNextScheduledItem = 2 => "until_next_scheduled_item",
        /// Two hours.
        TwoHours = 3 => "two_hours",
        /// Four hours.
        FourHours = 4 => "four_hours",
        /// Until cancelled.
        Permanently = 5 => "permanently",
    }
}

code_enum! {
    /// Comfort versus energy trade-off.
    EcoType {
        /// Strongly favor comfort.
        ComfortSecond = 1 => "comfort_second",
        /// Favor comfort.
        ComfortFirst = 2 => "comfort_first",
        /// Balanced.
        Balance = 3 => "balance",
        /// Favor savings.
        EcoFirst = 4 => "eco_first",
        /// Strongly favor savings.
        EcoSecond = 5 => "eco_second",
    }
}

code_enum! {
    /// Kind of stored routine.
    RoutineType {
        /// Away routine.
        Away = 1 => "away",
        /// Home routine.
        Home = 2 => "home",
        /// Sleep routine.
        Sleep = 3 => "sleep",
        /// User-defined routine.
        Custom = 4 => "custom",
    }
}

code_enum! {
    /// What the HVAC equipment is currently doing.
    WorkStatus {
        /// Idle.
        Off = 0 => "off",
        /// Heating.
        Heating = 1 => "heating",
        /// Cooling.
        Cooling = 2 => "cooling",
        /// Emergency heat running.
        EmHeating = 3 => "em_heating",
    }
}

/// A routine stored on the thermostat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermostatRoutine {
    /// Display name.
    pub name: String,
    /// Identifier used when activating the routine.
    pub routine_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for mode in ThermostatWorkMode::ALL {
            assert_eq!(ThermostatWorkMode::from_code(mode.code()), Some(*mode));
        }
        assert_eq!(HoldOption::from_code(2), Some(HoldOption::UntilNextScheduledItem));
        assert_eq!(HoldOption::from_code(1), None);
        assert_eq!(EcoType::from_code(3), Some(EcoType::Balance));
    }

    #[test]
    fn labels() {
        assert_eq!(ThermostatWorkMode::SmartAuto.to_string(), "smart_auto");
        assert_eq!(ThermostatFanMode::Circulate.label(), "circulate");
        assert_eq!(WorkStatus::from_code(2), Some(WorkStatus::Cooling));
    }
}

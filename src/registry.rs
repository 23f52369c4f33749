// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static table of supported device models.
//!
//! The table is built once on first use and never mutated. Lookup is a
//! hash-map hit on the exact device type reported by the cloud, with a
//! fallback for regional variants that drops the last `-` segment and
//! matches the remaining prefix case-insensitively.
//!
//! # Examples
//!
//! ```
//! use vesync_lib::registry;
//! use vesync_lib::capabilities::{DeviceFamily, Feature};
//!
//! let map = registry::lookup("Core300S").unwrap();
//! assert_eq!(map.family(), DeviceFamily::Purifier);
//! assert!(map.supports(Feature::AirQuality));
//!
//! // Unknown regional suffix resolves through the prefix fallback
//! assert!(registry::lookup("LAP-C401S-WXYZ").is_some());
//! assert!(registry::lookup("NOT-A-DEVICE").is_none());
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::capabilities::{Feature, FeatureMap, FeatureSet, ModelKind, ValueRanges};
use crate::types::{
    AutoPreference, ColorMode, EcoType, FanMode, HoldOption, HumidifierMode, LevelRange,
    NightlightMode, PurifierMode, RoutineType, ThermostatFanMode, ThermostatWorkMode,
};

struct Registry {
    entries: Vec<FeatureMap>,
    index: HashMap<&'static str, usize>,
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let entries = catalogue();
    let mut index = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        for dev_type in entry.dev_types {
            index.entry(*dev_type).or_insert(i);
        }
    }
    Registry { entries, index }
});

/// Resolves a device type to its feature map.
///
/// Returns `None` for models this library does not know.
#[must_use]
pub fn lookup(device_type: &str) -> Option<&'static FeatureMap> {
    let registry = &*REGISTRY;
    if let Some(&i) = registry.index.get(device_type) {
        return registry.entries.get(i);
    }
    if device_type.matches('-').count() > 1 {
        let (prefix, _) = device_type.rsplit_once('-')?;
        let prefix = prefix.to_ascii_lowercase();
        return registry.entries.iter().find(|entry| {
            entry
                .dev_types
                .iter()
                .any(|t| t.to_ascii_lowercase().contains(&prefix))
        });
    }
    None
}

/// Returns every registered model in table order.
#[must_use]
pub fn entries() -> &'static [FeatureMap] {
    &REGISTRY.entries
}

// ============================================================================
// Value tables
// ============================================================================

const AUTO_PREFERENCES: &[AutoPreference] = &[
    AutoPreference::Default,
    AutoPreference::Efficient,
    AutoPreference::Quiet,
];

const TARGET_HUMIDITY: LevelRange = LevelRange::new(30, 80);

const HUMIDIFIER_AUTO_SLEEP_MANUAL: &[(HumidifierMode, &str)] = &[
    (HumidifierMode::Auto, "auto"),
    (HumidifierMode::Sleep, "sleep"),
    (HumidifierMode::Manual, "manual"),
];

const HUMIDIFIER_AUTO_MANUAL: &[(HumidifierMode, &str)] = &[
    (HumidifierMode::Auto, "auto"),
    (HumidifierMode::Manual, "manual"),
];

const HUMIDIFIER_OASIS_MIST: &[(HumidifierMode, &str)] = &[
    (HumidifierMode::Auto, "auto"),
    (HumidifierMode::Sleep, "sleep"),
    (HumidifierMode::Manual, "manual"),
    (HumidifierMode::Humidity, "humidity"),
];

const HUMIDIFIER_SUPERIOR: &[(HumidifierMode, &str)] = &[
    (HumidifierMode::Auto, "autoPro"),
    (HumidifierMode::Sleep, "sleep"),
    (HumidifierMode::Humidity, "humidity"),
    (HumidifierMode::Manual, "manual"),
];

const PURIFIER_SLEEP_MANUAL: &[PurifierMode] = &[PurifierMode::Sleep, PurifierMode::Manual];

const PURIFIER_SLEEP_MANUAL_AUTO: &[PurifierMode] = &[
    PurifierMode::Sleep,
    PurifierMode::Manual,
    PurifierMode::Auto,
];

const PURIFIER_VITAL: &[PurifierMode] = &[
    PurifierMode::Sleep,
    PurifierMode::Manual,
    PurifierMode::Auto,
    PurifierMode::Pet,
];

const PURIFIER_EVEREST: &[PurifierMode] = &[
    PurifierMode::Sleep,
    PurifierMode::Manual,
    PurifierMode::Auto,
    PurifierMode::Turbo,
];

const NIGHTLIGHT_ON_OFF_DIM: &[NightlightMode] = &[
    NightlightMode::On,
    NightlightMode::Off,
    NightlightMode::Dim,
];

const NIGHTLIGHT_ON_OFF_AUTO: &[NightlightMode] = &[
    NightlightMode::On,
    NightlightMode::Off,
    NightlightMode::Auto,
];

const PURIFIER_BASE: FeatureSet = FeatureSet::of(&[
    Feature::OnOff,
    Feature::Display,
    Feature::ChildLock,
    Feature::Timer,
]);

const HUMIDIFIER_BASE: FeatureSet =
    FeatureSet::of(&[Feature::OnOff, Feature::Display, Feature::AutoStop]);

// ============================================================================
// Catalogue
// ============================================================================

fn outlet(
    model: ModelKind,
    dev_types: &'static [&'static str],
    model_name: &'static str,
    features: &[Feature],
) -> FeatureMap {
    FeatureMap {
        model,
        dev_types,
        model_name,
        features: FeatureSet::of(features).with(Feature::OnOff),
        ranges: ValueRanges::default(),
    }
}

fn humidifier(
    model: ModelKind,
    dev_types: &'static [&'static str],
    model_name: &'static str,
    features: &[Feature],
    modes: &'static [(HumidifierMode, &'static str)],
    mist_levels: LevelRange,
    warm_levels: Option<LevelRange>,
) -> FeatureMap {
    let mut set = HUMIDIFIER_BASE;
    for feature in features {
        set = set.with(*feature);
    }
    if warm_levels.is_some() {
        set = set.with(Feature::WarmMist);
    }
    if modes.iter().any(|(m, _)| *m == HumidifierMode::Humidity) {
        set = set.with(Feature::HumidityMode);
    }
    if matches!(model, ModelKind::ClassicHumidifier | ModelKind::Oasis1000S) {
        set = set.with(Feature::Timer);
    }
    FeatureMap {
        model,
        dev_types,
        model_name,
        features: set,
        ranges: ValueRanges {
            mist_levels: Some(mist_levels),
            warm_levels,
            target_humidity: Some(TARGET_HUMIDITY),
            humidifier_modes: modes,
            ..ValueRanges::default()
        },
    }
}

fn purifier(
    model: ModelKind,
    dev_types: &'static [&'static str],
    model_name: &'static str,
    features: &[Feature],
    modes: &'static [PurifierMode],
    fan_levels: LevelRange,
) -> FeatureMap {
    let mut set = PURIFIER_BASE;
    for feature in features {
        set = set.with(*feature);
    }
    let nightlight_modes = if set.contains(Feature::Nightlight) {
        NIGHTLIGHT_ON_OFF_DIM
    } else {
        &[]
    };
    FeatureMap {
        model,
        dev_types,
        model_name,
        features: set,
        ranges: ValueRanges {
            fan_levels: Some(fan_levels),
            purifier_modes: modes,
            nightlight_modes,
            auto_preferences: AUTO_PREFERENCES,
            ..ValueRanges::default()
        },
    }
}

#[allow(clippy::too_many_lines)]
fn catalogue() -> Vec<FeatureMap> {
    vec![
        // ---------------------------------------------------------------- outlets
        outlet(
            ModelKind::Outlet7A,
            &["wifi-switch-1.3"],
            "7A Round Outlet",
            &[Feature::EnergyMonitor, Feature::EnergyHistory, Feature::Timer],
        ),
        outlet(
            ModelKind::Esw10,
            &["ESW10-USA"],
            "10A Round Outlet",
            &[Feature::Timer],
        ),
        outlet(
            ModelKind::Outlet10A,
            &["ESW01-EU", "ESW03-USA"],
            "10A Round Outlet",
            &[Feature::EnergyMonitor, Feature::EnergyHistory],
        ),
        FeatureMap {
            ranges: ValueRanges {
                nightlight_modes: NIGHTLIGHT_ON_OFF_AUTO,
                ..ValueRanges::default()
            },
            ..outlet(
                ModelKind::Outlet15A,
                &["ESW15-USA"],
                "15A Rectangle Outlet",
                &[
                    Feature::EnergyMonitor,
                    Feature::EnergyHistory,
                    Feature::Nightlight,
                    Feature::Timer,
                ],
            )
        },
        outlet(
            ModelKind::OutdoorPlug,
            &["ESO15-TB"],
            "Outdoor Plug",
            &[Feature::EnergyMonitor, Feature::EnergyHistory, Feature::Timer],
        ),
        outlet(
            ModelKind::Bsdgo1,
            &[
                "BSDOG01",
                "WYSMTOD16A",
                "WHOGPLUG",
                "WM-PLUG",
                "JXUK13APLUG",
                "WYZYOGMINIPLUG",
                "BSDOG02",
                "HWPLUG16A",
                "FY-PLUG",
                "HWPLUG16",
            ],
            "Smart Plug",
            &[Feature::EnergyMonitor],
        ),
        // ---------------------------------------------------------------- switches
        FeatureMap {
            model: ModelKind::WallSwitch,
            dev_types: &["ESWL01", "ESWL03"],
            model_name: "Light Switch",
            features: FeatureSet::of(&[Feature::OnOff]),
            ranges: ValueRanges::default(),
        },
        FeatureMap {
            model: ModelKind::DimmerSwitch,
            dev_types: &["ESWD16"],
            model_name: "Dimmer Switch",
            features: FeatureSet::of(&[
                Feature::OnOff,
                Feature::Dimmable,
                Feature::IndicatorLight,
                Feature::RgbBacklight,
            ]),
            ranges: ValueRanges::default(),
        },
        // ---------------------------------------------------------------- bulbs
        FeatureMap {
            model: ModelKind::Esl100,
            dev_types: &["ESL100"],
            model_name: "Soft White Dimmable Bulb",
            features: FeatureSet::of(&[Feature::OnOff, Feature::Dimmable]),
            ranges: ValueRanges::default(),
        },
        FeatureMap {
            model: ModelKind::Esl100Cw,
            dev_types: &["ESL100CW"],
            model_name: "Cool-to-Warm White Bulb",
            features: FeatureSet::of(&[Feature::OnOff, Feature::Dimmable, Feature::ColorTemp]),
            ranges: ValueRanges {
                color_modes: &[ColorMode::White],
                ..ValueRanges::default()
            },
        },
        FeatureMap {
            model: ModelKind::Valceno,
            dev_types: &["XYD0001"],
            model_name: "Valceno Multicolor Bulb",
            features: FeatureSet::of(&[
                Feature::OnOff,
                Feature::Dimmable,
                Feature::ColorTemp,
                Feature::Multicolor,
            ]),
            ranges: ValueRanges {
                color_modes: &[ColorMode::White, ColorMode::Hsv],
                ..ValueRanges::default()
            },
        },
        FeatureMap {
            model: ModelKind::Esl100Mc,
            dev_types: &["ESL100MC"],
            model_name: "Multicolor Bulb",
            features: FeatureSet::of(&[Feature::OnOff, Feature::Dimmable, Feature::Multicolor]),
            ranges: ValueRanges {
                color_modes: &[ColorMode::White, ColorMode::Color],
                ..ValueRanges::default()
            },
        },
        // ---------------------------------------------------------------- humidifiers
        humidifier(
            ModelKind::ClassicHumidifier,
            &["Classic300S", "LUH-A601S-WUSB", "LUH-A601S-AUSW"],
            "Classic 300S",
            &[Feature::Nightlight, Feature::NightlightBrightness],
            HUMIDIFIER_AUTO_SLEEP_MANUAL,
            LevelRange::new(1, 9),
            None,
        ),
        humidifier(
            ModelKind::ClassicHumidifier,
            &["Classic200S"],
            "Classic 200S",
            &[Feature::IndicatorLight],
            HUMIDIFIER_AUTO_MANUAL,
            LevelRange::new(1, 9),
            None,
        ),
        humidifier(
            ModelKind::ClassicHumidifier,
            &[
                "Dual200S",
                "LUH-D301S-WUSR",
                "LUH-D301S-WJP",
                "LUH-D301S-WEU",
                "LUH-D301S-KEUR",
            ],
            "Dual 200S",
            &[],
            HUMIDIFIER_AUTO_MANUAL,
            LevelRange::new(1, 2),
            None,
        ),
        humidifier(
            ModelKind::ClassicHumidifier,
            &[
                "LUH-A602S-WUSR",
                "LUH-A602S-WUS",
                "LUH-A602S-WEUR",
                "LUH-A602S-WEU",
                "LUH-A602S-WJP",
                "LUH-A602S-WUSC",
            ],
            "LV600S",
            &[],
            HUMIDIFIER_AUTO_SLEEP_MANUAL,
            LevelRange::new(1, 9),
            Some(LevelRange::new(0, 3)),
        ),
        humidifier(
            ModelKind::ClassicHumidifier,
            &["LUH-O451S-WEU"],
            "OasisMist 4.5L",
            &[],
            HUMIDIFIER_AUTO_SLEEP_MANUAL,
            LevelRange::new(1, 9),
            Some(LevelRange::new(0, 3)),
        ),
        humidifier(
            ModelKind::ClassicHumidifier,
            &[
                "LUH-O451S-WUS",
                "LUH-O451S-WUSR",
                "LUH-O601S-WUS",
                "LUH-O601S-KUS",
            ],
            "OasisMist 4.5L",
            &[],
            HUMIDIFIER_OASIS_MIST,
            LevelRange::new(1, 9),
            Some(LevelRange::new(0, 3)),
        ),
        humidifier(
            ModelKind::Oasis1000S,
            &["LUH-M101S-WUS", "LUH-M101S-WEUR", "LUH-M101S-WUSR"],
            "OasisMist 1000S",
            &[],
            HUMIDIFIER_AUTO_SLEEP_MANUAL,
            LevelRange::new(1, 9),
            None,
        ),
        humidifier(
            ModelKind::Superior6000S,
            &["LEH-S601S-WUS", "LEH-S601S-WUSR", "LEH-S601S-WEUR"],
            "Superior 6000S",
            &[Feature::DryingMode],
            HUMIDIFIER_SUPERIOR,
            LevelRange::new(1, 9),
            None,
        ),
        // ---------------------------------------------------------------- purifiers
        purifier(
            ModelKind::CorePurifier,
            &["Core200S", "LAP-C201S-AUSR", "LAP-C202S-WUSR"],
            "Core 200S",
            &[Feature::ResetFilter, Feature::Nightlight],
            PURIFIER_SLEEP_MANUAL,
            LevelRange::new(1, 3),
        ),
        purifier(
            ModelKind::CorePurifier,
            &[
                "Core300S",
                "LAP-C301S-WJP",
                "LAP-C302S-WUSB",
                "LAP-C301S-WAAA",
                "LAP-C302S-WGC",
            ],
            "Core 300S",
            &[Feature::AirQuality],
            PURIFIER_SLEEP_MANUAL_AUTO,
            LevelRange::new(1, 4),
        ),
        purifier(
            ModelKind::CorePurifier,
            &["Core400S", "LAP-C401S-WJP", "LAP-C401S-WUSR", "LAP-C401S-WAAA"],
            "Core 400S",
            &[Feature::AirQuality],
            PURIFIER_SLEEP_MANUAL_AUTO,
            LevelRange::new(1, 4),
        ),
        purifier(
            ModelKind::CorePurifier,
            &["Core600S", "LAP-C601S-WUS", "LAP-C601S-WUSR", "LAP-C601S-WEU"],
            "Core 600S",
            &[Feature::AirQuality],
            PURIFIER_SLEEP_MANUAL_AUTO,
            LevelRange::new(1, 4),
        ),
        FeatureMap {
            model: ModelKind::Lv131Purifier,
            dev_types: &["LV-PUR131S", "LV-RH131S"],
            model_name: "LV-PUR131S",
            features: FeatureSet::of(&[Feature::OnOff, Feature::Display, Feature::AirQuality]),
            ranges: ValueRanges {
                fan_levels: Some(LevelRange::new(1, 3)),
                purifier_modes: PURIFIER_SLEEP_MANUAL_AUTO,
                ..ValueRanges::default()
            },
        },
        purifier(
            ModelKind::VitalPurifier,
            &[
                "LAP-V102S-AASR",
                "LAP-V102S-WUS",
                "LAP-V102S-WEU",
                "LAP-V102S-AUSR",
                "LAP-V102S-WJP",
                "LAP-V102S-AJPR",
                "LAP-V102S-AEUR",
            ],
            "Vital 100S",
            &[Feature::AirQuality],
            PURIFIER_VITAL,
            LevelRange::new(1, 4),
        ),
        purifier(
            ModelKind::VitalPurifier,
            &[
                "LAP-V201S-AASR",
                "LAP-V201S-WJP",
                "LAP-V201S-WEU",
                "LAP-V201S-WUS",
                "LAP-V201-AUSR",
                "LAP-V201S-AUSR",
                "LAP-V201S-AEUR",
            ],
            "Vital 200S",
            &[Feature::AirQuality, Feature::LightDetect],
            PURIFIER_VITAL,
            LevelRange::new(1, 4),
        ),
        purifier(
            ModelKind::VitalPurifier,
            &[
                "LAP-EL551S-AUS",
                "LAP-EL551S-AEUR",
                "LAP-EL551S-WEU",
                "LAP-EL551S-WUS",
            ],
            "Everest Air",
            &[Feature::AirQuality, Feature::VentAngle, Feature::LightDetect],
            PURIFIER_EVEREST,
            LevelRange::new(1, 3),
        ),
        purifier(
            ModelKind::SproutPurifier,
            &[
                "LAP-B851S-WEU",
                "LAP-B851S-WNA",
                "LAP-B851S-AEUR",
                "LAP-B851S-AUS",
                "LAP-B851S-WUS",
                "LAP-BAY-MAX01S",
            ],
            "Sprout Air",
            &[Feature::AirQuality, Feature::Nightlight],
            PURIFIER_SLEEP_MANUAL_AUTO,
            LevelRange::new(1, 3),
        ),
        // ---------------------------------------------------------------- fans
        FeatureMap {
            model: ModelKind::TowerFan,
            dev_types: &["LTF-F422S-KEU", "LTF-F422S-WUSR", "LTF-F422_WJP", "LTF-F422S-WUS"],
            model_name: "Classic 42-Inch Tower Fan",
            features: FeatureSet::of(&[
                Feature::OnOff,
                Feature::Display,
                Feature::Oscillation,
                Feature::Sound,
                Feature::DisplayingType,
                Feature::Timer,
            ]),
            ranges: ValueRanges {
                fan_levels: Some(LevelRange::new(1, 12)),
                fan_modes: FanMode::ALL,
                ..ValueRanges::default()
            },
        },
        // ---------------------------------------------------------------- thermostats
        FeatureMap {
            model: ModelKind::AuraThermostat,
            dev_types: &["LTM-A401S-WUS"],
            model_name: "Aura Smart Thermostat",
            features: FeatureSet::empty(),
            ranges: ValueRanges {
                thermostat_modes: ThermostatWorkMode::ALL,
                thermostat_fan_modes: ThermostatFanMode::ALL,
                hold_options: HoldOption::ALL,
                eco_types: EcoType::ALL,
                routine_types: RoutineType::ALL,
                ..ValueRanges::default()
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{BypassVersion, DeviceFamily};

    #[test]
    fn exact_lookup() {
        let map = lookup("ESW15-USA").unwrap();
        assert_eq!(map.model, ModelKind::Outlet15A);
        assert!(map.supports(Feature::Nightlight));
        assert_eq!(map.ranges.nightlight_modes, NIGHTLIGHT_ON_OFF_AUTO);
    }

    #[test]
    fn fallback_strips_region_suffix() {
        let map = lookup("LAP-V201S-WXYZ").unwrap();
        assert_eq!(map.model_name, "Vital 200S");

        // Case-insensitive prefix match
        let map = lookup("lap-c601s-zzz").unwrap();
        assert_eq!(map.model_name, "Core 600S");
    }

    #[test]
    fn single_dash_types_do_not_fall_back() {
        assert!(lookup("ESW99-USA").is_none());
        assert!(lookup("Unknown").is_none());
    }

    #[test]
    fn every_entry_is_consistent() {
        for entry in entries() {
            assert!(!entry.dev_types.is_empty(), "{} has no types", entry.model_name);
            for feature in entry.features.iter() {
                assert!(Feature::ALL.contains(&feature));
            }
            match entry.family() {
                DeviceFamily::Purifier => {
                    assert!(entry.ranges.fan_levels.is_some());
                    assert!(!entry.ranges.purifier_modes.is_empty());
                }
                DeviceFamily::Humidifier => {
                    assert!(entry.ranges.mist_levels.is_some());
                    assert_eq!(entry.ranges.target_humidity, Some(TARGET_HUMIDITY));
                }
                DeviceFamily::Fan => assert!(entry.ranges.fan_levels.is_some()),
                _ => {}
            }
            for dev_type in entry.dev_types {
                assert_eq!(lookup(dev_type).map(|m| m.model), Some(entry.model));
            }
        }
    }

    #[test]
    fn protocol_follows_model() {
        assert_eq!(lookup("LV-PUR131S").unwrap().bypass_version(), BypassVersion::V1);
        assert_eq!(lookup("Core200S").unwrap().bypass_version(), BypassVersion::V2);
        assert_eq!(lookup("ESL100CW").unwrap().bypass_version(), BypassVersion::V1);
    }

    #[test]
    fn superior_maps_auto_to_auto_pro() {
        let map = lookup("LEH-S601S-WUS").unwrap();
        assert_eq!(map.humidifier_mode_wire(HumidifierMode::Auto), Some("autoPro"));
        assert_eq!(map.humidifier_mode_from_wire("autoPro"), Some(HumidifierMode::Auto));
        assert!(map.supports(Feature::DryingMode));
    }

    #[test]
    fn timers_and_history_where_declared() {
        for timed in ["wifi-switch-1.3", "ESW10-USA", "ESO15-TB", "Core300S", "LAP-V201S-WUS"] {
            assert!(lookup(timed).unwrap().supports(Feature::Timer), "{timed}");
        }
        assert!(lookup("Classic200S").unwrap().supports(Feature::Timer));
        assert!(lookup("LUH-M101S-WUS").unwrap().supports(Feature::Timer));
        assert!(lookup("LTF-F422S-WUS").unwrap().supports(Feature::Timer));
        for untimed in ["ESW03-USA", "BSDOG01", "LEH-S601S-WUS", "LV-PUR131S", "ESWL01", "ESL100"] {
            assert!(!lookup(untimed).unwrap().supports(Feature::Timer), "{untimed}");
        }

        assert!(lookup("ESW03-USA").unwrap().supports(Feature::EnergyHistory));
        assert!(lookup("BSDOG01").unwrap().supports(Feature::EnergyMonitor));
        assert!(!lookup("BSDOG01").unwrap().supports(Feature::EnergyHistory));
    }

    #[test]
    fn legacy_outlet_has_exact_type() {
        let map = lookup("wifi-switch-1.3").unwrap();
        assert_eq!(map.model, ModelKind::Outlet7A);
        assert_eq!(map.family(), DeviceFamily::Outlet);
    }

    #[test]
    fn warm_mist_only_where_declared() {
        assert!(lookup("LUH-A602S-WUS").unwrap().supports(Feature::WarmMist));
        assert!(!lookup("Classic300S").unwrap().supports(Feature::WarmMist));
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Structural dispatch of result payloads.
//!
//! The cloud never tags which payload shape it sent. Each family instead
//! declares an ordered list of [`Candidate`] shapes; the first candidate
//! whose required keys are present and whose distinguishing predicates
//! hold is decoded. If none matches, decoding fails with
//! [`DecodeError::UnknownShape`], and a matched candidate that then fails
//! to parse is a [`DecodeError::MalformedPayload`], never a retry with
//! the next candidate.

use std::fmt;

use serde_json::{Map, Value};

use crate::capabilities::DeviceFamily;
use crate::error::DecodeError;

/// A predicate over one payload key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Key is present and not `null`.
    Present(&'static str),
    /// Key is missing or `null`.
    Absent(&'static str),
    /// Key holds a JSON object.
    Object(&'static str),
    /// Key holds a JSON array.
    Array(&'static str),
}

impl Presence {
    /// Evaluates the predicate against a payload object.
    #[must_use]
    pub fn holds(&self, payload: &Map<String, Value>) -> bool {
        match self {
            Self::Present(key) => payload.get(*key).is_some_and(|v| !v.is_null()),
            Self::Absent(key) => payload.get(*key).is_none_or(Value::is_null),
            Self::Object(key) => payload.get(*key).is_some_and(Value::is_object),
            Self::Array(key) => payload.get(*key).is_some_and(Value::is_array),
        }
    }
}

/// One registered payload shape of a family.
pub struct Candidate<T> {
    /// Name used in logs.
    pub name: &'static str,
    /// Keys that must all be present.
    pub required: &'static [&'static str],
    /// Extra predicates separating this shape from its neighbours.
    pub distinguishing: &'static [Presence],
    /// Parser for the matched payload.
    pub decode: fn(Value) -> Result<T, serde_json::Error>,
}

impl<T> Candidate<T> {
    /// Returns `true` if the payload has this shape.
    #[must_use]
    pub fn matches(&self, payload: &Map<String, Value>) -> bool {
        self.required
            .iter()
            .all(|key| Presence::Present(*key).holds(payload))
            && self.distinguishing.iter().all(|p| p.holds(payload))
    }
}

impl<T> fmt::Debug for Candidate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("distinguishing", &self.distinguishing)
            .finish_non_exhaustive()
    }
}

/// A family-level result union with its ordered candidate shapes.
pub trait FamilyResult: Sized + 'static {
    /// Family whose payloads this type decodes.
    const FAMILY: DeviceFamily;

    /// Candidate shapes in priority order.
    fn candidates() -> &'static [Candidate<Self>];
}

/// Selects and decodes the first matching candidate.
///
/// # Errors
///
/// Returns `DecodeError::UnknownShape` when the payload is not an object
/// or no candidate matches, and `DecodeError::MalformedPayload` when the
/// matched candidate fails to parse.
pub fn dispatch<T>(
    family: DeviceFamily,
    candidates: &[Candidate<T>],
    payload: Value,
) -> Result<T, DecodeError> {
    let Value::Object(fields) = &payload else {
        return Err(DecodeError::UnknownShape { family });
    };
    let Some(candidate) = candidates.iter().find(|c| c.matches(fields)) else {
        tracing::debug!(
            family = %family,
            keys = ?fields.keys().collect::<Vec<_>>(),
            "No result shape matched"
        );
        return Err(DecodeError::UnknownShape { family });
    };
    tracing::trace!(family = %family, shape = candidate.name, "Matched result shape");
    (candidate.decode)(payload).map_err(DecodeError::MalformedPayload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum Probe {
        Tagged(i64),
        Plain(i64),
    }

    static PROBE_SHAPES: [Candidate<Probe>; 2] = [
        Candidate {
            name: "tagged",
            required: &["value"],
            distinguishing: &[Presence::Object("extra")],
            decode: |v| serde_json::from_value::<i64>(v["value"].clone()).map(Probe::Tagged),
        },
        Candidate {
            name: "plain",
            required: &["value"],
            distinguishing: &[Presence::Absent("extra")],
            decode: |v| serde_json::from_value::<i64>(v["value"].clone()).map(Probe::Plain),
        },
    ];

    #[test]
    fn first_match_wins() {
        let decoded = dispatch(
            DeviceFamily::Fan,
            &PROBE_SHAPES,
            json!({"value": 1, "extra": {}}),
        )
        .unwrap();
        assert_eq!(decoded, Probe::Tagged(1));

        let decoded = dispatch(DeviceFamily::Fan, &PROBE_SHAPES, json!({"value": 2})).unwrap();
        assert_eq!(decoded, Probe::Plain(2));
    }

    #[test]
    fn no_match_is_unknown_shape() {
        let err = dispatch(
            DeviceFamily::Fan,
            &PROBE_SHAPES,
            json!({"value": 1, "extra": 5}),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::UnknownShape {
                family: DeviceFamily::Fan
            }
        ));

        let err = dispatch(DeviceFamily::Fan, &PROBE_SHAPES, json!([1, 2])).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownShape { .. }));
    }

    #[test]
    fn matched_shape_that_fails_is_malformed() {
        let err = dispatch(DeviceFamily::Fan, &PROBE_SHAPES, json!({"value": "x"})).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedPayload(_)));
    }

    #[test]
    fn null_counts_as_absent() {
        let payload = json!({"a": null, "b": 1});
        let Value::Object(fields) = payload else {
            unreachable!()
        };
        assert!(Presence::Absent("a").holds(&fields));
        assert!(!Presence::Present("a").holds(&fields));
        assert!(Presence::Present("b").holds(&fields));
        assert!(!Presence::Object("b").holds(&fields));
    }
}

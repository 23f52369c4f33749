// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Result envelope parsing and code checks.
//!
//! V1 envelopes carry the payload in `result`, or inline next to `code`
//! and `msg` on older endpoints. V2 envelopes nest twice: the outer
//! `code` is the cloud's status and `result.code` the device firmware's,
//! with the payload in `result.result`. Legacy REST endpoints skip the
//! envelope and answer with a bare object or list.

use serde_json::{Map, Value};

use crate::capabilities::BypassVersion;
use crate::error::{ApiError, DecodeError, Result};

use super::ErrorKind;

use super::codes::code_to_error;

const ENVELOPE_KEYS: [&str; 3] = ["traceId", "code", "msg"];

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice::<Value>(bytes).map_err(DecodeError::MalformedPayload)? {
        Value::Object(map) => Ok(map),
        _ => Err(DecodeError::MissingField("code".to_string()).into()),
    }
}

fn read_code(fields: &Map<String, Value>) -> Option<i64> {
    match fields.get("code")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn check_code(fields: &Map<String, Value>, required: bool) -> Result<()> {
    let Some(code) = read_code(fields) else {
        if required {
            return Err(DecodeError::MissingField("code".to_string()).into());
        }
        return Ok(());
    };
    if code == 0 {
        return Ok(());
    }
    let message = fields.get("msg").and_then(Value::as_str);
    Err(code_to_error(code, message))
}

fn strip_envelope_keys(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in ENVELOPE_KEYS {
        fields.remove(key);
    }
    fields
}

/// Verifies result codes and returns the family payload.
///
/// Command acknowledgements with no payload yield an empty object.
///
/// # Errors
///
/// - `DecodeError::MalformedPayload` if the body is not JSON
/// - `DecodeError::MissingField` if the outer envelope has no `code`
/// - `AuthError` or `ApiError` for a nonzero outer or inner code
pub fn check_envelope(bytes: &[u8], version: BypassVersion) -> Result<Value> {
    let mut outer = parse_object(bytes)?;
    check_code(&outer, true)?;
    let result = outer.remove("result");

    let payload = match version {
        BypassVersion::V1 => match result {
            Some(Value::Object(inner)) => {
                check_code(&inner, false)?;
                strip_envelope_keys(inner)
            }
            _ => strip_envelope_keys(outer),
        },
        BypassVersion::V2 => match result {
            Some(Value::Object(mut inner)) => {
                check_code(&inner, false)?;
                match inner.remove("result") {
                    Some(Value::Object(payload)) => payload,
                    _ => Map::new(),
                }
            }
            _ => Map::new(),
        },
    };
    Ok(Value::Object(payload))
}

/// Checks a legacy REST reply and returns it whole.
///
/// Failures carry an `error` member, occasionally a nonzero `code`. An
/// empty body yields `null`.
///
/// # Errors
///
/// - `DecodeError::MalformedPayload` if the body is not JSON
/// - `AuthError` or `ApiError` for a reported failure
pub fn check_legacy(bytes: &[u8]) -> Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::MalformedPayload)?;
    if let Value::Object(fields) = &value {
        if let Some(error) = fields.get("error") {
            let code = error.as_object().and_then(read_code).filter(|c| *c != 0);
            let message = error
                .get("msg")
                .and_then(Value::as_str)
                .or_else(|| error.as_str());
            return Err(match code {
                Some(code) => code_to_error(code, message),
                None => ApiError {
                    code: 0,
                    kind: ErrorKind::BadResponse,
                    message: message.unwrap_or("legacy endpoint reported an error").to_string(),
                    device_online: None,
                }
                .into(),
            });
        }
        check_code(fields, false)?;
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, AuthError, Error};
    use crate::response::ErrorKind;
    use serde_json::json;

    fn bytes(value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    #[test]
    fn v2_payload_is_doubly_nested() {
        let body = json!({
            "traceId": "1", "code": 0, "msg": "request success",
            "result": {"traceId": "1", "code": 0, "result": {"enabled": true}}
        });
        let payload = check_envelope(&bytes(&body), BypassVersion::V2).unwrap();
        assert_eq!(payload, json!({"enabled": true}));
    }

    #[test]
    fn v2_inner_code_is_checked() {
        let body = json!({
            "code": 0, "msg": "",
            "result": {"code": -11_300_000, "msg": "device offline"}
        });
        let err = check_envelope(&bytes(&body), BypassVersion::V2).unwrap_err();
        assert!(matches!(
            err,
            Error::Api(ApiError {
                code: -11_300_000,
                kind: ErrorKind::DeviceOffline,
                ..
            })
        ));
    }

    #[test]
    fn outer_code_short_circuits() {
        let body = json!({"code": -11_001_000, "msg": "token expired", "result": {"bogus": 1}});
        let err = check_envelope(&bytes(&body), BypassVersion::V2).unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::TokenExpired { .. })));
    }

    #[test]
    fn v1_result_object() {
        let body = json!({"code": 0, "msg": "", "result": {"light": {"action": "on"}}});
        let payload = check_envelope(&bytes(&body), BypassVersion::V1).unwrap();
        assert_eq!(payload, json!({"light": {"action": "on"}}));
    }

    #[test]
    fn v1_flat_envelope() {
        let body = json!({
            "traceId": "1", "code": 0, "msg": null,
            "deviceStatus": "on", "connectionStatus": "online"
        });
        let payload = check_envelope(&bytes(&body), BypassVersion::V1).unwrap();
        assert_eq!(payload, json!({"deviceStatus": "on", "connectionStatus": "online"}));
    }

    #[test]
    fn ack_without_payload_is_empty() {
        let body = json!({"code": 0, "msg": "", "result": {"code": 0}});
        let payload = check_envelope(&bytes(&body), BypassVersion::V2).unwrap();
        assert_eq!(payload, json!({}));
    }

    #[test]
    fn malformed_and_missing_code() {
        let err = check_envelope(b"not json", BypassVersion::V1).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::MalformedPayload(_))));

        let err = check_envelope(&bytes(&json!({"result": {}})), BypassVersion::V1).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::MissingField(_))));
    }

    #[test]
    fn legacy_replies_pass_through() {
        let list = json!([{"timerID": "7", "counterTimer": 60}]);
        assert_eq!(check_legacy(&bytes(&list)).unwrap(), list);
        assert_eq!(check_legacy(b"").unwrap(), Value::Null);

        let detail = json!({"deviceStatus": "on", "power": "1:2"});
        assert_eq!(check_legacy(&bytes(&detail)).unwrap(), detail);
    }

    #[test]
    fn legacy_error_member_fails() {
        let body = json!({"error": {"code": -11_300_000, "msg": "offline"}});
        let err = check_legacy(&bytes(&body)).unwrap_err();
        assert!(err.marks_device_offline());

        let err = check_legacy(&bytes(&json!({"error": "bad request"}))).unwrap_err();
        assert!(matches!(
            err,
            Error::Api(ApiError {
                kind: ErrorKind::BadResponse,
                ..
            })
        ));
    }

    #[test]
    fn string_codes_are_accepted() {
        let body = json!({"code": "0", "result": {"ok": true}});
        assert!(check_envelope(&bytes(&body), BypassVersion::V1).is_ok());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalogue of cloud API result codes.
//!
//! Codes are matched exactly first, then by their thousands bucket
//! (`-11300123` falls back to `-11300000`), and anything left over is
//! classified as [`ErrorKind::Unknown`] with the raw code preserved.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, AuthError, Error};

/// Stable classification of nonzero API result codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Credentials were rejected.
    Auth,
    /// The session token is no longer valid.
    Token,
    /// Too many requests.
    RateLimit,
    /// Cloud-side failure.
    Server,
    /// The request itself was malformed.
    Request,
    /// The device reported a failure.
    Device,
    /// Account or device configuration problem.
    Config,
    /// The device is not connected.
    DeviceOffline,
    /// The account belongs to another region.
    CrossRegion,
    /// The response could not be interpreted.
    BadResponse,
    /// Code not in the catalogue.
    Unknown,
}

impl ErrorKind {
    /// Returns a lowercase description.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Token => "token",
            Self::RateLimit => "rate limit",
            Self::Server => "server",
            Self::Request => "request",
            Self::Device => "device",
            Self::Config => "config",
            Self::DeviceOffline => "device offline",
            Self::CrossRegion => "cross region",
            Self::BadResponse => "bad response",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue entry for one result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Upper-case identifier.
    pub name: &'static str,
    /// Classification.
    pub kind: ErrorKind,
    /// Human-readable description.
    pub message: &'static str,
    /// Whether the code says anything about device reachability.
    pub device_online: Option<bool>,
    /// The device needs attention (sensor fault, powered off).
    pub critical: bool,
}

const fn info(
    name: &'static str,
    kind: ErrorKind,
    message: &'static str,
    device_online: Option<bool>,
) -> ErrorInfo {
    ErrorInfo {
        name,
        kind,
        message,
        device_online,
        critical: false,
    }
}

const fn critical(name: &'static str, message: &'static str) -> ErrorInfo {
    ErrorInfo {
        name,
        kind: ErrorKind::Device,
        message,
        device_online: Some(true),
        critical: true,
    }
}

/// The timer named in the request no longer exists.
pub(crate) const TIMER_NOT_EXIST: i64 = -11_500_000;
/// A new timer clashes with existing ones.
pub(crate) const TIMER_CONFLICT: i64 = -11_501_000;

const UNKNOWN: ErrorInfo = info("UNKNOWN", ErrorKind::Unknown, "unknown error", None);

const OFFLINE: Option<bool> = Some(false);

static CODES: &[(i64, ErrorInfo)] = &[
    (-11_001_000, info("TOKEN_EXPIRED", ErrorKind::Token, "token expired", None)),
    (-11_201_000, info("PASSWORD_ERROR", ErrorKind::Auth, "invalid password", None)),
    (-11_202_000, info("ACCOUNT_NOT_EXIST", ErrorKind::Auth, "account does not exist", None)),
    (-11_203_000, info("ACCOUNT_EXIST", ErrorKind::Auth, "account already exists", None)),
    (-11_200_000, info("ACCOUNT_FORMAT_ERROR", ErrorKind::Config, "invalid account format", None)),
    (-11_003_000, info("REQUEST_HIGH", ErrorKind::RateLimit, "request rate too high", None)),
    (-16_906_000, info("REQUEST_TOO_FREQUENT", ErrorKind::RateLimit, "requests too frequent", None)),
    (-11_004_000, info("METHOD_NOT_FOUND", ErrorKind::Request, "method not found", None)),
    (-11_005_000, info("RESOURCE_NOT_EXIST", ErrorKind::Request, "resource does not exist", OFFLINE)),
    (-11_100_000, info("DATABASE_FAILED", ErrorKind::Server, "database failure", None)),
    (-11_101_000, info("DATABASE_FAILED", ErrorKind::Server, "database failure", None)),
    (-11_102_000, info("INTERNAL_ERROR", ErrorKind::Server, "internal server error", None)),
    (-11_103_000, info("SERVER_BUSY", ErrorKind::Server, "server busy", None)),
    (-11_104_000, info("SERVER_TIMEOUT", ErrorKind::Server, "server timeout", None)),
    (-11_260_022, info("CROSS_REGION_ERROR", ErrorKind::CrossRegion, "account registered in another region", None)),
    (-11_300_000, info("DEVICE_OFFLINE", ErrorKind::DeviceOffline, "device offline", OFFLINE)),
    (-11_300_027, info("AIRPURGE_OFFLINE", ErrorKind::DeviceOffline, "device offline", OFFLINE)),
    (11, info("DEVICE_OFFLINE", ErrorKind::DeviceOffline, "device offline", OFFLINE)),
    (4_041_004, info("DEVICE_OFFLINE", ErrorKind::DeviceOffline, "device offline", OFFLINE)),
    (-11_301_000, info("DEVICE_NOT_EXIST", ErrorKind::Config, "device does not exist", OFFLINE)),
    (-11_302_000, info("DEVICE_TIMEOUT", ErrorKind::Device, "device timed out", OFFLINE)),
    (-11_305_000, info("CONFIG_MODULE_NOT_EXIST", ErrorKind::Request, "config module does not exist", None)),
    (-11_306_000, info("DEVICE_BOUND", ErrorKind::Config, "device bound to another account", None)),
    (-11_307_000, info("UUID_NOT_EXIST", ErrorKind::Device, "device uuid not found", OFFLINE)),
    (TIMER_NOT_EXIST, info("TIMER_NOT_EXIST", ErrorKind::Device, "timer does not exist", None)),
    (TIMER_CONFLICT, info("TIMER_CONFLICT", ErrorKind::Device, "timer conflict", None)),
    (11_005_000, critical("BYPASS_DEVICE_IS_OFF", "device is powered off")),
    (12_101_000, critical("SENSOR_ERROR", "sensor error")),
    (12_102_000, critical("SENSOR_ERROR", "motor error")),
    (12_103_000, critical("SENSOR_ERROR", "filter error")),
    (88_888_888, info("NETWORK_DISABLE", ErrorKind::Server, "network disabled", None)),
    (77_777_777, info("NETWORK_TIMEOUT", ErrorKind::Server, "network timeout", None)),
    (-999_999_999, UNKNOWN),
];

/// Looks up a nonzero result code.
///
/// # Examples
///
/// ```
/// use vesync_lib::response::{ErrorKind, lookup_code};
///
/// assert_eq!(lookup_code(-11_001_000).kind, ErrorKind::Token);
/// // Falls back to the thousands bucket
/// assert_eq!(lookup_code(-11_300_123).kind, ErrorKind::DeviceOffline);
/// assert_eq!(lookup_code(42).kind, ErrorKind::Unknown);
/// ```
#[must_use]
pub fn lookup_code(code: i64) -> ErrorInfo {
    let find = |wanted: i64| {
        CODES
            .iter()
            .find(|(c, _)| *c == wanted)
            .map(|(_, info)| *info)
    };
    find(code)
        .or_else(|| find((code / 1000) * 1000))
        .unwrap_or(UNKNOWN)
}

/// Converts a nonzero result code into the library error it represents.
///
/// Token codes become [`AuthError::TokenExpired`] and credential codes
/// [`AuthError::InvalidCredentials`] so callers can tell them apart from
/// generic API failures. The server message wins over the catalogue text
/// when one was sent.
#[must_use]
pub fn code_to_error(code: i64, message: Option<&str>) -> Error {
    let info = lookup_code(code);
    let message = message
        .filter(|m| !m.is_empty())
        .map_or_else(|| info.message.to_string(), str::to_string);
    match info.kind {
        ErrorKind::Token => AuthError::TokenExpired { code }.into(),
        ErrorKind::Auth => AuthError::InvalidCredentials { code, message }.into(),
        kind => ApiError {
            code,
            kind,
            message,
            device_online: info.device_online,
        }
        .into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_codes() {
        let info = lookup_code(-11_260_022);
        assert_eq!(info.name, "CROSS_REGION_ERROR");
        assert_eq!(info.kind, ErrorKind::CrossRegion);
        assert_eq!(lookup_code(11).kind, ErrorKind::DeviceOffline);
    }

    #[test]
    fn bucket_fallback() {
        let info = lookup_code(-11_302_456);
        assert_eq!(info.name, "DEVICE_TIMEOUT");
        assert_eq!(info.device_online, Some(false));
    }

    #[test]
    fn unknown_codes() {
        let info = lookup_code(-1);
        assert_eq!(info.kind, ErrorKind::Unknown);
        assert_eq!(info.device_online, None);
    }

    #[test]
    fn critical_device_codes() {
        let info = lookup_code(11_005_000);
        assert!(info.critical);
        assert_eq!(info.device_online, Some(true));
    }

    #[test]
    fn token_code_is_auth_error() {
        let err = code_to_error(-11_001_000, Some("token expired"));
        assert!(matches!(
            err,
            Error::Auth(AuthError::TokenExpired { code: -11_001_000 })
        ));
    }

    #[test]
    fn password_code_is_auth_error() {
        let err = code_to_error(-11_201_000, None);
        match err {
            Error::Auth(AuthError::InvalidCredentials { message, .. }) => {
                assert_eq!(message, "invalid password");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn other_codes_keep_raw_code() {
        let err = code_to_error(-11_300_555, Some(""));
        match err {
            Error::Api(api) => {
                assert_eq!(api.code, -11_300_555);
                assert_eq!(api.kind, ErrorKind::DeviceOffline);
                assert_eq!(api.message, "device offline");
                assert_eq!(api.device_online, Some(false));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

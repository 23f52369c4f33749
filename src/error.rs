// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `vesync_lib` library.
//!
//! Failures are split by where they originate: the transport, the
//! authenticated session, the cloud API's own result codes, response
//! decoding, and caller-side validation that happens before any request
//! is built.

use thiserror::Error;

use crate::capabilities::{DeviceFamily, Feature};
use crate::response::ErrorKind;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Network, timeout or non-2xx HTTP failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The session is missing, invalid or expired.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The cloud API answered with a nonzero result code.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The response could not be decoded into a known shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The caller supplied an invalid value or an unsupported operation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A command was attempted while the device is not online.
    #[error("device {name} is offline")]
    Offline {
        /// Display name of the device.
        name: String,
    },

    /// Device was not found in the fleet.
    #[error("device not found")]
    DeviceNotFound,
}

impl Error {
    /// Returns `true` if the server reported the device as unreachable.
    ///
    /// Device-offline codes are the only failures that change a device's
    /// connection status during a refresh.
    #[must_use]
    pub fn marks_device_offline(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError {
                device_online: Some(false),
                ..
            })
        )
    }

    /// Returns `true` if this error requires logging in again.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Errors raised below the API layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the cloud failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP {status} - {reason}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase.
        reason: String,
    },

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to the authenticated session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The server rejected the session token.
    #[error("token expired (code {code})")]
    TokenExpired {
        /// Raw API code.
        code: i64,
    },

    /// Login was rejected.
    #[error("invalid credentials (code {code}): {message}")]
    InvalidCredentials {
        /// Raw API code.
        code: i64,
        /// Message returned by the server.
        message: String,
    },

    /// The server answered HTTP 401.
    #[error("unauthorized")]
    Unauthorized,

    /// No session has been established yet.
    #[error("not logged in")]
    NotLoggedIn,
}

/// An application-level error reported in the response `code` field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("code {code} ({kind}): {message}")]
pub struct ApiError {
    /// Raw code as returned by the server.
    pub code: i64,
    /// Stable classification of the code.
    pub kind: ErrorKind,
    /// Server message, or the catalogue description when none was sent.
    pub message: String,
    /// Whether the code implies the device is reachable, if known.
    pub device_online: Option<bool>,
}

/// Errors raised while decoding a response body.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was not valid JSON, or a matched shape failed to parse.
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// A required envelope field is missing.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// The payload matched none of the registered shapes for the family.
    #[error("payload matches no known {family} result shape")]
    UnknownShape {
        /// Family whose shapes were tried.
        family: DeviceFamily,
    },
}

/// Errors detected before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A numeric value is outside the allowed range.
    #[error("{field} value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the validated field.
        field: &'static str,
        /// Minimum allowed value.
        min: i64,
        /// Maximum allowed value.
        max: i64,
        /// The actual value that was provided.
        actual: i64,
    },

    /// A value is not one of the choices the device accepts.
    #[error("invalid {field}: {value}")]
    InvalidChoice {
        /// Name of the validated field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The device does not declare the feature the operation needs.
    #[error("device does not support {feature}")]
    UnsupportedFeature {
        /// The missing feature.
        feature: Feature,
    },

    /// The operation is not valid in the device's current state.
    #[error("not controllable: {reason}")]
    NotControllable {
        /// Why the operation was refused.
        reason: String,
    },

    /// A required value was not provided.
    #[error("missing value for {field}")]
    MissingValue {
        /// Name of the missing field.
        field: &'static str,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

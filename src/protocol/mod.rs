// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport abstraction and request plumbing for the VeSync cloud.
//!
//! - [`Transport`]: the raw `perform_request` primitive
//! - [`HttpTransport`]: the reqwest-backed implementation (feature `http`)
//! - [`RequestBuilder`]: builds bypass V1/V2, legacy, energy history,
//!   login and device list requests
//! - [`CloudClient`]: pairs a transport with the session and maps HTTP
//!   status failures to errors

mod client;
#[cfg(feature = "http")]
mod http;
#[cfg(test)]
pub(crate) mod recording;
pub mod request;

pub use client::CloudClient;
#[cfg(feature = "http")]
pub use http::{HttpConfig, HttpTransport};
pub use request::{DeviceIdentity, RequestBuilder, RequestEnvelope, Session, defaults};

use std::fmt;

use async_trait::async_trait;

use crate::error::TransportError;

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET.
    Get,
    /// POST.
    Post,
    /// PUT.
    Put,
    /// DELETE.
    Delete,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw reply of a transport call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Reason phrase, if the transport knows one.
    pub reason: Option<String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response without a reason phrase.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            reason: None,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Executes one HTTP exchange with the cloud.
///
/// Implementations must not retry. The configured timeout is the only
/// cancellation mechanism; a timeout is reported as
/// [`TransportError::Timeout`].
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Performs a request and returns the status and body.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if no response was received.
    async fn perform_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<RawResponse, TransportError>;
}

/// Headers sent with every JSON request.
pub const JSON_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", defaults::CONTENT_TYPE),
    ("User-Agent", defaults::USER_AGENT),
];

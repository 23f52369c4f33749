// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! reqwest-backed transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::TransportError;
use crate::protocol::{HttpMethod, RawResponse, Transport};

// ============================================================================
// HttpConfig
// ============================================================================

/// Connection parameters for the cloud API.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vesync_lib::protocol::HttpConfig;
///
/// let config = HttpConfig::new("https://smartapi.vesync.eu")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "https://smartapi.vesync.eu");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    base_url: String,
    timeout: Duration,
}

impl HttpConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

    /// Creates a configuration for the given base URL.
    ///
    /// A trailing slash is removed.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpTransport` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the URL has no scheme or the HTTP client cannot be
    /// created.
    pub fn into_transport(self) -> Result<HttpTransport, TransportError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(TransportError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(TransportError::Http)?;

        Ok(HttpTransport {
            base_url: self.base_url,
            timeout: self.timeout,
            client,
        })
    }
}

// ============================================================================
// HttpTransport
// ============================================================================

/// [`Transport`] over HTTPS with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl HttpTransport {
    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX))
        } else if err.is_connect() {
            TransportError::ConnectionFailed(err.to_string())
        } else {
            TransportError::Http(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn perform_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url(path);

        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        let mut request = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url).body(body),
            HttpMethod::Put => self.client.put(&url).body(body),
            HttpMethod::Delete => self.client.delete(&url),
        };
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Received HTTP response");

        Ok(RawResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpConfig::new("https://smartapi.vesync.com/");
        assert_eq!(config.base_url(), "https://smartapi.vesync.com");
        assert_eq!(config.timeout(), Duration::from_secs(8));
    }

    #[test]
    fn config_with_timeout() {
        let config = HttpConfig::new("http://localhost").with_timeout(Duration::from_secs(30));
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn into_transport_requires_scheme() {
        let err = HttpConfig::new("smartapi.vesync.com")
            .into_transport()
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress(_)));
    }

    #[test]
    fn into_transport_builds_urls() {
        let transport = HttpConfig::new("http://127.0.0.1:8080")
            .into_transport()
            .unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:8080");
        assert_eq!(
            transport.url("/cloud/v1/user/login"),
            "http://127.0.0.1:8080/cloud/v1/user/login"
        );
    }
}

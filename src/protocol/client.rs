// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Session-aware cloud client shared by the manager and its devices.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use crate::capabilities::BypassVersion;
use crate::error::{AuthError, Result, TransportError};
use crate::protocol::request::{DeviceIdentity, RequestBuilder, RequestEnvelope, Session};
use crate::protocol::{HttpMethod, JSON_HEADERS, Transport};

/// Sends envelopes through a [`Transport`] on behalf of one account.
///
/// The session is set by login and read by every device call.
#[derive(Debug)]
pub struct CloudClient {
    transport: Arc<dyn Transport>,
    builder: RequestBuilder,
    session: RwLock<Option<Session>>,
}

impl CloudClient {
    /// Creates a client without a session.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, builder: RequestBuilder) -> Self {
        Self {
            transport,
            builder,
            session: RwLock::new(None),
        }
    }

    /// Returns the request builder.
    #[must_use]
    pub fn builder(&self) -> &RequestBuilder {
        &self.builder
    }

    /// Returns a copy of the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.read().clone()
    }

    /// Replaces the session.
    pub fn set_session(&self, session: Session) {
        *self.session.write() = Some(session);
    }

    /// Returns the current session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` if no session is set.
    pub fn require_session(&self) -> Result<Session> {
        self.session().ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Sends an envelope and returns the body of a 2xx reply.
    ///
    /// # Errors
    ///
    /// - `AuthError::Unauthorized` for HTTP 401
    /// - `TransportError::HttpStatus` for any other non-2xx status
    /// - the transport's own error if no reply was received
    pub async fn send(&self, envelope: &RequestEnvelope) -> Result<Vec<u8>> {
        tracing::debug!(method = %envelope.method, path = %envelope.path, "Sending cloud request");

        let mut headers: Vec<(&str, &str)> = JSON_HEADERS.to_vec();
        headers.extend(envelope.headers.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self
            .transport
            .perform_request(
                envelope.method,
                &envelope.path,
                &headers,
                envelope.to_bytes(),
            )
            .await?;

        if response.status == 401 {
            return Err(AuthError::Unauthorized.into());
        }
        if !response.is_success() {
            return Err(TransportError::HttpStatus {
                status: response.status,
                reason: response.reason.unwrap_or_else(|| "Unknown".to_string()),
            }
            .into());
        }

        tracing::debug!(
            path = %envelope.path,
            bytes = response.body.len(),
            "Received cloud response"
        );
        Ok(response.body)
    }

    /// Builds and sends a device call.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session, otherwise the
    /// errors of [`send`](Self::send).
    pub async fn call_device(
        &self,
        version: BypassVersion,
        identity: &DeviceIdentity,
        method: &str,
        data: Value,
    ) -> Result<Vec<u8>> {
        let session = self.require_session()?;
        let envelope = match version {
            BypassVersion::V1 => self.builder.bypass_v1(&session, identity, method, data),
            BypassVersion::V2 => self.builder.bypass_v2(&session, identity, method, data),
        };
        self.send(&envelope).await
    }

    /// Builds and sends a bypass V1 call to an endpoint named apart from
    /// its method.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session, otherwise the
    /// errors of [`send`](Self::send).
    pub async fn call_device_at(
        &self,
        identity: &DeviceIdentity,
        endpoint: &str,
        method: &str,
        data: Value,
    ) -> Result<Vec<u8>> {
        let session = self.require_session()?;
        let envelope = self
            .builder
            .bypass_v1_at(&session, identity, endpoint, method, data);
        self.send(&envelope).await
    }

    /// Requests an energy history period.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session, otherwise the
    /// errors of [`send`](Self::send).
    pub async fn call_energy_history(
        &self,
        identity: &DeviceIdentity,
        method: &str,
    ) -> Result<Vec<u8>> {
        let session = self.require_session()?;
        let envelope = self.builder.energy_history(&session, identity, method);
        self.send(&envelope).await
    }

    /// Sends a legacy REST call authenticated by headers.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session, otherwise the
    /// errors of [`send`](Self::send).
    pub async fn call_legacy(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> Result<Vec<u8>> {
        let session = self.require_session()?;
        let envelope = self.builder.legacy(&session, method, path, body);
        self.send(&envelope).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::protocol::RawResponse;
    use crate::protocol::recording::RecordingTransport;
    use serde_json::json;

    fn session() -> Session {
        Session {
            token: "tk".into(),
            account_id: "1".into(),
            country_code: "US".into(),
        }
    }

    #[tokio::test]
    async fn call_without_session_sends_nothing() {
        let transport = Arc::new(RecordingTransport::new());
        let client = CloudClient::new(transport.clone(), RequestBuilder::new());
        let err = client
            .call_device(BypassVersion::V2, &DeviceIdentity::default(), "getSwitch", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::NotLoggedIn)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn http_401_is_unauthorized() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(RawResponse::new(401, "{}"));
        let client = CloudClient::new(transport.clone(), RequestBuilder::new());
        client.set_session(session());
        let err = client
            .call_device(BypassVersion::V1, &DeviceIdentity::default(), "deviceDetail", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Auth(AuthError::Unauthorized)));
        assert!(err.requires_login());
    }

    #[tokio::test]
    async fn non_2xx_is_http_status() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_response(RawResponse::new(503, ""));
        let client = CloudClient::new(transport.clone(), RequestBuilder::new());
        client.set_session(session());
        let err = client
            .call_device(BypassVersion::V2, &DeviceIdentity::default(), "getSwitch", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportError::HttpStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn records_request_body() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(json!({"code": 0, "result": {"code": 0, "result": {}}}));
        let client = CloudClient::new(transport.clone(), RequestBuilder::new());
        client.set_session(session());
        let identity = DeviceIdentity {
            cid: "c1".into(),
            config_module: "m".into(),
            ..Default::default()
        };
        client
            .call_device(BypassVersion::V2, &identity, "setSwitch", json!({"enabled": true}))
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/cloud/v2/deviceManaged/bypassV2");
        assert_eq!(calls[0].body["payload"]["data"]["enabled"], true);
        assert_eq!(calls[0].body["token"], "tk");
    }

    #[tokio::test]
    async fn legacy_call_keeps_method_and_headers() {
        let transport = Arc::new(RecordingTransport::new());
        transport.push_json(json!({"deviceStatus": "on"}));
        let client = CloudClient::new(transport.clone(), RequestBuilder::new());
        client.set_session(session());
        client
            .call_legacy(HttpMethod::Get, "/v1/device/c1/detail", None)
            .await
            .unwrap();

        let call = &transport.calls()[0];
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.path, "/v1/device/c1/detail");
        assert_eq!(call.body, Value::Null);
        assert!(call.headers.contains(&("tk".to_string(), "tk".to_string())));
        assert!(
            call.headers
                .iter()
                .any(|(name, _)| name == "Content-Type")
        );
    }
}

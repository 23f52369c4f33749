// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport that records calls and replays queued replies.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::TransportError;
use crate::protocol::{HttpMethod, RawResponse, Transport};

/// One recorded call.
#[derive(Debug, Clone)]
pub(crate) struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

#[derive(Debug)]
enum Reply {
    Response(RawResponse),
    Timeout,
}

/// Test double for [`Transport`].
///
/// Replies are served in FIFO order; an empty queue answers with a bare
/// success envelope.
#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<VecDeque<Reply>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_response(&self, response: RawResponse) {
        self.replies.lock().push_back(Reply::Response(response));
    }

    pub(crate) fn push_json(&self, body: Value) {
        self.push_response(RawResponse::new(200, body.to_string()));
    }

    pub(crate) fn push_timeout(&self) {
        self.replies.lock().push_back(Reply::Timeout);
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub(crate) fn last_body(&self) -> Option<Value> {
        self.calls.lock().last().map(|c| c.body.clone())
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn perform_request(
        &self,
        method: HttpMethod,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<RawResponse, TransportError> {
        self.calls.lock().push(RecordedCall {
            method,
            path: path.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });
        match self.replies.lock().pop_front() {
            Some(Reply::Response(response)) => Ok(response),
            Some(Reply::Timeout) => Err(TransportError::Timeout(8000)),
            None => Ok(RawResponse::new(
                200,
                r#"{"code":0,"msg":"request success","result":{"code":0,"result":{}}}"#,
            )),
        }
    }
}

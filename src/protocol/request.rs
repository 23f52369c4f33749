// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request envelope construction.
//!
//! Every request body is assembled from four tiers, each overriding the
//! previous on key collision:
//!
//! 1. static defaults (app version, phone brand, trace id)
//! 2. session fields (account id, token, time zone, country)
//! 3. device identity (cid, config module, region, uuid)
//! 4. per-call data
//!
//! Bypass V1 merges the call data flat into the body. Bypass V2 nests it
//! under `payload.data` and sets the outer method to `bypassV2`.
//!
//! Legacy requests, used by the oldest outlets, are plain REST calls that
//! carry the session in headers instead of the body.

use serde_json::{Map, Value, json};

use super::HttpMethod;

/// Static request values.
pub mod defaults {
    /// Reported app version.
    pub const APP_VERSION: &str = "5.6.60";
    /// Reported phone brand.
    pub const PHONE_BRAND: &str = "pyvesync";
    /// Reported phone OS.
    pub const PHONE_OS: &str = "Android";
    /// User type sent on login.
    pub const USER_TYPE: &str = "1";
    /// Default `acceptLanguage`.
    pub const ACCEPT_LANGUAGE: &str = "en";
    /// Default `timeZone`.
    pub const TIME_ZONE: &str = "America/New_York";
    /// Debug flag sent on every call.
    pub const DEBUG_MODE: bool = false;
    /// `User-Agent` header.
    pub const USER_AGENT: &str = "okhttp/3.12.1";
    /// `Content-Type` header.
    pub const CONTENT_TYPE: &str = "application/json; charset=UTF-8";
    /// Descriptors requested per device list page.
    pub const DEVICE_LIST_PAGE_SIZE: u32 = 100;

    /// Login path.
    pub const LOGIN_PATH: &str = "/cloud/v1/user/login";
    /// Device list path.
    pub const DEVICE_LIST_PATH: &str = "/cloud/v1/deviceManaged/devices";
    /// Prefix of bypass V1 endpoints.
    pub const BYPASS_V1_PREFIX: &str = "/cloud/v1/deviceManaged/";
    /// Bypass V2 path.
    pub const BYPASS_V2_PATH: &str = "/cloud/v2/deviceManaged/bypassV2";
    /// Prefix of energy history endpoints.
    pub const ENERGY_HISTORY_PREFIX: &str = "/cloud/v1/device/";
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Session token.
    pub token: String,
    /// Account identifier.
    pub account_id: String,
    /// Two-letter country code of the account.
    pub country_code: String,
}

/// Identity fields a device contributes to each request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceIdentity {
    /// Cloud identifier, also sent as `deviceId`.
    pub cid: String,
    /// Configuration module, also sent as `configModel`.
    pub config_module: String,
    /// Registration region, omitted when unknown.
    pub device_region: Option<String>,
    /// Device UUID, omitted when unknown.
    pub uuid: Option<String>,
}

/// A finished request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the API base URL.
    pub path: String,
    /// Headers sent on top of the JSON defaults.
    pub headers: Vec<(&'static str, String)>,
    /// JSON body; `null` sends no body.
    pub body: Value,
}

impl RequestEnvelope {
    fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: Vec::new(),
            body,
        }
    }

    /// Serializes the body.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.body.is_null() {
            return Vec::new();
        }
        // Serializing a `Value` cannot fail.
        serde_json::to_vec(&self.body).unwrap_or_default()
    }
}

/// Builds request envelopes.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vesync_lib::protocol::{DeviceIdentity, RequestBuilder, Session};
///
/// let builder = RequestBuilder::new();
/// let session = Session {
///     token: "tk".into(),
///     account_id: "42".into(),
///     country_code: "US".into(),
/// };
/// let identity = DeviceIdentity {
///     cid: "cid1".into(),
///     config_module: "WiFi_Humidifier".into(),
///     ..Default::default()
/// };
/// let req = builder.bypass_v2(&session, &identity, "setSwitch", json!({"enabled": true, "id": 0}));
/// assert_eq!(req.path, "/cloud/v2/deviceManaged/bypassV2");
/// assert_eq!(req.body["method"], "bypassV2");
/// assert_eq!(req.body["payload"]["method"], "setSwitch");
/// assert_eq!(req.body["deviceId"], "cid1");
/// ```
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    language: String,
    time_zone: String,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    /// Creates a builder with the default language and time zone.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: defaults::ACCEPT_LANGUAGE.to_string(),
            time_zone: defaults::TIME_ZONE.to_string(),
        }
    }

    /// Sets `acceptLanguage`.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets `timeZone`.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Returns the configured time zone.
    #[must_use]
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    // ========== Tiers ==========

    fn default_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("acceptLanguage".into(), json!(self.language));
        fields.insert("appVersion".into(), json!(defaults::APP_VERSION));
        fields.insert("phoneBrand".into(), json!(defaults::PHONE_BRAND));
        fields.insert("phoneOS".into(), json!(defaults::PHONE_OS));
        fields.insert("debugMode".into(), json!(defaults::DEBUG_MODE));
        fields.insert("traceId".into(), json!(trace_id()));
        fields.insert("timeZone".into(), json!(self.time_zone));
        fields
    }

    fn session_fields(fields: &mut Map<String, Value>, session: &Session) {
        fields.insert("accountID".into(), json!(session.account_id));
        fields.insert("token".into(), json!(session.token));
        fields.insert("userCountryCode".into(), json!(session.country_code));
    }

    fn identity_fields(fields: &mut Map<String, Value>, identity: &DeviceIdentity) {
        fields.insert("cid".into(), json!(identity.cid));
        fields.insert("deviceId".into(), json!(identity.cid));
        fields.insert("configModule".into(), json!(identity.config_module));
        fields.insert("configModel".into(), json!(identity.config_module));
        if let Some(region) = &identity.device_region {
            fields.insert("deviceRegion".into(), json!(region));
        }
        if let Some(uuid) = &identity.uuid {
            fields.insert("uuid".into(), json!(uuid));
        }
    }

    fn device_fields(&self, session: &Session, identity: &DeviceIdentity) -> Map<String, Value> {
        let mut fields = self.default_fields();
        Self::session_fields(&mut fields, session);
        Self::identity_fields(&mut fields, identity);
        fields
    }

    // ========== Envelopes ==========

    /// Builds a bypass V1 request; the endpoint equals `method`.
    #[must_use]
    pub fn bypass_v1(
        &self,
        session: &Session,
        identity: &DeviceIdentity,
        method: &str,
        data: Value,
    ) -> RequestEnvelope {
        self.bypass_v1_at(session, identity, method, method, data)
    }

    /// Builds a bypass V1 request for an endpoint named apart from its
    /// method, such as `timer/addTimer`.
    #[must_use]
    pub fn bypass_v1_at(
        &self,
        session: &Session,
        identity: &DeviceIdentity,
        endpoint: &str,
        method: &str,
        data: Value,
    ) -> RequestEnvelope {
        let mut fields = self.device_fields(session, identity);
        fields.insert("method".into(), json!(method));
        if let Value::Object(data) = strip_nulls(data) {
            fields.extend(data);
        }
        let endpoint = endpoint.trim_start_matches('/');
        RequestEnvelope::post(
            format!("{}{endpoint}", defaults::BYPASS_V1_PREFIX),
            Value::Object(fields),
        )
    }

    /// Builds a bypass V2 request.
    #[must_use]
    pub fn bypass_v2(
        &self,
        session: &Session,
        identity: &DeviceIdentity,
        method: &str,
        data: Value,
    ) -> RequestEnvelope {
        let mut fields = self.device_fields(session, identity);
        fields.insert("method".into(), json!("bypassV2"));
        fields.insert(
            "payload".into(),
            json!({
                "method": method,
                "source": "APP",
                "data": strip_nulls(data),
            }),
        );
        RequestEnvelope::post(defaults::BYPASS_V2_PATH, Value::Object(fields))
    }

    /// Builds an energy history request; `method` names the period, as
    /// in `getLastWeekEnergy`.
    #[must_use]
    pub fn energy_history(
        &self,
        session: &Session,
        identity: &DeviceIdentity,
        method: &str,
    ) -> RequestEnvelope {
        let mut fields = self.default_fields();
        Self::session_fields(&mut fields, session);
        fields.insert("method".into(), json!(method));
        fields.insert("homeTimeZone".into(), json!(self.time_zone));
        if let Some(uuid) = &identity.uuid {
            fields.insert("uuid".into(), json!(uuid));
        }
        RequestEnvelope::post(
            format!("{}{method}", defaults::ENERGY_HISTORY_PREFIX),
            Value::Object(fields),
        )
    }

    /// Builds a legacy REST request authenticated by headers.
    #[must_use]
    pub fn legacy(
        &self,
        session: &Session,
        method: HttpMethod,
        path: impl Into<String>,
        body: Option<Value>,
    ) -> RequestEnvelope {
        RequestEnvelope {
            method,
            path: path.into(),
            headers: vec![
                ("accept-language", self.language.clone()),
                ("appVersion", defaults::APP_VERSION.to_string()),
                ("accountId", session.account_id.clone()),
                ("tk", session.token.clone()),
                ("tz", self.time_zone.clone()),
            ],
            body: body.map_or(Value::Null, strip_nulls),
        }
    }

    /// Builds the login request; `password_md5` is the hex digest.
    #[must_use]
    pub fn login(&self, email: &str, password_md5: &str) -> RequestEnvelope {
        let mut fields = self.default_fields();
        fields.insert("email".into(), json!(email));
        fields.insert("password".into(), json!(password_md5));
        fields.insert("devToken".into(), json!(""));
        fields.insert("userType".into(), json!(defaults::USER_TYPE));
        fields.insert("method".into(), json!("login"));
        RequestEnvelope::post(defaults::LOGIN_PATH, Value::Object(fields))
    }

    /// Builds one device list page request.
    #[must_use]
    pub fn device_list(&self, session: &Session, page_no: u32) -> RequestEnvelope {
        let mut fields = self.default_fields();
        Self::session_fields(&mut fields, session);
        fields.insert("method".into(), json!("devices"));
        fields.insert("pageNo".into(), json!(page_no));
        fields.insert("pageSize".into(), json!(defaults::DEVICE_LIST_PAGE_SIZE));
        RequestEnvelope::post(defaults::DEVICE_LIST_PATH, Value::Object(fields))
    }
}

fn trace_id() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Removes `null` entries from objects, recursively.
#[must_use]
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

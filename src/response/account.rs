// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account-level payloads: login and the device list.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::de;

fn default_off() -> String {
    "off".to_string()
}

fn default_offline() -> String {
    "offline".to_string()
}

/// Result of `/cloud/v1/user/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    /// Session token.
    pub token: String,
    /// Account identifier.
    #[serde(rename = "accountID", deserialize_with = "de::flex_string")]
    pub account_id: String,
    /// Two-letter country code of the account.
    #[serde(rename = "countryCode", default)]
    pub country_code: String,
}

/// One entry of the device list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDescriptor {
    /// Cloud identifier.
    #[serde(default)]
    pub cid: Option<String>,
    /// Device UUID.
    #[serde(default)]
    pub uuid: Option<String>,
    /// MAC address.
    #[serde(rename = "macID", default)]
    pub mac_id: Option<String>,
    /// Model code used for registry lookup.
    #[serde(default)]
    pub device_type: Option<String>,
    /// User-assigned name.
    #[serde(default)]
    pub device_name: String,
    /// Firmware version.
    #[serde(default)]
    pub current_firm_version: Option<String>,
    /// `on` or `off`.
    #[serde(default = "default_off")]
    pub device_status: String,
    /// `online` or `offline`.
    #[serde(default = "default_offline")]
    pub connection_status: String,
    /// Configuration module sent back with every bypass call.
    #[serde(default)]
    pub config_module: String,
    /// Region the device is registered in.
    #[serde(default)]
    pub device_region: Option<String>,
    /// Socket number of multi-socket plugs.
    #[serde(default, deserialize_with = "de::opt_flex_u8")]
    pub sub_device_no: Option<u8>,
    /// Product category such as `wifi-switch`.
    #[serde(rename = "type", default)]
    pub product_type: Option<String>,
    /// `wifi` or `wifi+ble`.
    #[serde(default)]
    pub connection_type: Option<String>,
    /// Extra model-specific properties.
    #[serde(default)]
    pub device_prop: Option<Value>,
}

impl DeviceDescriptor {
    /// Identifier used for requests and fleet keys.
    ///
    /// Falls back from `cid` to `uuid` to `macID`.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        [&self.cid, &self.uuid, &self.mac_id]
            .into_iter()
            .filter_map(Option::as_deref)
            .find(|id| !id.is_empty())
    }

    /// Returns `true` if the descriptor can back a device.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.identity().is_some() && self.device_type.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// One page of `/cloud/v1/deviceManaged/devices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceListPage {
    /// Descriptors across all pages.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub total: i64,
    /// Page size requested.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub page_size: i64,
    /// Page number, 1-based.
    #[serde(default, deserialize_with = "de::flex_i64")]
    pub page_no: i64,
    /// Descriptors on this page; missing or `null` reads as empty.
    #[serde(default, deserialize_with = "de::null_default")]
    pub list: Vec<DeviceDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::decode_account;
    use serde_json::json;

    #[test]
    fn login_result() {
        let body = serde_json::to_vec(&json!({
            "traceId": "1", "code": 0, "msg": "request success",
            "result": {"accountID": 12345, "token": "tk", "countryCode": "US"}
        }))
        .unwrap();
        let login: LoginResult = decode_account(&body).unwrap();
        assert_eq!(login.account_id, "12345");
        assert_eq!(login.token, "tk");
        assert_eq!(login.country_code, "US");
    }

    #[test]
    fn descriptor_identity_fallback() {
        let with_cid: DeviceDescriptor =
            serde_json::from_value(json!({"cid": "c1", "uuid": "u1", "deviceType": "ESW03-USA"}))
                .unwrap();
        assert_eq!(with_cid.identity(), Some("c1"));
        assert_eq!(with_cid.device_status, "off");
        assert_eq!(with_cid.connection_status, "offline");

        let with_mac: DeviceDescriptor =
            serde_json::from_value(json!({"cid": "", "macID": "aa:bb", "deviceType": "X"}))
                .unwrap();
        assert_eq!(with_mac.identity(), Some("aa:bb"));
        assert!(with_mac.is_valid());

        let anonymous: DeviceDescriptor =
            serde_json::from_value(json!({"deviceType": "ESW03-USA"})).unwrap();
        assert!(!anonymous.is_valid());

        let untyped: DeviceDescriptor = serde_json::from_value(json!({"cid": "c2"})).unwrap();
        assert!(!untyped.is_valid());
    }

    #[test]
    fn empty_page() {
        let body = serde_json::to_vec(&json!({
            "code": 0, "result": {"total": 0, "pageSize": 100, "pageNo": 1, "list": null}
        }))
        .unwrap();
        let page: DeviceListPage = decode_account(&body).unwrap();
        assert_eq!(page.total, 0);
        assert!(page.list.is_empty());
    }
}

// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet key of a device.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a device across device list fetches.
///
/// Multi-socket plugs report one entry per socket with the same `cid`, so
/// the socket number is part of the key.
///
/// # Examples
///
/// ```
/// use vesync_lib::event::DeviceKey;
///
/// let plug = DeviceKey::new("cid-1", None);
/// let socket = DeviceKey::new("cid-1", Some(2));
/// assert_ne!(plug, socket);
/// assert_eq!(socket.to_string(), "cid-1#2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceKey {
    cid: String,
    sub_device_no: Option<u8>,
}

impl DeviceKey {
    /// Creates a key.
    #[must_use]
    pub fn new(cid: impl Into<String>, sub_device_no: Option<u8>) -> Self {
        Self {
            cid: cid.into(),
            sub_device_no,
        }
    }

    /// Cloud identifier.
    #[must_use]
    pub fn cid(&self) -> &str {
        &self.cid
    }

    /// Socket number, if any.
    #[must_use]
    pub const fn sub_device_no(&self) -> Option<u8> {
        self.sub_device_no
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sub_device_no {
            Some(no) => write!(f, "{}#{no}", self.cid),
            None => f.write_str(&self.cid),
        }
    }
}

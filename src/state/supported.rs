// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tri-state value for capability-gated properties.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A property that may be unsupported by the hardware.
///
/// `NotSupported` is fixed when the device is built from its feature map
/// and never changes: writes to such a field are ignored.
///
/// # Examples
///
/// ```
/// use vesync_lib::state::Supported;
///
/// let mut brightness: Supported<u8> = Supported::gate(true);
/// assert_eq!(brightness, Supported::Unknown);
/// brightness.set(80);
/// assert_eq!(brightness.get(), Some(80));
///
/// let mut nightlight: Supported<bool> = Supported::gate(false);
/// nightlight.set(true);
/// assert!(!nightlight.is_supported());
/// assert_eq!(nightlight.get(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Supported<T> {
    /// The hardware lacks the feature.
    NotSupported,
    /// Supported, but no value has been reported yet.
    #[default]
    Unknown,
    /// Last known value.
    Value(T),
}

impl<T> Supported<T> {
    /// Returns `Unknown` if `supported`, else `NotSupported`.
    #[must_use]
    pub const fn gate(supported: bool) -> Self {
        if supported {
            Self::Unknown
        } else {
            Self::NotSupported
        }
    }

    /// Returns `true` unless the value is `NotSupported`.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::NotSupported)
    }

    /// Returns `true` if a value is present.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Returns a reference to the value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Stores a value; ignored when not supported.
    ///
    /// Returns `true` if the value was stored.
    pub fn set(&mut self, value: T) -> bool {
        if self.is_supported() {
            *self = Self::Value(value);
            true
        } else {
            false
        }
    }

    /// Stores a value, or resets to `Unknown` for `None`.
    pub fn set_opt(&mut self, value: Option<T>) {
        if !self.is_supported() {
            return;
        }
        *self = value.map_or(Self::Unknown, Self::Value);
    }

    /// Maps the contained value.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Supported<U> {
        match self {
            Self::NotSupported => Supported::NotSupported,
            Self::Unknown => Supported::Unknown,
            Self::Value(v) => Supported::Value(f(v)),
        }
    }
}

impl<T: Copy> Supported<T> {
    /// Returns a copy of the value, if any.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        match self {
            Self::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Supported<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSupported => f.write_str("not supported"),
            Self::Unknown => f.write_str("unknown"),
            Self::Value(v) => v.fmt(f),
        }
    }
}

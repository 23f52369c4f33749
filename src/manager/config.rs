// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fleet manager configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::{RequestBuilder, defaults};

/// Cloud region hosting the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    /// Americas and Japan.
    #[default]
    Us,
    /// Europe and everything else.
    Eu,
}

impl Region {
    /// Country codes served by the US cloud.
    pub const US_COUNTRIES: &'static [&'static str] = &["US", "CA", "MX", "JP"];

    /// Returns the API base URL of the region.
    #[must_use]
    pub const fn base_url(&self) -> &'static str {
        match self {
            Self::Us => "https://smartapi.vesync.com",
            Self::Eu => "https://smartapi.vesync.eu",
        }
    }

    /// Returns the region that serves accounts registered in `country_code`.
    #[must_use]
    pub fn for_country(country_code: &str) -> Self {
        if Self::US_COUNTRIES
            .iter()
            .any(|c| c.eq_ignore_ascii_case(country_code))
        {
            Self::Us
        } else {
            Self::Eu
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Us => f.write_str("US"),
            Self::Eu => f.write_str("EU"),
        }
    }
}

/// Configuration for [`VeSync`](super::VeSync).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use vesync_lib::manager::{ManagerConfig, Region};
///
/// let config = ManagerConfig::new()
///     .with_region(Region::Eu)
///     .with_time_zone("Europe/Berlin")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "https://smartapi.vesync.eu");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerConfig {
    region: Region,
    time_zone: String,
    language: String,
    timeout: Duration,
    base_url: Option<String>,
}

impl ManagerConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);

    /// Default time zone sent with every request.
    pub const DEFAULT_TIME_ZONE: &'static str = defaults::TIME_ZONE;

    /// Default language sent with every request.
    pub const DEFAULT_LANGUAGE: &'static str = defaults::ACCEPT_LANGUAGE;

    /// Creates a configuration for the US region with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            region: Region::default(),
            time_zone: Self::DEFAULT_TIME_ZONE.to_string(),
            language: Self::DEFAULT_LANGUAGE.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
            base_url: None,
        }
    }

    /// Sets the cloud region.
    #[must_use]
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Sets the IANA time zone name.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    /// Sets the language code.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the base URL the region would select.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Returns the cloud region.
    #[must_use]
    pub const fn region(&self) -> Region {
        self.region
    }

    /// Returns the time zone.
    #[must_use]
    pub fn time_zone(&self) -> &str {
        &self.time_zone
    }

    /// Returns the language code.
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the effective base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.region.base_url())
    }

    pub(crate) fn request_builder(&self) -> RequestBuilder {
        RequestBuilder::new()
            .with_time_zone(self.time_zone.clone())
            .with_language(self.language.clone())
    }

    /// Builds the HTTP transport configuration.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn http_config(&self) -> crate::protocol::HttpConfig {
        crate::protocol::HttpConfig::new(self.base_url()).with_timeout(self.timeout)
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.region(), Region::Us);
        assert_eq!(config.base_url(), "https://smartapi.vesync.com");
        assert_eq!(config.time_zone(), "America/New_York");
        assert_eq!(config.language(), "en");
        assert_eq!(config.timeout(), Duration::from_secs(8));
    }

    #[test]
    fn override_wins_over_region() {
        let config = ManagerConfig::new()
            .with_region(Region::Eu)
            .with_base_url("http://127.0.0.1:9000");
        assert_eq!(config.base_url(), "http://127.0.0.1:9000");
        assert_eq!(config.region().base_url(), "https://smartapi.vesync.eu");
    }

    #[test]
    fn region_for_country() {
        assert_eq!(Region::for_country("us"), Region::Us);
        assert_eq!(Region::for_country("JP"), Region::Us);
        assert_eq!(Region::for_country("DE"), Region::Eu);
    }

    #[test]
    fn builder_carries_locale() {
        let builder = ManagerConfig::new()
            .with_time_zone("Europe/Paris")
            .request_builder();
        assert_eq!(builder.time_zone(), "Europe/Paris");
    }
}

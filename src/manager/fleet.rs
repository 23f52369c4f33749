// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fleet manager.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::capabilities::{DeviceFamily, FeatureMap};
use crate::device::{DeviceInfo, VeSyncDevice};
use crate::error::{Error, Result};
use crate::event::{DeviceKey, EventBus, FleetEvent};
use crate::protocol::{CloudClient, Session, Transport};
use crate::registry;
use crate::response::{DeviceDescriptor, DeviceListPage, decode_account};

use super::config::{ManagerConfig, Region};
use super::session;

/// Outcome of [`VeSync::get_devices`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FleetDiff {
    /// Devices that appeared.
    pub added: Vec<DeviceKey>,
    /// Devices that disappeared.
    pub removed: Vec<DeviceKey>,
    /// Devices that were already known; their handles are unchanged.
    pub kept: Vec<DeviceKey>,
}

impl FleetDiff {
    /// Returns `true` if no device was added or removed.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Outcome of [`VeSync::update`].
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Devices refreshed successfully.
    pub succeeded: Vec<DeviceKey>,
    /// Devices whose refresh failed, with the error.
    pub failed: Vec<(DeviceKey, Error)>,
}

impl UpdateReport {
    /// Returns `true` if every refresh succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A resolved device list entry.
struct Resolved {
    key: DeviceKey,
    descriptor: DeviceDescriptor,
    features: &'static FeatureMap,
}

/// Manager of one account's devices.
///
/// The manager owns the session and the device handles. Handles are
/// shared as `Arc<VeSyncDevice>`; a device that survives a
/// [`get_devices`](Self::get_devices) call keeps its handle and state.
///
/// # Examples
///
/// ```no_run
/// use vesync_lib::manager::{ManagerConfig, VeSync};
///
/// #[tokio::main]
/// async fn main() -> vesync_lib::Result<()> {
///     let manager = VeSync::new(ManagerConfig::new())?;
///     manager.login("user@example.com", "secret").await?;
///
///     let diff = manager.get_devices().await?;
///     println!("{} new devices", diff.added.len());
///
///     let report = manager.update().await;
///     for (key, error) in &report.failed {
///         eprintln!("{key}: {error}");
///     }
///
///     for device in manager.devices() {
///         if let Some(plug) = device.as_toggleable() {
///             plug.turn_on().await?;
///         }
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct VeSync {
    config: ManagerConfig,
    client: Arc<CloudClient>,
    devices: RwLock<BTreeMap<DeviceKey, Arc<VeSyncDevice>>>,
    event_bus: EventBus,
}

impl VeSync {
    /// Creates a manager over the reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidAddress` for a malformed base URL
    /// override, or the client builder's error.
    #[cfg(feature = "http")]
    pub fn new(config: ManagerConfig) -> Result<Self> {
        let transport = config.http_config().into_transport()?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a manager over any transport.
    #[must_use]
    pub fn with_transport(config: ManagerConfig, transport: Arc<dyn Transport>) -> Self {
        let client = CloudClient::new(transport, config.request_builder());
        Self {
            config,
            client: Arc::new(client),
            devices: RwLock::new(BTreeMap::new()),
            event_bus: EventBus::new(),
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Logs in with the account's email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for rejected credentials,
    /// `ApiError` for other server codes, `DecodeError` for a reply
    /// without a token, or a transport error.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let session = session::login(&self.client, email, password).await?;
        tracing::info!(
            account = %session.account_id,
            country = %session.country_code,
            "Logged in"
        );
        if !session.country_code.is_empty()
            && Region::for_country(&session.country_code) != self.config.region()
        {
            tracing::warn!(
                country = %session.country_code,
                region = %self.config.region(),
                "Account country is served by another region"
            );
        }
        Ok(())
    }

    /// Returns the current session.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.client.session()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Fetches the device list and reconciles the fleet with it.
    ///
    /// Entries without an identifier or device type are logged and
    /// skipped, as are device types the registry does not know. Devices
    /// already in the fleet keep their handle.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` before [`login`](Self::login),
    /// otherwise the errors of the device list call. The fleet is left
    /// unchanged on error.
    pub async fn get_devices(&self) -> Result<FleetDiff> {
        let session = self.client.require_session()?;
        let descriptors = self.fetch_descriptors(&session).await?;
        if descriptors.is_empty() {
            tracing::warn!("Device list is empty");
        }

        let resolved = descriptors.into_iter().filter_map(resolve).collect();
        let (diff, events) = self.reconcile(resolved);
        self.event_bus.publish_all(events);

        tracing::info!(
            added = diff.added.len(),
            removed = diff.removed.len(),
            kept = diff.kept.len(),
            "Device list updated"
        );
        Ok(diff)
    }

    async fn fetch_descriptors(&self, session: &Session) -> Result<Vec<DeviceDescriptor>> {
        let mut descriptors = Vec::new();
        let mut page_no = 1;
        loop {
            let envelope = self.client.builder().device_list(session, page_no);
            let body = self.client.send(&envelope).await?;
            let page: DeviceListPage = decode_account(&body)?;
            let received = page.list.len();
            descriptors.extend(page.list);

            let total = usize::try_from(page.total).unwrap_or(0);
            if received == 0 || descriptors.len() >= total {
                break;
            }
            page_no += 1;
        }
        Ok(descriptors)
    }

    fn reconcile(&self, resolved: Vec<Resolved>) -> (FleetDiff, Vec<FleetEvent>) {
        let mut diff = FleetDiff::default();
        let mut events = Vec::new();

        let mut devices = self.devices.write();
        let mut next = BTreeMap::new();
        for Resolved {
            key,
            descriptor,
            features,
        } in resolved
        {
            if next.contains_key(&key) {
                tracing::debug!(key = %key, "Skipping duplicate device list entry");
                continue;
            }
            if let Some(existing) = devices.remove(&key) {
                diff.kept.push(key.clone());
                next.insert(key, existing);
                continue;
            }
            let Some(device) = VeSyncDevice::build(&descriptor, features, self.client.clone())
            else {
                continue;
            };
            events.push(FleetEvent::DeviceAdded {
                key: key.clone(),
                name: device.name().to_string(),
                family: device.family(),
            });
            diff.added.push(key.clone());
            next.insert(key, Arc::new(device));
        }
        for key in devices.keys() {
            events.push(FleetEvent::device_removed(key.clone()));
            diff.removed.push(key.clone());
        }
        *devices = next;

        (diff, events)
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Refreshes every device concurrently.
    ///
    /// Failures are logged, published as [`FleetEvent::UpdateFailed`] and
    /// collected in the report; one device failing never affects another.
    pub async fn update(&self) -> UpdateReport {
        let devices = self.devices();
        let results = join_all(devices.iter().map(|device| async move {
            let was_online = device.is_online();
            let result = device.update().await;
            (device, was_online, result)
        }))
        .await;

        let mut report = UpdateReport::default();
        for (device, was_online, result) in results {
            let key = device.key();
            let online = device.is_online();
            if online != was_online {
                self.event_bus.publish(FleetEvent::ConnectionChanged {
                    key: key.clone(),
                    online,
                });
            }
            match result {
                Ok(()) => report.succeeded.push(key),
                Err(err) => {
                    tracing::warn!(
                        device = %device.name(),
                        key = %key,
                        error = %err,
                        "Device update failed"
                    );
                    self.event_bus
                        .publish(FleetEvent::update_failed(key.clone(), &err));
                    report.failed.push((key, err));
                }
            }
        }
        report
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Returns every device, ordered by key.
    #[must_use]
    pub fn devices(&self) -> Vec<Arc<VeSyncDevice>> {
        self.devices.read().values().cloned().collect()
    }

    /// Returns the device with `key`.
    #[must_use]
    pub fn device(&self, key: &DeviceKey) -> Option<Arc<VeSyncDevice>> {
        self.devices.read().get(key).cloned()
    }

    /// Returns the devices of one family.
    #[must_use]
    pub fn devices_of(&self, family: DeviceFamily) -> Vec<Arc<VeSyncDevice>> {
        self.devices
            .read()
            .values()
            .filter(|device| device.family() == family)
            .cloned()
            .collect()
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Subscribes to fleet events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FleetEvent> {
        self.event_bus.subscribe()
    }
}

fn resolve(descriptor: DeviceDescriptor) -> Option<Resolved> {
    if !descriptor.is_valid() {
        tracing::warn!(
            name = %descriptor.device_name,
            device_type = ?descriptor.device_type,
            "Skipping device list entry without identifier or type"
        );
        return None;
    }
    let device_type = descriptor.device_type.as_deref()?;
    let Some(features) = registry::lookup(device_type) else {
        tracing::debug!(
            device_type,
            name = %descriptor.device_name,
            "Skipping unsupported device type"
        );
        return None;
    };
    let key = DeviceInfo::from_descriptor(&descriptor)?.key();
    Some(Resolved {
        key,
        descriptor,
        features,
    })
}

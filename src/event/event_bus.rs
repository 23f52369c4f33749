// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of fleet events to subscribers.

use tokio::sync::broadcast;

use super::FleetEvent;

/// Events buffered per subscriber before it starts lagging.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Broadcast channel of [`FleetEvent`]s.
///
/// A subscriber that falls more than the channel capacity behind
/// receives `RecvError::Lagged` and skips the oldest events.
///
/// # Examples
///
/// ```
/// use vesync_lib::event::{DeviceKey, EventBus, FleetEvent};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(FleetEvent::device_removed(DeviceKey::new("cid-1", None)));
/// assert_eq!(rx.try_recv().unwrap().key().cid(), "cid-1");
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<FleetEvent>,
}

impl EventBus {
    /// Creates a bus with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a bus buffering `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FleetEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of live receivers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes one event; dropped when nobody listens.
    pub fn publish(&self, event: FleetEvent) {
        tracing::trace!(key = %event.key(), "Publishing fleet event");
        let _ = self.sender.send(event);
    }

    /// Publishes events in order.
    pub fn publish_all(&self, events: impl IntoIterator<Item = FleetEvent>) {
        for event in events {
            self.publish(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DeviceKey;

    fn removed(cid: &str) -> FleetEvent {
        FleetEvent::device_removed(DeviceKey::new(cid, None))
    }

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let bus = EventBus::default();
        bus.publish(removed("a"));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn every_subscriber_gets_a_copy() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.clone().subscribe();

        bus.publish(removed("b"));

        assert_eq!(first.recv().await.unwrap(), second.recv().await.unwrap());
    }

    #[test]
    fn publish_all_keeps_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish_all([removed("x"), removed("y")]);

        assert_eq!(rx.try_recv().unwrap().key().cid(), "x");
        assert_eq!(rx.try_recv().unwrap().key().cid(), "y");
    }

    #[test]
    fn slow_subscriber_lags() {
        let bus = EventBus::with_capacity(1);
        let mut rx = bus.subscribe();
        bus.publish_all([removed("1"), removed("2")]);

        assert!(matches!(
            rx.try_recv(),
            Err(broadcast::error::TryRecvError::Lagged(1))
        ));
        assert_eq!(rx.try_recv().unwrap().key().cid(), "2");
    }
}

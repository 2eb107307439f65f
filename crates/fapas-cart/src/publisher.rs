//! # Count Publisher
//!
//! The shared "cart badge" slot: the last known total item count.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartController ──publish(n)──► CountPublisher (watch slot)            │
//! │                                        │                                │
//! │                    ┌───────────────────┼───────────────────┐            │
//! │                    ▼                   ▼                   ▼            │
//! │              Home badge         Detail badge         Cart screen        │
//! │            (subscription)      (subscription)      (subscription)      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Observers only ever see the latest value. A subscriber that misses
//! several updates reads the newest count, never a stale one.

use tokio::sync::watch;
use tracing::trace;

/// Holds the current item count and notifies subscribers.
///
/// Starts at 0. Only the controller publishes; everyone else subscribes.
#[derive(Debug)]
pub struct CountPublisher {
    tx: watch::Sender<u64>,
}

impl Default for CountPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl CountPublisher {
    /// Creates a publisher holding 0.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        CountPublisher { tx }
    }

    /// Returns the last published count.
    pub fn current(&self) -> u64 {
        *self.tx.borrow()
    }

    /// Registers a new observer.
    pub fn subscribe(&self) -> CountSubscription {
        CountSubscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Stores `count` and wakes every subscriber.
    ///
    /// Succeeds even with no subscribers; the value is kept for later ones.
    pub(crate) fn publish(&self, count: u64) {
        trace!(count, subscribers = self.tx.receiver_count(), "Publishing cart count");
        self.tx.send_replace(count);
    }
}

/// Read-only view of the published count.
#[derive(Debug, Clone)]
pub struct CountSubscription {
    rx: watch::Receiver<u64>,
}

impl CountSubscription {
    /// Returns the latest count without waiting.
    pub fn current(&self) -> u64 {
        *self.rx.borrow()
    }

    /// Waits for the next publish and returns the new count.
    ///
    /// Returns `None` once the publisher is dropped.
    pub async fn changed(&mut self) -> Option<u64> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let publisher = CountPublisher::new();
        assert_eq!(publisher.current(), 0);
        assert_eq!(publisher.subscribe().current(), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_publish() {
        let publisher = CountPublisher::new();
        let mut home = publisher.subscribe();
        let mut detail = publisher.subscribe();
        assert_eq!(publisher.subscriber_count(), 2);

        publisher.publish(3);

        assert_eq!(home.changed().await, Some(3));
        assert_eq!(detail.changed().await, Some(3));
        assert_eq!(publisher.current(), 3);
    }

    #[tokio::test]
    async fn test_late_subscriber_reads_latest() {
        let publisher = CountPublisher::new();
        publisher.publish(1);
        publisher.publish(4);

        let late = publisher.subscribe();
        assert_eq!(late.current(), 4);
    }

    #[tokio::test]
    async fn test_slow_subscriber_skips_to_newest() {
        let publisher = CountPublisher::new();
        let mut badge = publisher.subscribe();

        publisher.publish(1);
        publisher.publish(2);
        publisher.publish(5);

        assert_eq!(badge.changed().await, Some(5));
    }

    #[tokio::test]
    async fn test_closed_publisher_ends_subscription() {
        let publisher = CountPublisher::new();
        let mut badge = publisher.subscribe();
        drop(publisher);
        assert_eq!(badge.changed().await, None);
    }
}

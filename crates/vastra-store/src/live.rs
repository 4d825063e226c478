//! # Live Snapshot Feeds
//!
//! Per-owner change fan-out for a record kind: every subscriber observes the
//! full current set immediately on subscribe, and again after every append
//! from any handle to the same store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FeedRegistry<T>                                    │
//! │                                                                         │
//! │  owner "a" ──► watch::Sender<Arc<Vec<T>>> ──┬──► LiveSnapshots (sub 1)  │
//! │                                             └──► LiveSnapshots (sub 2)  │
//! │  owner "b" ──► watch::Sender<Arc<Vec<T>>> ────► LiveSnapshots           │
//! │                                                                         │
//! │  append ──► reload full set ──► send_replace ──► subscribers wake       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `watch` channel (rather than `broadcast`) matches the collaborator
//! contract: subscribers want the *latest full set*, not a message history —
//! a slow consumer skips intermediate sets instead of lagging behind.
//!
//! Dropping a [`LiveSnapshots`] is the unsubscribe. There is nothing else to
//! release, so teardown of the consuming context can never leak a
//! subscription.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

// =============================================================================
// Feed Registry
// =============================================================================

/// Live-feed channels for one record kind, keyed by owner.
#[derive(Debug)]
pub(crate) struct FeedRegistry<T> {
    channels: Mutex<HashMap<String, watch::Sender<Arc<Vec<T>>>>>,
}

impl<T> FeedRegistry<T> {
    pub(crate) fn new() -> Self {
        FeedRegistry {
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribes to an owner's feed, creating the channel (seeded with
    /// `current`) on first subscribe. An existing channel already carries
    /// the latest published set, so the seed is only used once.
    pub(crate) fn subscribe(&self, owner: &str, current: Vec<T>) -> LiveSnapshots<T> {
        let mut channels = self.channels.lock().expect("feed registry lock poisoned");
        let rx = match channels.get(owner) {
            Some(tx) => tx.subscribe(),
            None => {
                let (tx, rx) = watch::channel(Arc::new(current));
                channels.insert(owner.to_string(), tx);
                rx
            }
        };
        LiveSnapshots { rx }
    }

    /// Whether anyone ever subscribed to this owner's feed. Appends skip the
    /// snapshot reload entirely when nothing is tracked.
    pub(crate) fn is_tracked(&self, owner: &str) -> bool {
        self.channels
            .lock()
            .expect("feed registry lock poisoned")
            .contains_key(owner)
    }

    /// Publishes a freshly-loaded full set to an owner's feed, waking all
    /// current subscribers. A feed nobody created yet is a no-op.
    pub(crate) fn publish(&self, owner: &str, set: Vec<T>) {
        let channels = self.channels.lock().expect("feed registry lock poisoned");
        if let Some(tx) = channels.get(owner) {
            tx.send_replace(Arc::new(set));
        }
    }
}

// =============================================================================
// Subscription Handle
// =============================================================================

/// A live subscription to one owner's record set.
///
/// Holds the receiving end of the feed; dropping it unsubscribes.
#[derive(Debug)]
pub struct LiveSnapshots<T> {
    rx: watch::Receiver<Arc<Vec<T>>>,
}

impl<T> LiveSnapshots<T> {
    /// The latest full set, available immediately on subscribe.
    pub fn current(&self) -> Arc<Vec<T>> {
        self.rx.borrow().clone()
    }

    /// Waits for the next mutation and returns the new full set, or `None`
    /// once the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<T>>> {
        match self.rx.changed().await {
            Ok(()) => Some(self.rx.borrow_and_update().clone()),
            Err(_) => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initial_subscribe_sees_the_seed_set() {
        let feeds: FeedRegistry<String> = FeedRegistry::new();
        let sub = feeds.subscribe("owner", vec!["a".to_string()]);
        assert_eq!(*sub.current(), ["a".to_string()]);
    }

    #[tokio::test]
    async fn publish_wakes_subscribers_with_the_full_set() {
        let feeds: FeedRegistry<String> = FeedRegistry::new();
        let mut sub = feeds.subscribe("owner", vec![]);

        feeds.publish("owner", vec!["a".to_string(), "b".to_string()]);
        let set = sub.changed().await.expect("feed should be live");
        assert_eq!(set.len(), 2);
    }

    #[tokio::test]
    async fn owners_have_independent_feeds() {
        let feeds: FeedRegistry<String> = FeedRegistry::new();
        let sub_a = feeds.subscribe("a", vec!["a1".to_string()]);
        let sub_b = feeds.subscribe("b", vec![]);

        feeds.publish("a", vec!["a1".to_string(), "a2".to_string()]);
        assert!(sub_a.rx.has_changed().unwrap());
        assert!(!sub_b.rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn untracked_owners_are_skipped() {
        let feeds: FeedRegistry<String> = FeedRegistry::new();
        assert!(!feeds.is_tracked("nobody"));
        // Publishing to an owner without a channel is a quiet no-op.
        feeds.publish("nobody", vec!["x".to_string()]);
        assert!(!feeds.is_tracked("nobody"));

        feeds.subscribe("somebody", vec![]);
        assert!(feeds.is_tracked("somebody"));
    }

    #[tokio::test]
    async fn changed_returns_none_after_registry_drops() {
        let feeds: FeedRegistry<String> = FeedRegistry::new();
        let mut sub = feeds.subscribe("owner", vec![]);
        drop(feeds);
        assert!(sub.changed().await.is_none());
    }

    #[tokio::test]
    async fn slow_subscribers_observe_only_the_latest_set() {
        let feeds: FeedRegistry<String> = FeedRegistry::new();
        let mut sub = feeds.subscribe("owner", vec![]);

        feeds.publish("owner", vec!["a".to_string()]);
        feeds.publish("owner", vec!["a".to_string(), "b".to_string()]);

        // Intermediate sets are skipped, not queued.
        let set = sub.changed().await.unwrap();
        assert_eq!(set.len(), 2);
    }
}

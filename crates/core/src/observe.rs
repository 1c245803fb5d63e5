//! Live-query plumbing: explicit subscriptions that re-emit an owner's full
//! record list on every underlying change.
//!
//! Storage repositories hold one [`WatchRegistry`] per entity kind and call
//! [`WatchRegistry::emit`] after each committed write. Consumers subscribe and
//! receive the current list immediately, then every subsequent list; dropping
//! the [`Subscription`] cancels it. There is no diffing contract: each
//! emission is the complete list and the consumer re-renders from scratch.

use std::sync::Mutex;
use tokio::sync::watch;

/// Registry of per-owner watch channels for one entity kind.
pub struct WatchRegistry<T> {
    watchers: Mutex<Vec<OwnerWatch<T>>>,
}

struct OwnerWatch<T> {
    owner_id: String,
    tx: watch::Sender<Vec<T>>,
}

/// Handle to one live query. Dropping it unsubscribes.
pub struct Subscription<T> {
    rx: watch::Receiver<Vec<T>>,
}

impl<T: Clone> WatchRegistry<T> {
    pub fn new() -> Self {
        WatchRegistry {
            watchers: Mutex::new(Vec::new()),
        }
    }

    /// Registers a new subscription seeded with the current list.
    pub fn subscribe(&self, owner_id: &str, initial: Vec<T>) -> Subscription<T> {
        let (tx, rx) = watch::channel(initial);
        let mut watchers = match self.watchers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        watchers.push(OwnerWatch {
            owner_id: owner_id.to_string(),
            tx,
        });
        Subscription { rx }
    }

    /// Publishes a fresh list to every live subscription for `owner_id` and
    /// prunes subscriptions whose receiver has been dropped.
    pub fn emit(&self, owner_id: &str, records: Vec<T>) {
        let mut watchers = match self.watchers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        watchers.retain(|w| !w.tx.is_closed());
        for watcher in watchers.iter() {
            if watcher.owner_id == owner_id {
                // send only fails when the receiver is gone; retain above
                // already dropped those.
                let _ = watcher.tx.send(records.clone());
            }
        }
    }

    /// Number of live subscriptions, for diagnostics.
    pub fn watcher_count(&self) -> usize {
        let mut watchers = match self.watchers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        watchers.retain(|w| !w.tx.is_closed());
        watchers.len()
    }
}

impl<T: Clone> Default for WatchRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Subscription<T> {
    /// The most recently emitted list, without waiting.
    pub fn current(&self) -> Vec<T> {
        self.rx.borrow().clone()
    }

    /// Waits for the next emission. Returns `None` once the registry (and
    /// with it the sender) has been dropped.
    pub async fn next(&mut self) -> Option<Vec<T>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

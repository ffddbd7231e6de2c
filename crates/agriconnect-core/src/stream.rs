// ── Reactive record streams ──
//
// Subscription handles for consuming collection changes from the
// MarketStore. The console uses these to surface new SMS messages and
// tickets as they land.

use std::sync::Arc;

use tokio::sync::watch;

/// A subscription to one record collection.
///
/// Provides point-in-time snapshot access plus change notification,
/// either awaited with [`changed`](Self::changed) or polled without
/// blocking via [`take_update`](Self::take_update).
pub struct EntityStream<T: Clone + Send + Sync + 'static> {
    current: Arc<Vec<Arc<T>>>,
    receiver: watch::Receiver<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityStream<T> {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<Vec<Arc<T>>>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot seen most recently by this subscriber.
    pub fn current(&self) -> &Arc<Vec<Arc<T>>> {
        &self.current
    }

    /// The latest snapshot (may have changed since the last update).
    pub fn latest(&self) -> Arc<Vec<Arc<T>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<T>>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Non-blocking: the new snapshot if anything changed since the last
    /// call, otherwise `None`.
    pub fn take_update(&mut self) -> Option<Arc<Vec<Arc<T>>>> {
        if !self.receiver.has_changed().ok()? {
            return None;
        }
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Records present in the latest update that were absent from the
    /// previous one, matched by `key`. Advances the stream.
    pub fn take_new<K: PartialEq>(&mut self, key: impl Fn(&T) -> K) -> Vec<Arc<T>> {
        let before = self.current.clone();
        let Some(after) = self.take_update() else {
            return Vec::new();
        };
        after
            .iter()
            .filter(|item| {
                let k = key(item);
                !before.iter().any(|old| key(old) == k)
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(items: &[&str]) -> Arc<Vec<Arc<String>>> {
        Arc::new(items.iter().map(|s| Arc::new((*s).to_owned())).collect())
    }

    #[test]
    fn take_update_is_none_until_a_change() {
        let (tx, rx) = watch::channel(snapshot(&["a"]));
        let mut stream = EntityStream::new(rx);
        assert_eq!(stream.current().len(), 1);
        assert!(stream.take_update().is_none());

        tx.send(snapshot(&["a", "b"])).unwrap();
        assert_eq!(stream.take_update().unwrap().len(), 2);
        assert!(stream.take_update().is_none());
    }

    #[test]
    fn take_new_reports_only_additions() {
        let (tx, rx) = watch::channel(snapshot(&["a", "b"]));
        let mut stream = EntityStream::new(rx);

        tx.send(snapshot(&["a", "b", "c"])).unwrap();
        let added = stream.take_new(|s: &String| s.clone());
        assert_eq!(added.len(), 1);
        assert_eq!(*added[0], "c");
        assert!(stream.take_new(|s: &String| s.clone()).is_empty());
    }

    #[tokio::test]
    async fn changed_returns_none_when_sender_dropped() {
        let (tx, rx) = watch::channel(snapshot(&[]));
        let mut stream = EntityStream::new(rx);
        drop(tx);
        assert!(stream.changed().await.is_none());
    }
}

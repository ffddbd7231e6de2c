// ── Generic ordered entity collection ──
//
// Insertion-ordered storage with O(1) id lookups and push-based change
// notification via `watch` channels. Order is significant: dashboards
// list newest records first, and the handset indexes into the product
// list in the order the dealer sees it.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::EntityId;

/// An ordered, reactive collection for a single record type.
///
/// Every mutation bumps a version counter and rebuilds the snapshot that
/// subscribers receive. Readers only ever see whole snapshots.
pub(crate) struct EntityCollection<T: Clone + Send + Sync + 'static> {
    entries: RwLock<IndexMap<EntityId, Arc<T>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for cheap reads.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Clone + Send + Sync + 'static> EntityCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            entries: RwLock::new(IndexMap::new()),
            version,
            snapshot,
        }
    }

    /// Seed a collection in display order.
    pub(crate) fn from_items(items: impl IntoIterator<Item = (EntityId, T)>) -> Self {
        let col = Self::new();
        {
            let mut entries = col.write();
            for (id, entity) in items {
                entries.insert(id, Arc::new(entity));
            }
        }
        col.publish();
        col
    }

    /// Insert at the head of the collection (newest first). If the id is
    /// already present the old entry is replaced and moved to the head.
    /// Returns `true` if the id was new.
    pub(crate) fn push_front(&self, id: EntityId, entity: T) -> bool {
        let is_new = {
            let mut entries = self.write();
            let is_new = entries.shift_remove(&id).is_none();
            entries.shift_insert(0, id, Arc::new(entity));
            is_new
        };
        self.publish();
        is_new
    }

    /// Append at the tail of the collection. An existing id keeps its
    /// position and has its value replaced. Returns `true` if the id was new.
    pub(crate) fn push_back(&self, id: EntityId, entity: T) -> bool {
        let is_new = self.write().insert(id, Arc::new(entity)).is_none();
        self.publish();
        is_new
    }

    /// Apply `f` to a copy of the entity and store the result in place.
    /// Returns the updated entity, or `None` if the id is unknown.
    pub(crate) fn update(&self, id: &EntityId, f: impl FnOnce(&mut T)) -> Option<Arc<T>> {
        let updated = {
            let mut entries = self.write();
            let slot = entries.get_mut(id)?;
            let mut value = T::clone(slot);
            f(&mut value);
            let value = Arc::new(value);
            *slot = Arc::clone(&value);
            value
        };
        self.publish();
        Some(updated)
    }

    /// Remove an entity by id, preserving the order of the rest.
    pub(crate) fn remove(&self, id: &EntityId) -> Option<Arc<T>> {
        let removed = self.write().shift_remove(id);
        if removed.is_some() {
            self.publish();
        }
        removed
    }

    pub(crate) fn get(&self, id: &EntityId) -> Option<Arc<T>> {
        self.read().get(id).cloned()
    }

    /// First entity matching `pred`, in collection order.
    pub(crate) fn find(&self, pred: impl Fn(&T) -> bool) -> Option<Arc<T>> {
        self.read().values().find(|v| pred(v)).cloned()
    }

    pub(crate) fn contains(&self, id: &EntityId) -> bool {
        self.read().contains_key(id)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.read().len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    #[cfg(test)]
    fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn read(&self) -> RwLockReadGuard<'_, IndexMap<EntityId, Arc<T>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<EntityId, Arc<T>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Rebuild the snapshot, broadcast it, and bump the version.
    fn publish(&self) {
        let values: Vec<Arc<T>> = self.read().values().cloned().collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn names(col: &EntityCollection<String>) -> Vec<String> {
        col.snapshot().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn push_front_returns_true_for_new_id() {
        let col: EntityCollection<String> = EntityCollection::new();
        assert!(col.push_front("a".into(), "hello".into()));
        assert!(!col.push_front("a".into(), "world".into()));
        assert_eq!(col.len(), 1);
        assert_eq!(*col.get(&"a".into()).unwrap(), "world");
    }

    #[test]
    fn push_front_orders_newest_first() {
        let col: EntityCollection<String> = EntityCollection::new();
        col.push_front("1".into(), "first".into());
        col.push_front("2".into(), "second".into());
        col.push_front("3".into(), "third".into());
        assert_eq!(names(&col), ["third", "second", "first"]);
    }

    #[test]
    fn push_back_keeps_position_on_replace() {
        let col = EntityCollection::from_items([
            ("1".into(), "a".to_owned()),
            ("2".into(), "b".to_owned()),
        ]);
        assert!(!col.push_back("1".into(), "A".into()));
        assert_eq!(names(&col), ["A", "b"]);
    }

    #[test]
    fn update_replaces_in_place() {
        let col = EntityCollection::from_items([
            ("1".into(), "a".to_owned()),
            ("2".into(), "b".to_owned()),
        ]);
        let updated = col.update(&"2".into(), |s| s.push('!')).unwrap();
        assert_eq!(*updated, "b!");
        assert_eq!(names(&col), ["a", "b!"]);
        assert!(col.update(&"missing".into(), |_| {}).is_none());
    }

    #[test]
    fn remove_preserves_order() {
        let col = EntityCollection::from_items([
            ("1".into(), "a".to_owned()),
            ("2".into(), "b".to_owned()),
            ("3".into(), "c".to_owned()),
        ]);
        assert_eq!(*col.remove(&"2".into()).unwrap(), "b");
        assert!(col.remove(&"2".into()).is_none());
        assert_eq!(names(&col), ["a", "c"]);
        assert!(!col.contains(&"2".into()));
    }

    #[test]
    fn every_mutation_bumps_version_and_notifies() {
        let col: EntityCollection<String> = EntityCollection::new();
        let mut rx = col.subscribe();
        let before = col.version();

        col.push_back("1".into(), "a".into());
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 1);
        assert_eq!(col.version(), before + 1);

        col.update(&"1".into(), |s| s.push('b'));
        assert_eq!(col.version(), before + 2);
    }

    #[test]
    fn find_returns_first_match_in_order() {
        let col = EntityCollection::from_items([
            ("1".into(), "apple".to_owned()),
            ("2".into(), "avocado".to_owned()),
        ]);
        assert_eq!(*col.find(|s| s.starts_with('a')).unwrap(), "apple");
        assert!(col.find(|s| s.starts_with('z')).is_none());
    }
}

//! Favorite selection state and its persisted slot.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::storage::{KeyValueStore, StoreError};

/// Storage key holding the favorites array.
pub const FAVORITES_KEY: &str = "favorites";

/// Ordered set of favorited game ids.
///
/// Ids keep the order in which they were first added; that order is what gets
/// written to storage. Equality compares membership only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct FavoritesSet {
    ids: Vec<u32>,
}

impl PartialEq for FavoritesSet {
    fn eq(&self, other: &Self) -> bool {
        self.ids.len() == other.ids.len() && self.ids.iter().all(|id| other.contains(*id))
    }
}

impl Eq for FavoritesSet {}

impl From<Vec<u32>> for FavoritesSet {
    fn from(ids: Vec<u32>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<FavoritesSet> for Vec<u32> {
    fn from(set: FavoritesSet) -> Self {
        set.ids
    }
}

impl FavoritesSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Membership test.
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Return a new set with `id` removed if present, appended otherwise.
    pub fn toggle(&self, id: u32) -> Self {
        let mut ids = self.ids.clone();
        match ids.iter().position(|existing| *existing == id) {
            Some(index) => {
                ids.remove(index);
            }
            None => ids.push(id),
        }
        Self { ids }
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Number of favorites.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when nothing is favorited.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<u32> for FavoritesSet {
    fn from_iter<T: IntoIterator<Item = u32>>(iter: T) -> Self {
        let mut ids = Vec::new();
        for id in iter {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids }
    }
}

/// Session-scoped favorites, synchronised with a key-value slot.
pub struct FavoritesStore<S> {
    backend: S,
    key: String,
    current: FavoritesSet,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Create a store over `backend` and load the persisted set.
    pub fn open(backend: S) -> Self {
        let mut store = Self {
            backend,
            key: FAVORITES_KEY.to_string(),
            current: FavoritesSet::new(),
        };
        store.current = store.load();
        store
    }

    /// Read the persisted set. Missing or unreadable values yield an empty set.
    pub fn load(&self) -> FavoritesSet {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return FavoritesSet::new(),
            Err(err) => {
                warn!(key = %self.key, "Failed to read favorites: {err}");
                return FavoritesSet::new();
            }
        };
        match serde_json::from_str::<FavoritesSet>(&raw) {
            Ok(set) => set,
            Err(err) => {
                warn!(key = %self.key, "Ignoring malformed favorites value: {err}");
                FavoritesSet::new()
            }
        }
    }

    /// Overwrite the persisted slot with `set`.
    pub fn persist(&self, set: &FavoritesSet) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(set)?;
        self.backend.set(&self.key, &serialized)?;
        info!(count = set.len(), "Favorites saved");
        Ok(())
    }

    /// Toggle `id` in the session set and persist the result.
    ///
    /// Returns whether `id` is a favorite afterwards. The in-memory set is
    /// updated even when persisting fails.
    pub fn toggle(&mut self, id: u32) -> Result<bool, StoreError> {
        self.current = self.current.toggle(id);
        self.persist(&self.current)?;
        Ok(self.current.contains(id))
    }

    /// Whether `id` is currently a favorite.
    pub fn is_favorite(&self, id: u32) -> bool {
        self.current.contains(id)
    }

    /// Current session set.
    pub fn current(&self) -> &FavoritesSet {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore};
    use tempfile::tempdir;

    #[test]
    fn toggle_is_its_own_inverse() {
        let sets = [
            FavoritesSet::new(),
            [1].into_iter().collect(),
            [4, 2, 9].into_iter().collect::<FavoritesSet>(),
        ];
        for set in &sets {
            for id in [1, 2, 3, 9] {
                assert_eq!(set.toggle(id).toggle(id), *set);
            }
        }
    }

    #[test]
    fn equality_ignores_order() {
        let set: FavoritesSet = [1, 2].into_iter().collect();
        let reordered = set.toggle(1).toggle(1);
        assert_eq!(reordered.ids(), &[2, 1]);
        assert_eq!(reordered, set);
        assert_ne!(set.toggle(3), set);
        assert_ne!(set.toggle(2), set);
    }

    #[test]
    fn deserializing_collapses_duplicates() {
        let set: FavoritesSet = serde_json::from_str("[5,5]").expect("valid array");
        assert_eq!(set.ids(), &[5]);
        assert_eq!(set.len(), 1);

        let set: FavoritesSet = serde_json::from_str("[3,1,3]").expect("valid array");
        assert_eq!(serde_json::to_string(&set).expect("serialize"), "[3,1]");
    }

    #[test]
    fn toggle_adds_and_removes() {
        let set = FavoritesSet::new().toggle(3).toggle(1);
        assert_eq!(set.ids(), &[3, 1]);
        assert!(set.contains(3));
        let set = set.toggle(3);
        assert_eq!(set.ids(), &[1]);
        assert!(!set.contains(3));
    }

    #[test]
    fn load_without_key_is_empty_then_round_trips() -> Result<(), StoreError> {
        let store = FavoritesStore::open(MemoryStore::new());
        assert!(store.load().is_empty());

        let set: FavoritesSet = [1, 2].into_iter().collect();
        store.persist(&set)?;
        assert_eq!(store.load(), set);
        Ok(())
    }

    #[test]
    fn malformed_values_fail_soft() -> Result<(), StoreError> {
        let backend = MemoryStore::new();
        for raw in ["not json", "{\"a\":1}", "[1, \"two\"]", "[-1]"] {
            backend.set(FAVORITES_KEY, raw)?;
            let store = FavoritesStore::open(backend.clone());
            assert!(store.current().is_empty(), "expected empty set for {raw}");
        }
        Ok(())
    }

    #[test]
    fn duplicate_ids_collapse_on_load() -> Result<(), StoreError> {
        let backend = MemoryStore::new();
        backend.set(FAVORITES_KEY, "[5,2,5,2]")?;
        let store = FavoritesStore::open(backend);
        assert_eq!(store.current().ids(), &[5, 2]);
        Ok(())
    }

    #[test]
    fn session_toggle_persists_every_change() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut store = FavoritesStore::open(FileStore::in_dir(dir.path()));

        assert!(store.toggle(4)?);
        assert!(store.toggle(7)?);
        assert!(!store.toggle(4)?);
        assert!(store.is_favorite(7));
        assert!(!store.is_favorite(4));

        let reopened = FavoritesStore::open(FileStore::in_dir(dir.path()));
        assert_eq!(reopened.current().ids(), &[7]);
        Ok(())
    }

    #[test]
    fn corrupt_store_file_loads_empty() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let backend = FileStore::in_dir(dir.path());
        std::fs::write(backend.path(), "{{{")?;
        let store = FavoritesStore::open(backend);
        assert!(store.current().is_empty());
        Ok(())
    }
}

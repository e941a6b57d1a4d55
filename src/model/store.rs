//! DSM store - owns the canonical matrix state
//!
//! Every mutation is synchronous, never fails, and writes the whole
//! document back to storage before returning. A failed write is logged
//! and kept in `last_persist_error` for the status line; the in-memory
//! state stays authoritative.

use super::dsm::{normalize_sorting_key, Component, DsmState, Links, SortingKey, MAX_SORTING_KEY_LEN};
use crate::services::storage::{Storage, StorageError};
use std::collections::HashMap;
use uuid::Uuid;

/// Components added on the very first run
pub const SEED_COMPONENTS: [&str; 4] = ["Tail", "Wings", "Fuselage", "Canopy"];

pub struct DsmStore {
    state: DsmState,
    storage: Box<dyn Storage>,
    last_persist_error: Option<String>,
}

impl DsmStore {
    /// Load state from `storage`
    ///
    /// - nothing stored: seed the example components and persist them
    /// - stored but unparseable, or unreadable: start empty, log, do not seed
    pub fn open(storage: Box<dyn Storage>) -> Self {
        let mut store = Self {
            state: DsmState::default(),
            storage,
            last_persist_error: None,
        };

        match store.storage.read() {
            Ok(None) => {
                tracing::info!("no saved matrix found, seeding example components");
                for name in SEED_COMPONENTS {
                    store.add_component(name);
                }
            }
            Ok(Some(contents)) => match serde_json::from_str::<DsmState>(&contents) {
                Ok(state) => {
                    tracing::info!(components = state.components.len(), "loaded saved matrix");
                    store.state = state;
                    if !store.state.check_parity() {
                        tracing::warn!("saved sorting keys do not match components, rebuilding");
                        store.repair_sorting_keys();
                    }
                    store.repair_link_rows();
                }
                Err(e) => {
                    tracing::error!(error = %e, "error loading DSM data, starting empty");
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "error reading DSM data, starting empty");
            }
        }

        store
    }

    pub fn state(&self) -> &DsmState {
        &self.state
    }

    /// Message from the most recent failed write, cleared by the next good one
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.state)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.write(&json));

        match result {
            Ok(()) => self.last_persist_error = None,
            Err(e) => {
                tracing::error!(error = %e, "failed to save DSM data");
                self.last_persist_error = Some(e.to_string());
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Components
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a component with a fresh id, an empty sorting key and no links
    ///
    /// Returns the new id.
    pub fn add_component(&mut self, name: &str) -> String {
        let id = Uuid::new_v4().to_string();

        self.state.components.push(Component {
            id: id.clone(),
            name: name.to_string(),
        });
        self.state.sorting_keys.push(SortingKey {
            id: id.clone(),
            key: String::new(),
        });
        self.state.links.insert(id.clone(), Vec::new());

        tracing::debug!(%id, component = name, "component added");
        self.persist();
        id
    }

    /// Remove a component, its sorting key, its links and every link to it
    pub fn remove_component(&mut self, id: &str) {
        let Some(index) = self.state.position(id) else {
            return;
        };

        self.state.components.remove(index);
        self.state.sorting_keys.retain(|k| k.id != id);
        self.state.links.remove(id);
        for targets in self.state.links.values_mut() {
            targets.retain(|target| target != id);
        }

        tracing::debug!(%id, "component removed");
        self.persist();
    }

    /// Rename in place; names that trim to empty are rejected
    pub fn rename_component(&mut self, id: &str, new_name: &str) {
        if new_name.trim().is_empty() {
            return;
        }

        let Some(component) = self.state.components.iter_mut().find(|c| c.id == id) else {
            return;
        };
        if component.name == new_name {
            return;
        }

        component.name = new_name.to_string();
        self.persist();
    }

    /// Move the component at `old_index` to `new_index`
    ///
    /// Sorting keys and links are keyed by id and are left alone.
    pub fn reorder_components(&mut self, old_index: usize, new_index: usize) {
        let len = self.state.components.len();
        if old_index == new_index || old_index >= len || new_index >= len {
            return;
        }

        let moved = self.state.components.remove(old_index);
        self.state.components.insert(new_index, moved);
        self.persist();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Links
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the whole link map
    pub fn set_links(&mut self, links: Links) {
        self.state.links = links;
        self.persist();
    }

    /// Give every component a link row, as a freshly added one would have
    fn repair_link_rows(&mut self) {
        let missing: Vec<String> = self
            .state
            .components
            .iter()
            .filter(|c| !self.state.links.contains_key(&c.id))
            .map(|c| c.id.clone())
            .collect();
        if missing.is_empty() {
            return;
        }

        tracing::warn!(count = missing.len(), "saved links lack rows for some components, adding them");
        let mut links = self.state.links.clone();
        for id in missing {
            links.insert(id, Vec::new());
        }
        self.set_links(links);
    }

    /// Add or remove the stored link `row_id -> col_id`
    ///
    /// Always writes the row's own list; the bidirectional flag only
    /// changes how links are read.
    pub fn toggle_link(&mut self, row_id: &str, col_id: &str) {
        if row_id == col_id
            || self.state.component(row_id).is_none()
            || self.state.component(col_id).is_none()
        {
            return;
        }

        let mut links = self.state.links.clone();
        let targets = links.entry(row_id.to_string()).or_default();
        if let Some(pos) = targets.iter().position(|t| t == col_id) {
            targets.remove(pos);
        } else {
            targets.push(col_id.to_string());
        }

        self.set_links(links);
    }

    pub fn set_bidirectional(&mut self, flag: bool) {
        if self.state.is_bidirectional_link == flag {
            return;
        }
        self.state.is_bidirectional_link = flag;
        self.persist();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace all sorting keys; the caller keeps ids in parity with components
    pub fn set_sorting_keys(&mut self, keys: Vec<SortingKey>) {
        self.state.sorting_keys = keys;
        self.persist();
    }

    /// Set one component's key, stored uppercase
    ///
    /// Keys longer than two characters after uppercasing and unknown ids
    /// are ignored.
    pub fn set_sorting_key(&mut self, id: &str, key: &str) {
        let normalized = normalize_sorting_key(key);
        if normalized.chars().count() > MAX_SORTING_KEY_LEN {
            return;
        }

        let Some(entry) = self.state.sorting_keys.iter_mut().find(|k| k.id == id) else {
            return;
        };
        if entry.key == normalized {
            return;
        }

        entry.key = normalized;
        self.persist();
    }

    /// Rebuild one key per component, keeping keys that already exist
    ///
    /// Documents written before sorting keys existed carry none at all.
    fn repair_sorting_keys(&mut self) {
        let keys = self
            .state
            .components
            .iter()
            .map(|c| SortingKey {
                id: c.id.clone(),
                key: self.state.sorting_key(&c.id).to_string(),
            })
            .collect();
        self.set_sorting_keys(keys);
    }

    /// Reorder components by their uppercased sorting keys
    ///
    /// The sort is stable, so equal keys keep their previous relative
    /// order and repeating the sort changes nothing. Components without a
    /// key entry stay after the sorted ones in their current order.
    pub fn sort_components_by_keys(&mut self) {
        let mut keys: Vec<SortingKey> = self
            .state
            .sorting_keys
            .iter()
            .map(|k| SortingKey {
                id: k.id.clone(),
                key: normalize_sorting_key(&k.key),
            })
            .collect();
        keys.sort_by(|a, b| a.key.cmp(&b.key));

        let mut by_id: HashMap<&str, &Component> = self
            .state
            .components
            .iter()
            .map(|c| (c.id.as_str(), c))
            .collect();

        let mut sorted = Vec::with_capacity(self.state.components.len());
        for key in &keys {
            match by_id.remove(key.id.as_str()) {
                Some(component) => sorted.push(component.clone()),
                None => tracing::warn!(id = %key.id, "sorting key has no component, skipped"),
            }
        }
        sorted.extend(
            self.state
                .components
                .iter()
                .filter(|c| by_id.contains_key(c.id.as_str()))
                .cloned(),
        );

        self.state.components = sorted;
        self.state.sorting_keys = keys;
        self.persist();
    }

    /// Clear components, sorting keys and links; the bidirectional flag stays
    pub fn wipe_matrix(&mut self) {
        self.state.components.clear();
        self.state.sorting_keys.clear();
        self.state.links.clear();

        tracing::info!("matrix wiped");
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::dsm::is_linked;
    use crate::services::storage::MemoryStorage;

    fn empty_store() -> (DsmStore, MemoryStorage) {
        let storage = MemoryStorage::with_contents("{}");
        (DsmStore::open(Box::new(storage.clone())), storage)
    }

    fn store_with(names: &[&str]) -> (DsmStore, Vec<String>, MemoryStorage) {
        let (mut store, storage) = empty_store();
        let ids = names.iter().map(|n| store.add_component(n)).collect();
        (store, ids, storage)
    }

    fn saved_state(storage: &MemoryStorage) -> DsmState {
        serde_json::from_str(&storage.contents().unwrap()).unwrap()
    }

    #[test]
    fn test_first_run_seeds_examples() {
        let storage = MemoryStorage::default();
        let store = DsmStore::open(Box::new(storage.clone()));

        let names: Vec<&str> = store.state().components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, SEED_COMPONENTS);
        assert!(store.state().check_parity());
        assert_eq!(saved_state(&storage), *store.state());
    }

    #[test]
    fn test_seeding_does_not_repeat_after_wipe() {
        let storage = MemoryStorage::default();
        let mut store = DsmStore::open(Box::new(storage.clone()));
        store.wipe_matrix();
        drop(store);

        let reopened = DsmStore::open(Box::new(storage));
        assert!(reopened.state().components.is_empty());
    }

    #[test]
    fn test_corrupted_storage_starts_empty() {
        let storage = MemoryStorage::with_contents("not json {");
        let store = DsmStore::open(Box::new(storage.clone()));

        assert_eq!(*store.state(), DsmState::default());
        // Nothing written until the first mutation
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_missing_sorting_keys_are_rebuilt_on_load() {
        let storage = MemoryStorage::with_contents(
            r#"{"components":[{"id":"1","name":"Tail"},{"id":"2","name":"Wings"}],
                "sortingKeys":[{"id":"2","key":"A"},{"id":"gone","key":"B"}],
                "links":{"1":["2"]}}"#,
        );
        let store = DsmStore::open(Box::new(storage.clone()));

        let state = store.state();
        assert!(state.check_parity());
        assert_eq!(state.sorting_key("1"), "");
        assert_eq!(state.sorting_key("2"), "A");
        assert_eq!(state.links["1"], vec!["2".to_string()]);
        assert_eq!(saved_state(&storage), *state);
    }

    #[test]
    fn test_null_fields_keep_saved_components() {
        let storage = MemoryStorage::with_contents(
            r#"{"components":[{"id":"1","name":"Tail"}],
                "sortingKeys":[{"id":"1","key":"A"}],
                "links":null}"#,
        );
        let store = DsmStore::open(Box::new(storage.clone()));

        let state = store.state();
        assert_eq!(state.components.len(), 1);
        assert_eq!(state.sorting_key("1"), "A");
        assert_eq!(state.links.get("1"), Some(&Vec::new()));
        assert_eq!(saved_state(&storage), *state);
    }

    #[test]
    fn test_toggle_twice_after_load_without_link_row() {
        let storage = MemoryStorage::with_contents(
            r#"{"components":[{"id":"1","name":"Tail"},{"id":"2","name":"Wings"}],
                "sortingKeys":[{"id":"1","key":""},{"id":"2","key":""}],
                "links":{"2":[]}}"#,
        );
        let mut store = DsmStore::open(Box::new(storage));
        let before = store.state().clone();

        store.toggle_link("1", "2");
        store.toggle_link("1", "2");

        assert_eq!(*store.state(), before);
    }

    #[test]
    fn test_add_component_grows_all_collections() {
        let storage = MemoryStorage::with_contents(
            r#"{"components":[{"id":"1","name":"Tail"}],"sortingKeys":[{"id":"1","key":""}],"links":{"1":[]}}"#,
        );
        let mut store = DsmStore::open(Box::new(storage.clone()));

        let wing = store.add_component("Wing");

        let state = store.state();
        let names: Vec<&str> = state.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Tail", "Wing"]);
        assert_eq!(state.links.get(&wing), Some(&Vec::new()));
        assert_eq!(
            state.sorting_keys.last(),
            Some(&SortingKey {
                id: wing.clone(),
                key: String::new()
            })
        );
        assert_eq!(saved_state(&storage), *state);
    }

    #[test]
    fn test_ids_are_unique() {
        let (store, ids, _) = store_with(&["A", "A", "A"]);
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_eq!(store.state().components.len(), 3);
    }

    #[test]
    fn test_parity_holds_across_add_and_remove() {
        let (mut store, ids, _) = store_with(&["A", "B", "C", "D"]);
        store.remove_component(&ids[1]);
        store.add_component("E");
        store.remove_component(&ids[3]);
        store.remove_component("missing");

        assert!(store.state().check_parity());
        assert_eq!(store.state().components.len(), 3);
    }

    #[test]
    fn test_remove_purges_links_and_keeps_order() {
        let (mut store, ids, _) = store_with(&["A", "B", "C"]);
        store.toggle_link(&ids[0], &ids[1]);
        store.toggle_link(&ids[2], &ids[1]);
        store.toggle_link(&ids[1], &ids[2]);

        store.remove_component(&ids[1]);

        let state = store.state();
        assert!(!state.links.contains_key(&ids[1]));
        assert!(state.links.values().all(|targets| !targets.contains(&ids[1])));
        let names: Vec<&str> = state.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        let key_ids: Vec<&str> = state.sorting_keys.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(key_ids, [ids[0].as_str(), ids[2].as_str()]);
    }

    #[test]
    fn test_rename_rejects_blank() {
        let (mut store, ids, _) = store_with(&["Tail"]);

        store.rename_component(&ids[0], "   ");
        assert_eq!(store.state().components[0].name, "Tail");

        store.rename_component(&ids[0], "Rudder");
        assert_eq!(store.state().components[0].name, "Rudder");
    }

    #[test]
    fn test_reorder_moves_component_only() {
        let (mut store, ids, _) = store_with(&["A", "B", "C"]);
        let keys_before = store.state().sorting_keys.clone();

        store.reorder_components(0, 2);

        let order: Vec<&str> = store.state().components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(order, [ids[1].as_str(), ids[2].as_str(), ids[0].as_str()]);
        assert_eq!(store.state().sorting_keys, keys_before);
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let (mut store, _, storage) = store_with(&["A", "B"]);
        let before = store.state().clone();
        let writes = storage.write_count();

        store.reorder_components(1, 1);
        store.reorder_components(0, 9);

        assert_eq!(*store.state(), before);
        assert_eq!(storage.write_count(), writes);
    }

    #[test]
    fn test_toggle_link_twice_restores_state() {
        let (mut store, ids, _) = store_with(&["A", "B"]);
        let before = store.state().clone();

        store.toggle_link(&ids[0], &ids[1]);
        assert_eq!(store.state().links[&ids[0]], vec![ids[1].clone()]);

        store.toggle_link(&ids[0], &ids[1]);
        assert_eq!(*store.state(), before);
    }

    #[test]
    fn test_toggle_link_ignores_self_and_unknown() {
        let (mut store, ids, _) = store_with(&["A"]);
        let before = store.state().clone();

        store.toggle_link(&ids[0], &ids[0]);
        store.toggle_link(&ids[0], "ghost");

        assert_eq!(*store.state(), before);
    }

    #[test]
    fn test_toggle_link_writes_row_direction_when_bidirectional() {
        let (mut store, ids, _) = store_with(&["A", "B"]);
        store.set_bidirectional(true);

        store.toggle_link(&ids[1], &ids[0]);

        let state = store.state();
        assert_eq!(state.links[&ids[1]], vec![ids[0].clone()]);
        assert!(state.links[&ids[0]].is_empty());
        assert!(is_linked(&ids[0], &ids[1], &state.links, true));
    }

    #[test]
    fn test_set_sorting_key_validates() {
        let (mut store, ids, _) = store_with(&["A"]);

        store.set_sorting_key(&ids[0], "abc");
        assert_eq!(store.state().sorting_key(&ids[0]), "");

        store.set_sorting_key(&ids[0], "b1");
        assert_eq!(store.state().sorting_key(&ids[0]), "B1");

        // 'ß' uppercases to "SS", so "aß" would become three characters
        store.set_sorting_key(&ids[0], "aß");
        assert_eq!(store.state().sorting_key(&ids[0]), "B1");

        store.set_sorting_key(&ids[0], "ß");
        assert_eq!(store.state().sorting_key(&ids[0]), "SS");
    }

    #[test]
    fn test_set_links_replaces_map_and_persists() {
        let (mut store, ids, storage) = store_with(&["A", "B"]);
        store.toggle_link(&ids[0], &ids[1]);

        let mut links = Links::new();
        links.insert(ids[1].clone(), vec![ids[0].clone()]);
        store.set_links(links.clone());

        assert_eq!(store.state().links, links);
        assert_eq!(saved_state(&storage).links, links);
    }

    #[test]
    fn test_sort_by_keys() {
        let storage = MemoryStorage::with_contents(
            r#"{"components":[{"id":"1","name":"X"},{"id":"2","name":"Y"}],
                "sortingKeys":[{"id":"1","key":"B"},{"id":"2","key":"A"}]}"#,
        );
        let mut store = DsmStore::open(Box::new(storage));

        store.sort_components_by_keys();

        let order: Vec<&str> = store.state().components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, ["Y", "X"]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let (mut store, ids, _) = store_with(&["A", "B", "C", "D"]);
        store.set_sorting_keys(vec![
            SortingKey { id: ids[0].clone(), key: "b".to_string() },
            SortingKey { id: ids[1].clone(), key: "A".to_string() },
            SortingKey { id: ids[2].clone(), key: "B".to_string() },
            SortingKey { id: ids[3].clone(), key: "a".to_string() },
        ]);

        store.sort_components_by_keys();
        let once: Vec<String> = store.state().components.iter().map(|c| c.name.clone()).collect();
        assert_eq!(once, ["B", "D", "A", "C"]);

        store.sort_components_by_keys();
        let twice: Vec<String> = store.state().components.iter().map(|c| c.name.clone()).collect();
        assert_eq!(once, twice);
        assert!(store.state().sorting_keys.iter().all(|k| k.key == k.key.to_uppercase()));
    }

    #[test]
    fn test_sort_tolerates_stale_keys() {
        let (mut store, ids, _) = store_with(&["A", "B", "C"]);
        store.set_sorting_keys(vec![
            SortingKey { id: "ghost".to_string(), key: "A".to_string() },
            SortingKey { id: ids[2].clone(), key: "B".to_string() },
        ]);

        store.sort_components_by_keys();

        let order: Vec<&str> = store.state().components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(order, ["C", "A", "B"]);
    }

    #[test]
    fn test_wipe_keeps_bidirectional_flag() {
        let (mut store, ids, storage) = store_with(&["A", "B"]);
        store.toggle_link(&ids[0], &ids[1]);
        store.set_bidirectional(true);

        store.wipe_matrix();

        let state = saved_state(&storage);
        assert!(state.components.is_empty());
        assert!(state.sorting_keys.is_empty());
        assert!(state.links.is_empty());
        assert!(state.is_bidirectional_link);
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let (mut store, ids, storage) = store_with(&["A", "B"]);

        store.rename_component(&ids[0], "Nose");
        assert_eq!(saved_state(&storage).components[0].name, "Nose");

        store.toggle_link(&ids[0], &ids[1]);
        assert_eq!(saved_state(&storage).links[&ids[0]], vec![ids[1].clone()]);

        store.set_bidirectional(true);
        assert!(saved_state(&storage).is_bidirectional_link);
        assert!(store.last_persist_error().is_none());
    }
}

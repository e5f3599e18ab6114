// Active tab tracking: persisted index resolution and change notification

use crate::catalog::TabRecord;
use crate::store::{storage_key, KeyValueStore};

type Observer = Box<dyn FnMut(&str)>;

/// Clamp a persisted index to the visible list.
///
/// Anything that is not a position in a list of `len` tabs (missing,
/// negative, past the end) falls back to the first tab.
pub fn resolve_index(persisted: Option<i64>, len: usize) -> usize {
    persisted
        .and_then(|idx| usize::try_from(idx).ok())
        .filter(|&idx| idx < len)
        .unwrap_or(0)
}

/// Parse a stored index. Non-numeric values read as "nothing stored".
pub fn parse_persisted(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Keeps track of which visible tab is active across re-filtering.
///
/// The tracker owns the store the index is persisted to and notifies the
/// registered observer whenever the active tab id changes, whether the user
/// picked another tab or the visible list changed underneath the selection.
pub struct SelectionTracker<S> {
    key: String,
    store: S,
    position_to_id: Vec<String>,
    last_notified: Option<String>,
    observer: Option<Observer>,
}

impl<S: KeyValueStore> SelectionTracker<S> {
    pub fn new(container_name: &str, store: S) -> Self {
        SelectionTracker {
            key: storage_key(container_name),
            store,
            position_to_id: Vec::new(),
            last_notified: None,
            observer: None,
        }
    }

    /// Register the callback receiving the new active tab id.
    pub fn on_change<F>(&mut self, observer: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.observer = Some(Box::new(observer));
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn last_notified(&self) -> Option<&str> {
        self.last_notified.as_deref()
    }

    pub fn position_to_id(&self) -> &[String] {
        &self.position_to_id
    }

    /// Rebuild the position to id mapping from a freshly filtered list.
    pub fn evaluate<P, R>(&mut self, visible: &[&TabRecord<P, R>]) -> &[String] {
        self.position_to_id = visible.iter().map(|record| record.id.clone()).collect();
        &self.position_to_id
    }

    /// The stored index, if the store holds a parseable one.
    pub fn persisted_index(&self) -> Option<i64> {
        match self.store.get(&self.key) {
            Ok(raw) => raw.as_deref().and_then(parse_persisted),
            Err(e) => {
                log::warn!("Failed to read selected tab for {}: {}", self.key, e);
                None
            }
        }
    }

    /// The persisted index resolved against the last evaluated list.
    pub fn selected_index(&self) -> usize {
        resolve_index(self.persisted_index(), self.position_to_id.len())
    }

    /// The user picked the tab at `index`.
    ///
    /// Returns the id that was announced, if the active tab changed.
    pub fn on_select(&mut self, index: usize) -> Option<String> {
        if let Err(e) = self.store.set(&self.key, &index.to_string()) {
            log::warn!("Failed to persist selected tab for {}: {}", self.key, e);
        }
        self.notify_position(index)
    }

    /// The visible list was recomputed (permissions or requested ids changed).
    ///
    /// Returns the id that was announced, if the active tab changed.
    pub fn on_visible_list_changed<P, R>(
        &mut self,
        visible: &[&TabRecord<P, R>],
    ) -> Option<String> {
        self.evaluate(visible);
        let index = self.selected_index();
        self.notify_position(index)
    }

    fn notify_position(&mut self, index: usize) -> Option<String> {
        let id = self.position_to_id.get(index)?;
        if self.last_notified.as_deref() == Some(id.as_str()) {
            return None;
        }

        let id = id.clone();
        log::debug!("{}: active tab is now {} (position {})", self.key, id, index);
        self.last_notified = Some(id.clone());
        if let Some(observer) = self.observer.as_mut() {
            observer(&id);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::error::StoreError;
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    fn tab(id: &str, perms: &[&'static str]) -> TabRecord<&'static str, ()> {
        TabRecord::new(id, id, ()).with_permissions(perms.iter().copied())
    }

    type Seen = Rc<RefCell<Vec<String>>>;

    fn recording_tracker<S: KeyValueStore>(store: S) -> (SelectionTracker<S>, Seen) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut tracker = SelectionTracker::new("main", store);
        tracker.on_change(move |id| sink.borrow_mut().push(id.to_string()));
        (tracker, seen)
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(Some(5), 3), 0);
        assert_eq!(resolve_index(Some(1), 3), 1);
        assert_eq!(resolve_index(Some(-1), 3), 0);
        assert_eq!(resolve_index(Some(3), 3), 0);
        assert_eq!(resolve_index(None, 3), 0);
        assert_eq!(resolve_index(Some(0), 0), 0);
    }

    #[test]
    fn test_parse_persisted() {
        assert_eq!(parse_persisted("2"), Some(2));
        assert_eq!(parse_persisted(" 4\n"), Some(4));
        assert_eq!(parse_persisted("-1"), Some(-1));
        assert_eq!(parse_persisted("abc"), None);
        assert_eq!(parse_persisted(""), None);
    }

    #[test]
    fn test_evaluate_builds_mapping_in_order() {
        let catalog = Catalog::new(vec![tab("a", &[]), tab("b", &[]), tab("c", &[])]);
        let mut tracker = SelectionTracker::new("main", MemoryStore::new());
        let visible = catalog.filter(&["c", "a"], &[]);
        assert_eq!(tracker.evaluate(&visible), ["c".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_first_evaluation_notifies() {
        let catalog = Catalog::new(vec![tab("a", &[]), tab("b", &[])]);
        let (mut tracker, seen) = recording_tracker(MemoryStore::new());

        let changed = tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &[]));
        assert_eq!(changed.as_deref(), Some("a"));
        assert_eq!(*seen.borrow(), vec!["a"]);
        assert_eq!(tracker.last_notified(), Some("a"));
    }

    #[test]
    fn test_empty_list_does_not_notify() {
        let catalog: Catalog<&'static str, ()> = Catalog::new(vec![]);
        let (mut tracker, seen) = recording_tracker(MemoryStore::new());

        assert_eq!(tracker.on_visible_list_changed(&catalog.filter(&["a"], &[])), None);
        assert!(seen.borrow().is_empty());
        assert_eq!(tracker.last_notified(), None);
        assert_eq!(tracker.selected_index(), 0);
    }

    #[test]
    fn test_persisted_index_restored() {
        let mut store = MemoryStore::new();
        store.set("main_defaultTabIndex", "1").unwrap();
        let catalog = Catalog::new(vec![tab("a", &[]), tab("b", &[])]);
        let (mut tracker, seen) = recording_tracker(store);

        tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &[]));
        assert_eq!(tracker.selected_index(), 1);
        assert_eq!(*seen.borrow(), vec!["b"]);
    }

    #[test]
    fn test_malformed_persisted_index_falls_back() {
        for raw in ["oops", "-3", "9"] {
            let mut store = MemoryStore::new();
            store.set("main_defaultTabIndex", raw).unwrap();
            let catalog = Catalog::new(vec![tab("a", &[]), tab("b", &[])]);
            let (mut tracker, seen) = recording_tracker(store);

            tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &[]));
            assert_eq!(tracker.selected_index(), 0, "stored value {:?}", raw);
            assert_eq!(*seen.borrow(), vec!["a"]);
        }
    }

    #[test]
    fn test_on_select_persists_and_notifies_once() {
        let catalog = Catalog::new(vec![tab("a", &[]), tab("b", &[])]);
        let (mut tracker, seen) = recording_tracker(MemoryStore::new());
        tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &[]));

        assert_eq!(tracker.on_select(1).as_deref(), Some("b"));
        assert_eq!(tracker.on_select(1), None);
        assert_eq!(
            tracker.store().get("main_defaultTabIndex").unwrap(),
            Some("1".to_string())
        );
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_on_select_out_of_range_persists_without_notifying() {
        let catalog = Catalog::new(vec![tab("a", &[])]);
        let (mut tracker, seen) = recording_tracker(MemoryStore::new());
        tracker.on_visible_list_changed(&catalog.filter(&["a"], &[]));

        assert_eq!(tracker.on_select(4), None);
        assert_eq!(tracker.persisted_index(), Some(4));
        assert_eq!(tracker.selected_index(), 0);
        assert_eq!(*seen.borrow(), vec!["a"]);
    }

    #[test]
    fn test_hidden_active_tab_notifies_replacement() {
        let catalog = Catalog::new(vec![tab("a", &["x"]), tab("b", &["y"])]);
        let (mut tracker, seen) = recording_tracker(MemoryStore::new());

        tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &["x"]));
        assert_eq!(tracker.position_to_id(), ["a".to_string()]);

        let changed = tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &["y"]));
        assert_eq!(changed.as_deref(), Some("b"));
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_unchanged_selection_is_silent() {
        let catalog = Catalog::new(vec![tab("a", &["x"]), tab("b", &["x"])]);
        let (mut tracker, seen) = recording_tracker(MemoryStore::new());

        for _ in 0..3 {
            tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &["x"]));
        }
        assert_eq!(*seen.borrow(), vec!["a"]);
    }

    #[test]
    fn test_list_emptied_then_restored() {
        let catalog = Catalog::new(vec![tab("a", &["x"])]);
        let (mut tracker, seen) = recording_tracker(MemoryStore::new());

        tracker.on_visible_list_changed(&catalog.filter(&["a"], &["x"]));
        assert_eq!(tracker.on_visible_list_changed(&catalog.filter(&["a"], &["z"])), None);
        assert_eq!(tracker.last_notified(), Some("a"));
        assert_eq!(tracker.on_visible_list_changed(&catalog.filter(&["a"], &["x"])), None);
        assert_eq!(*seen.borrow(), vec!["a"]);
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Io(io::Error::other("read failed")))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(io::Error::other("write failed")))
        }
    }

    #[test]
    fn test_store_failures_do_not_block_notifications() {
        let catalog = Catalog::new(vec![tab("a", &[]), tab("b", &[])]);
        let (mut tracker, seen) = recording_tracker(FailingStore);

        let changed = tracker.on_visible_list_changed(&catalog.filter(&["a", "b"], &[]));
        assert_eq!(changed.as_deref(), Some("a"));
        assert_eq!(tracker.persisted_index(), None);
        assert_eq!(tracker.selected_index(), 0);

        assert_eq!(tracker.on_select(1).as_deref(), Some("b"));
        assert_eq!(tracker.selected_index(), 0);
        assert_eq!(*seen.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_works_without_observer() {
        let catalog = Catalog::new(vec![tab("a", &[])]);
        let mut tracker = SelectionTracker::new("plain", MemoryStore::new());
        assert_eq!(tracker.storage_key(), "plain_defaultTabIndex");
        assert_eq!(
            tracker.on_visible_list_changed(&catalog.filter(&["a"], &[])).as_deref(),
            Some("a")
        );
    }
}

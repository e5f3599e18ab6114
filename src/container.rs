// Tab container: catalog + selection tracking + panel rendering

use serde_json::Value;

use crate::catalog::{Catalog, TabRecord};
use crate::config::ContainerConfig;
use crate::selection::SelectionTracker;
use crate::store::KeyValueStore;

/// Class every container carries before any configured extras.
pub const BASE_CLASS: &str = "tabs-container";

/// Arguments handed to a tab's renderer when its panel is built.
#[derive(Debug)]
pub struct PanelProps<'a, P> {
    /// The tab's label.
    pub name: &'a str,
    pub view_type: &'a str,
    pub permissions: &'a [P],
    /// Caller data passed through to every panel untouched.
    pub extra_data: &'a Value,
}

/// A group of tabs filtered by permission, with a persisted active tab.
pub struct TabsContainer<P, R, S> {
    catalog: Catalog<P, R>,
    tracker: SelectionTracker<S>,
    config: ContainerConfig,
}

impl<P: PartialEq, R, S: KeyValueStore> TabsContainer<P, R, S> {
    pub fn new(catalog: Catalog<P, R>, config: ContainerConfig, store: S) -> Self {
        let tracker = SelectionTracker::new(&config.container_name, store);
        TabsContainer {
            catalog,
            tracker,
            config,
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog<P, R> {
        &self.catalog
    }

    pub fn tracker(&self) -> &SelectionTracker<S> {
        &self.tracker
    }

    /// Register the callback receiving the new active tab id.
    pub fn on_change<F>(&mut self, observer: F)
    where
        F: FnMut(&str) + 'static,
    {
        self.tracker.on_change(observer);
    }

    pub fn class_list(&self) -> String {
        match self.config.classes.as_deref() {
            Some(extra) if !extra.trim().is_empty() => format!("{} {}", BASE_CLASS, extra.trim()),
            _ => BASE_CLASS.to_string(),
        }
    }

    /// Tabs the holder of `granted` may see, in configured order.
    pub fn visible(&self, granted: &[P]) -> Vec<&TabRecord<P, R>> {
        self.catalog.filter(&self.config.tab_list, granted)
    }

    /// Re-filter for `granted` and let the tracker re-resolve the active tab.
    ///
    /// Call on every update cycle, before reading `selected_index`. Returns
    /// the newly announced active id, if it changed.
    pub fn refresh(&mut self, granted: &[P]) -> Option<String> {
        let visible = self.catalog.filter(&self.config.tab_list, granted);
        self.tracker.on_visible_list_changed(&visible)
    }

    pub fn tab_labels(&self, granted: &[P]) -> Vec<&str> {
        self.visible(granted)
            .into_iter()
            .map(|record| record.label.as_str())
            .collect()
    }

    /// Render the panel of every visible tab, in tab order.
    pub fn tab_panels<O>(&self, granted: &[P], extra_data: &Value) -> Vec<O>
    where
        R: Fn(&PanelProps<'_, P>) -> O,
    {
        self.visible(granted)
            .into_iter()
            .map(|record| {
                let props = PanelProps {
                    name: &record.label,
                    view_type: &self.config.view_type,
                    permissions: granted,
                    extra_data,
                };
                (record.renderer)(&props)
            })
            .collect()
    }

    /// Active position in the list seen by the last `refresh`.
    pub fn selected_index(&self) -> usize {
        self.tracker.selected_index()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.tracker
            .position_to_id()
            .get(self.selected_index())
            .map(String::as_str)
    }

    /// The user picked the tab at `index`.
    pub fn select(&mut self, index: usize) -> Option<String> {
        self.tracker.on_select(index)
    }
}

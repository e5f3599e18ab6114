//! Permission-filtered tab containers.
//!
//! A [`Catalog`] holds every tab definition a container may show. Each update
//! cycle the caller passes the requested tab ids and the user's granted
//! permissions; [`Catalog::filter`] returns the visible tabs in requested
//! order, and a [`SelectionTracker`] keeps the persisted active tab valid for
//! that list, announcing the active tab id whenever it changes.
//!
//! [`TabsContainer`] bundles both with a [`ContainerConfig`] and renders
//! panels; [`tab`] and [`line`] draw a terminal tab strip.

pub mod catalog;
pub mod config;
pub mod container;
pub mod error;
pub mod line;
pub mod selection;
pub mod store;
pub mod tab;

pub use catalog::{Access, AccessPredicate, Catalog, TabRecord, WILDCARD};
pub use config::ContainerConfig;
pub use container::{PanelProps, TabsContainer, BASE_CLASS};
pub use error::StoreError;
pub use selection::{resolve_index, SelectionTracker};
pub use store::{storage_key, JsonFileStore, KeyValueStore, MemoryStore};

// Tab catalog and permission filtering

use std::fmt;
use std::sync::Arc;

/// Requested-id token that selects every record in the catalog.
pub const WILDCARD: &str = "all";

/// Custom visibility check for a single record. Receives the record and the
/// granted permissions; its answer replaces the default intersection rule.
pub type AccessPredicate<P, R> = Arc<dyn Fn(&TabRecord<P, R>, &[P]) -> bool + Send + Sync>;

/// How a record decides whether the current user may see it.
pub enum Access<P, R> {
    /// Visible when at least one required permission is granted.
    Default,
    /// Visible when the predicate says so.
    Custom(AccessPredicate<P, R>),
}

impl<P, R> Default for Access<P, R> {
    fn default() -> Self {
        Access::Default
    }
}

impl<P, R> Clone for Access<P, R> {
    fn clone(&self) -> Self {
        match self {
            Access::Default => Access::Default,
            Access::Custom(predicate) => Access::Custom(Arc::clone(predicate)),
        }
    }
}

impl<P, R> fmt::Debug for Access<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Default => f.write_str("Default"),
            Access::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One tab definition: what to call it, what to render, and who may see it.
///
/// `renderer` is carried along untouched; filtering never calls it.
pub struct TabRecord<P, R> {
    pub id: String,
    pub label: String,
    pub renderer: R,
    pub required_permissions: Vec<P>,
    pub access: Access<P, R>,
}

impl<P, R> TabRecord<P, R> {
    pub fn new(id: impl Into<String>, label: impl Into<String>, renderer: R) -> Self {
        TabRecord {
            id: id.into(),
            label: label.into(),
            renderer,
            required_permissions: Vec::new(),
            access: Access::Default,
        }
    }

    pub fn with_permissions(mut self, permissions: impl IntoIterator<Item = P>) -> Self {
        self.required_permissions = permissions.into_iter().collect();
        self
    }

    /// Replace the default permission rule with `predicate`.
    pub fn with_access<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&TabRecord<P, R>, &[P]) -> bool + Send + Sync + 'static,
    {
        self.access = Access::Custom(Arc::new(predicate));
        self
    }
}

impl<P: PartialEq, R> TabRecord<P, R> {
    /// Access check against the granted permissions.
    ///
    /// An empty grant means the caller applies no restriction. Otherwise a
    /// custom predicate is authoritative, and without one the record needs at
    /// least one of its required permissions granted. A record that requires
    /// nothing is therefore hidden as soon as any permission is granted.
    pub fn passes(&self, granted: &[P]) -> bool {
        if granted.is_empty() {
            return true;
        }

        match &self.access {
            Access::Custom(predicate) => predicate(self, granted),
            Access::Default => self
                .required_permissions
                .iter()
                .any(|required| granted.contains(required)),
        }
    }
}

impl<P: fmt::Debug, R> fmt::Debug for TabRecord<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabRecord")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("required_permissions", &self.required_permissions)
            .field("access", &self.access)
            .finish_non_exhaustive()
    }
}

/// The full, fixed list of tab definitions a container can show.
pub struct Catalog<P, R> {
    records: Vec<TabRecord<P, R>>,
}

impl<P, R> Catalog<P, R> {
    pub fn new(records: Vec<TabRecord<P, R>>) -> Self {
        Catalog { records }
    }

    pub fn records(&self) -> &[TabRecord<P, R>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<P, R> FromIterator<TabRecord<P, R>> for Catalog<P, R> {
    fn from_iter<I: IntoIterator<Item = TabRecord<P, R>>>(iter: I) -> Self {
        Catalog::new(iter.into_iter().collect())
    }
}

impl<P: fmt::Debug, R> fmt::Debug for Catalog<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.records).finish()
    }
}

impl<P: PartialEq, R> Catalog<P, R> {
    /// Select the records the user may see, ordered by `requested`.
    ///
    /// Each requested id appends every accessible record carrying that id, so
    /// repeated ids (in `requested` or in the catalog) produce repeated
    /// entries. A [`WILDCARD`] makes every record a candidate but only orders
    /// the output when no explicit id is requested: then the accessible
    /// records come back in catalog order. Mixed with explicit ids it adds
    /// nothing beyond a record literally named `"all"`.
    pub fn filter<I: AsRef<str>>(
        &self,
        requested: &[I],
        granted: &[P],
    ) -> Vec<&TabRecord<P, R>> {
        let requested: Vec<&str> = requested.iter().map(|req| req.as_ref()).collect();
        let wildcard = requested.contains(&WILDCARD);
        let explicit = requested.iter().any(|&req| req != WILDCARD);

        let retained: Vec<&TabRecord<P, R>> = self
            .records
            .iter()
            .filter(|record| wildcard || requested.iter().any(|&req| req == record.id))
            .filter(|record| record.passes(granted))
            .collect();

        let visible: Vec<&TabRecord<P, R>> = if wildcard && !explicit {
            retained
        } else {
            requested
                .iter()
                .flat_map(|&req| retained.iter().copied().filter(move |record| record.id == req))
                .collect()
        };

        log::debug!(
            "filtered {} of {} tabs for {} requested ids",
            visible.len(),
            self.records.len(),
            requested.len()
        );
        visible
    }
}

// Container configuration

use serde::{Deserialize, Serialize};

use crate::catalog::WILDCARD;

const DEFAULT_CONTAINER_NAME: &str = "tabs";
const DEFAULT_VIEW_TYPE: &str = "top-level";

/// Per-container settings: which tabs to request and how panels are called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Names the persisted selection; must be unique per store.
    pub container_name: String,
    /// How the container is used, e.g. "top-level" or "sub-component".
    pub view_type: String,
    /// Extra classes appended after the base container class.
    pub classes: Option<String>,
    /// Requested tab ids, in display order.
    pub tab_list: Vec<String>,
    /// Permissions granted to the current user. Carried for callers that
    /// load the grant alongside the rest of the settings; `TabsContainer`
    /// takes the grant explicitly on every call.
    pub permissions: Vec<String>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        ContainerConfig {
            container_name: DEFAULT_CONTAINER_NAME.to_string(),
            view_type: DEFAULT_VIEW_TYPE.to_string(),
            classes: None,
            tab_list: vec![WILDCARD.to_string()],
            permissions: Vec::new(),
        }
    }
}

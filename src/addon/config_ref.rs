use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer from a `ManagedClusterAddOn` to one of its configuration objects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigReference {
    #[serde(default)]
    pub group: String,
    pub resource: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

/// Namespaced name of an object. The default (empty) key means
/// "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct ObjectKey {
    pub name: String,
    pub namespace: String,
}

impl ObjectKey {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.namespace.is_empty()
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// Returns the key of the first reference whose group and resource both
/// match, or the empty key when none do.
pub fn resolve(refs: &[ConfigReference], group: &str, resource: &str) -> ObjectKey {
    refs.iter()
        .find(|r| r.group == group && r.resource == resource)
        .map(|r| ObjectKey::new(r.name.clone(), r.namespace.clone()))
        .unwrap_or_default()
}

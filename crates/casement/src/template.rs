//! Named setup templates.
//!
//! A template is a configuration fragment registered once under a name
//! and merged underneath a window's own fields at create time. Templates
//! are first-registration-wins: `register` refuses to overwrite, and
//! deliberate redefinition goes through `replace`.

use std::collections::HashMap;

use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Registry of named configuration fragments.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, Map<String, Value>>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template under a name.
    ///
    /// Returns `false` (and leaves the registry unchanged) when the name
    /// is already taken.
    pub fn register(&self, name: &str, fragment: Map<String, Value>) -> bool {
        let mut templates = self.templates.write();
        if templates.contains_key(name) {
            tracing::warn!(
                target: "casement::template",
                name,
                "template already registered, keeping the existing one"
            );
            return false;
        }
        templates.insert(name.to_string(), fragment);
        true
    }

    /// Replace a template wholesale, registering it if absent.
    pub fn replace(&self, name: &str, fragment: Map<String, Value>) {
        self.templates.write().insert(name.to_string(), fragment);
    }

    /// Shallow-merge a fragment into an existing template, overwriting
    /// the keys it names.
    ///
    /// Returns `false` when no template with that name exists.
    pub fn modify(&self, name: &str, fragment: Map<String, Value>) -> bool {
        let mut templates = self.templates.write();
        match templates.get_mut(name) {
            Some(existing) => {
                existing.extend(fragment);
                true
            }
            None => {
                tracing::warn!(
                    target: "casement::template",
                    name,
                    "cannot modify an unregistered template"
                );
                false
            }
        }
    }

    /// Fetch a copy of a template.
    pub fn get(&self, name: &str) -> Option<Map<String, Value>> {
        self.templates.read().get(name).cloned()
    }

    /// Fetch a single property of a template.
    pub fn get_prop(&self, name: &str, key: &str) -> Option<Value> {
        self.templates.read().get(name)?.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_first_registration_wins() {
        let registry = TemplateRegistry::new();
        assert!(registry.register("small", fragment(json!({ "width": 400 }))));
        assert!(!registry.register("small", fragment(json!({ "width": 999 }))));
        assert_eq!(registry.get_prop("small", "width"), Some(json!(400)));
    }

    #[test]
    fn test_replace_overwrites() {
        let registry = TemplateRegistry::new();
        registry.register("small", fragment(json!({ "width": 400, "height": 300 })));
        registry.replace("small", fragment(json!({ "width": 999 })));
        assert_eq!(registry.get_prop("small", "width"), Some(json!(999)));
        // Replace is wholesale, not a merge.
        assert_eq!(registry.get_prop("small", "height"), None);
    }

    #[test]
    fn test_modify_merges_shallowly() {
        let registry = TemplateRegistry::new();
        registry.register("small", fragment(json!({ "width": 400, "height": 300 })));
        assert!(registry.modify("small", fragment(json!({ "width": 500 }))));
        assert_eq!(registry.get_prop("small", "width"), Some(json!(500)));
        assert_eq!(registry.get_prop("small", "height"), Some(json!(300)));

        assert!(!registry.modify("missing", fragment(json!({ "width": 1 }))));
    }

    #[test]
    fn test_get_missing() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.get("nope"), None);
        assert_eq!(registry.get_prop("nope", "width"), None);
    }
}

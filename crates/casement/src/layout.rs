//! Named layout wrappers and page composition.
//!
//! A layout is an HTML shell fetched once per load and wrapped around
//! page content: the first `{{content}}` placeholder receives the page
//! body, and every `{{appBase}}` occurrence (in both shell and body) is
//! substituted with the application base path.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::config::resolve_locator;

/// Placeholder in a layout shell that receives the page content.
pub const CONTENT_TOKEN: &str = "{{content}}";

/// Placeholder substituted with the application base path during
/// composition.
pub const COMPOSE_APP_BASE_TOKEN: &str = "{{appBase}}";

/// Registry mapping layout names to resolved shell locators.
#[derive(Debug, Default)]
pub struct LayoutRegistry {
    layouts: RwLock<HashMap<String, String>>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layout shell locator under a name.
    ///
    /// The locator is resolved against `app_base` up front, so later
    /// loads need no further path work. Returns `false` when the name is
    /// already taken.
    pub fn register(&self, name: &str, locator: &str, app_base: &str) -> bool {
        let mut layouts = self.layouts.write();
        if layouts.contains_key(name) {
            tracing::warn!(
                target: "casement::layout",
                name,
                "layout already registered, keeping the existing one"
            );
            return false;
        }
        layouts.insert(name.to_string(), resolve_locator(app_base, locator));
        true
    }

    /// Replace a layout's shell locator, registering it if absent.
    pub fn replace(&self, name: &str, locator: &str, app_base: &str) {
        self.layouts
            .write()
            .insert(name.to_string(), resolve_locator(app_base, locator));
    }

    /// The resolved shell locator for a layout.
    pub fn get(&self, name: &str) -> Option<String> {
        self.layouts.read().get(name).cloned()
    }
}

/// Compose a fetched layout shell and page body into the final document.
///
/// `{{appBase}}` is substituted throughout the shell first, then
/// `{{content}}` is filled exactly once. The page body is spliced in
/// verbatim; tokens inside it stay literal.
pub fn compose(shell: &str, content: &str, app_base: &str) -> String {
    shell
        .replace(COMPOSE_APP_BASE_TOKEN, app_base)
        .replacen(CONTENT_TOKEN, content, 1)
}
